use log::{debug, info, warn};

use category_order::builder::Builder;
use category_order::*;
use snafu::{prelude::*, Snafu};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::report::config_reader::*;
use crate::report::io_common::{figure_file_name, resolve_path};
use crate::report::plotter::{configure_rendering, render_count_plot, RenderingStyle};

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
pub mod plotter;

pub const Y_DESCRIPTION: &str = "Attendee Number";

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening csv file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of csv file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} has {found} fields, {expected} expected"))]
    CsvLineLength {
        lineno: usize,
        found: usize,
        expected: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet or no header row in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Could not understand cell {content} on line {lineno}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing json"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error creating the output directory {path}"))]
    CreatingOutputDirectory {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No input: provide --input or a configuration file"))]
    MissingInput {},
    #[snafu(display("Unknown input type {input_type} (expected csv or xlsx)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Column {column} not found in the data"))]
    UnknownColumn { column: String },
    #[snafu(display("Invalid reorder rule {pattern}"))]
    InvalidRule {
        source: OrderError,
        pattern: String,
    },
    #[snafu(display("Could not order the categories of column {column}"))]
    Ordering { source: OrderError, column: String },
    #[snafu(display("Error drawing chart {path}: {message}"))]
    Drawing { path: String, message: String },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type RepResult<T> = Result<T, ReportError>;

/// Chart identifier (the column name) to image path.
pub type Figures = BTreeMap<String, PathBuf>;

/// The survey data, as read from the input files.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<String>,
    // None for the missing values.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn column_index(&self, column: &str) -> RepResult<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .context(UnknownColumnSnafu { column })
    }

    /// The non-missing values of a column, in row order.
    pub fn column_values(&self, column: &str) -> RepResult<Vec<&str>> {
        let idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(|v| v.as_deref()))
            .collect())
    }

    pub fn value_counts(&self, column: &str) -> RepResult<ValueCounts> {
        let mut builder = Builder::new();
        for v in self.column_values(column)? {
            builder.add_value(v);
        }
        Ok(builder.build())
    }

    /// Appends the rows of another file with the same columns.
    pub fn append(&mut self, other: Dataset) -> RepResult<()> {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return Ok(());
        }
        if self.columns != other.columns {
            whatever!(
                "Input files have different columns: {:?} and {:?}",
                self.columns,
                other.columns
            )
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

/// Everything needed to draw the chart of one column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CountChart {
    pub identifier: String,
    pub x_description: String,
    pub title: String,
    pub y_description: String,
    /// The categories in display order, with their counts.
    pub bars: Vec<(String, u64)>,
}

/// How the charts of a report are computed and saved.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub policy: OrderPolicy,
    pub column_titles: BTreeMap<String, String>,
    pub output_directory: PathBuf,
    pub columns: Option<Vec<String>>,
    /// When false, only the orders are computed: no image is written.
    pub render: bool,
}

#[derive(Debug, Clone)]
pub struct PlottedColumn {
    pub chart: CountChart,
    pub figures: Figures,
}

#[derive(Debug, Clone, Default)]
pub struct ChartReport {
    pub charts: Vec<CountChart>,
    pub figures: Figures,
}

/// Computes the order and the labels of the chart of a column.
pub fn prepare_chart(
    dataset: &Dataset,
    column: &str,
    year: &str,
    settings: &ReportSettings,
) -> RepResult<CountChart> {
    let col_title = column.to_string();
    let x_description = settings
        .column_titles
        .get(&col_title)
        .cloned()
        .unwrap_or_else(|| col_title.clone());

    let counts = dataset.value_counts(column)?;
    let order = get_order(&counts, &settings.policy).context(OrderingSnafu { column })?;
    debug!("prepare_chart: column {:?} order {:?}", column, order);

    let mut bars: Vec<(String, u64)> = Vec::new();
    for label in order {
        let count = counts
            .count(&label)
            .ok_or_else(|| OrderError::MissingLabel(label.clone()))
            .context(OrderingSnafu { column })?;
        bars.push((label, count));
    }

    Ok(CountChart {
        title: format!("{} of the Attendees in {}", x_description, year),
        identifier: col_title,
        x_description,
        y_description: Y_DESCRIPTION.to_string(),
        bars,
    })
}

/// Saves the chart under `<output directory>/<identifier>.jpg`.
pub fn save_fig(chart: &CountChart, settings: &ReportSettings) -> RepResult<Figures> {
    let fig_path = settings
        .output_directory
        .join(figure_file_name(&chart.identifier));
    if settings.render {
        render_count_plot(chart, &fig_path)?;
        info!("Wrote chart {}", fig_path.display());
    }
    let mut figures = Figures::new();
    figures.insert(chart.identifier.clone(), fig_path);
    Ok(figures)
}

pub fn plot_count(
    dataset: &Dataset,
    column: &str,
    year: &str,
    settings: &ReportSettings,
) -> RepResult<PlottedColumn> {
    let chart = prepare_chart(dataset, column, year, settings)?;
    let figures = save_fig(&chart, settings)?;
    Ok(PlottedColumn { chart, figures })
}

/// Plots all the selected columns of the dataset.
///
/// The first failure stops the report.
pub fn plot_counts(
    dataset: &Dataset,
    year: &str,
    settings: &ReportSettings,
) -> RepResult<ChartReport> {
    let columns: Vec<String> = settings
        .columns
        .clone()
        .unwrap_or_else(|| dataset.columns.clone());
    let mut report = ChartReport::default();
    for col in columns.iter() {
        let plotted = plot_count(dataset, col, year, settings)?;
        report.figures.extend(plotted.figures);
        report.charts.push(plotted.chart);
    }
    Ok(report)
}

fn read_dataset(root: Option<&Path>, sources: &[FileSource]) -> RepResult<Dataset> {
    ensure!(!sources.is_empty(), MissingInputSnafu {});
    let mut dataset = Dataset::default();
    for source in sources.iter() {
        let p = resolve_path(root, &source.file_path);
        let path = p.as_path().display().to_string();
        info!("Attempting to read data file {:?}", path);
        let data = match source.provider.as_str() {
            "csv" => io_csv::read_csv_dataset(&path)?,
            "xlsx" | "excel" => {
                io_excel::read_excel_dataset(&path, source.excel_worksheet_name.as_deref())?
            }
            x => {
                return UnknownInputTypeSnafu { input_type: x }.fail();
            }
        };
        dataset.append(data)?;
    }
    Ok(dataset)
}

fn rendering_style_of(config: &ReportConfig) -> RenderingStyle {
    let default_style = RenderingStyle::default();
    match &config.chart {
        None => default_style,
        Some(c) => RenderingStyle {
            width: c.width.unwrap_or(default_style.width),
            height: c.height.unwrap_or(default_style.height),
            font_family: c
                .font_family
                .clone()
                .unwrap_or(default_style.font_family),
            font_scale: c.font_scale.unwrap_or(default_style.font_scale),
        },
    }
}

fn build_summary_js(config: &ReportConfig, year: &str, charts: &[CountChart]) -> JSValue {
    let results: Vec<JSValue> = charts
        .iter()
        .map(|chart| {
            let order: Vec<JSValue> = chart
                .bars
                .iter()
                .map(|(label, count)| json!({"label": label, "count": count}))
                .collect();
            json!({
                "column": chart.identifier,
                "title": chart.title,
                "xDescription": chart.x_description,
                "figure": figure_file_name(&chart.identifier),
                "order": order,
            })
        })
        .collect();
    json!({
        "config": {
            "report": config.output_settings.report_name,
            "year": year,
        },
        "results": results,
    })
}

fn write_summary(pretty_js: &str, out_path: &Option<String>) -> RepResult<()> {
    match out_path.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            fs::write(path, pretty_js).context(WritingSummarySnafu { path })?;
            info!("Wrote summary to {}", path);
        }
    }
    Ok(())
}

/// Runs a full report.
///
/// Arguments:
/// * `config_path` the JSON configuration. If not provided, the report is
/// described by the overrides alone.
/// * `overrides` values from the command line, which take precedence over
/// the configuration file
/// * `check_summary_path` a reference summary to compare with
/// * `out_path` where to write the summary ('stdout' or None for the standard output)
/// * `render` whether the images are drawn
pub fn run_report(
    config_path: Option<String>,
    overrides: &ConfigOverrides,
    check_summary_path: Option<String>,
    out_path: Option<String>,
    render: bool,
) -> RepResult<()> {
    let (mut config, root) = match &config_path {
        Some(p) => {
            let config = read_config(p)?;
            let root = Path::new(p)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, Some(root))
        }
        None => (overrides.to_config()?, None),
    };
    config.apply_overrides(overrides);
    // Command line inputs are relative to the working directory.
    let root = if overrides.input.is_some() { None } else { root };
    info!("config: {:?}", config);

    let year = match config.output_settings.year.clone() {
        Some(y) => y,
        None => whatever!("No year given: use --year or outputSettings.year"),
    };

    let output_directory = match &config.output_settings.output_directory {
        Some(d) => resolve_path(root.as_deref(), d),
        None => std::env::temp_dir(),
    };
    if render {
        fs::create_dir_all(&output_directory).context(CreatingOutputDirectorySnafu {
            path: output_directory.display().to_string(),
        })?;
        configure_rendering(rendering_style_of(&config));
    }

    let settings = ReportSettings {
        policy: config.order_policy()?,
        column_titles: config.column_titles(),
        output_directory,
        columns: config.columns.clone(),
        render,
    };

    let dataset = read_dataset(root.as_deref(), &config.file_sources)?;
    info!(
        "Read {} rows, columns: {:?}",
        dataset.rows.len(),
        dataset.columns
    );

    let report = plot_counts(&dataset, &year, &settings)?;
    for (identifier, path) in report.figures.iter() {
        debug!("figure {:?}: {}", identifier, path.display());
    }

    let result_js = build_summary_js(&config, &year, &report.charts);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, &out_path)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
    }

    Ok(())
}
