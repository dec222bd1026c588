use std::collections::BTreeMap;
use std::fs;

use category_order::{OrderPolicy, Placement, ReorderRule};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::report::*;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub placement: Option<String>,
}

impl RuleConfig {
    pub fn placement(&self) -> RepResult<Placement> {
        match self.placement.as_deref() {
            None | Some("back") | Some("end") => Ok(Placement::Back),
            Some("front") | Some("start") => Ok(Placement::Front),
            Some(x) => whatever!("unknown placement for pattern {}: {}", self.pattern, x),
        }
    }

    pub fn to_rule(&self) -> RepResult<ReorderRule> {
        ReorderRule::new(&self.pattern, self.placement()?).context(InvalidRuleSnafu {
            pattern: self.pattern.clone(),
        })
    }
}

/// Smallest figure side, in pixels, that leaves room for the bars under the
/// caption and above the category labels.
pub const MIN_CHART_SIZE: u32 = 300;

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(rename = "fontFamily")]
    pub font_family: Option<String>,
    #[serde(rename = "fontScale")]
    pub font_scale: Option<f64>,
}

impl ChartSettings {
    pub fn validate(&self) -> RepResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = value {
                if v < MIN_CHART_SIZE {
                    whatever!(
                        "chart {} must be at least {} pixels, got {}",
                        name,
                        MIN_CHART_SIZE,
                        v
                    );
                }
            }
        }
        if let Some(scale) = self.font_scale {
            if !(scale.is_finite() && scale > 0.0) {
                whatever!("chart fontScale must be positive, got {}", scale);
            }
        }
        Ok(())
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSources")]
    pub file_sources: Vec<FileSource>,
    pub columns: Option<Vec<String>>,
    #[serde(rename = "columnTitles")]
    pub column_titles: Option<BTreeMap<String, String>>,
    #[serde(rename = "reorderRules")]
    pub reorder_rules: Option<Vec<RuleConfig>>,
    pub chart: Option<ChartSettings>,
}

impl ReportConfig {
    /// The rules of the configuration, or the default policy if none is given.
    pub fn order_policy(&self) -> RepResult<OrderPolicy> {
        match &self.reorder_rules {
            None => Ok(OrderPolicy::default_policy()),
            Some(rules) => {
                let mut policy = OrderPolicy::EMPTY;
                for rc in rules.iter() {
                    policy = policy.with_rule(rc.to_rule()?);
                }
                Ok(policy)
            }
        }
    }

    /// The x axis description of each column.
    ///
    /// The job titles have a built-in description, which the configuration
    /// may replace.
    pub fn column_titles(&self) -> BTreeMap<String, String> {
        let mut titles: BTreeMap<String, String> = BTreeMap::new();
        titles.insert("Title_Categories".to_string(), "Job Titles".to_string());
        if let Some(configured) = &self.column_titles {
            titles.extend(configured.clone());
        }
        titles
    }

    /// Applies the values given on the command line.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(input) = &overrides.input {
            self.file_sources = vec![FileSource {
                provider: overrides
                    .input_type
                    .clone()
                    .unwrap_or_else(|| "csv".to_string()),
                file_path: input.clone(),
                excel_worksheet_name: overrides.excel_worksheet_name.clone(),
            }];
        }
        if overrides.year.is_some() {
            self.output_settings.year = overrides.year.clone();
        }
        if overrides.output_directory.is_some() {
            self.output_settings.output_directory = overrides.output_directory.clone();
        }
        if overrides.columns.is_some() {
            self.columns = overrides.columns.clone();
        }
    }
}

/// The settings that can be given on the command line instead of in a
/// configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
    pub year: Option<String>,
    pub output_directory: Option<String>,
    pub columns: Option<Vec<String>>,
}

impl ConfigOverrides {
    /// A configuration made only out of command line values.
    pub fn to_config(&self) -> RepResult<ReportConfig> {
        ensure!(self.input.is_some(), MissingInputSnafu {});
        let mut config = ReportConfig {
            output_settings: OutputSettings::default(),
            file_sources: Vec::new(),
            columns: None,
            column_titles: None,
            reorder_rules: None,
            chart: None,
        };
        config.apply_overrides(self);
        Ok(config)
    }
}

pub fn read_config(path: &str) -> RepResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    if let Some(chart) = &config.chart {
        chart.validate()?;
    }
    Ok(config)
}

pub fn read_summary(path: &str) -> RepResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
