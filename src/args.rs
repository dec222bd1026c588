use clap::Parser;

/// This is a reporting program for attendee surveys: it draws one count plot per column.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the report.
    /// For more information about the file format, read the manual of the category_order crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, atta will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where the JSON summary of the charts is written.
    /// Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The survey data. Setting this option overrides the file sources
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    /// The first worksheet is used by default.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// The year (or any label) shown in the chart titles.
    #[clap(short, long, value_parser)]
    pub year: Option<String>,

    /// (directory) Where the charts are written. Defaults to the temporary directory.
    #[clap(long, value_parser)]
    pub output_directory: Option<String>,

    /// (list of column names) Only draw these columns. All the columns are drawn by default.
    #[clap(long, value_parser)]
    pub columns: Option<Vec<String>>,

    /// Compute the orders and the summary without drawing the charts.
    #[clap(long, takes_value = false)]
    pub summary_only: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
