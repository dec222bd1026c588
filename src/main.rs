use std::process::ExitCode;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

mod args;
mod report;

use report::config_reader::ConfigOverrides;

fn main() -> ExitCode {
    let args = args::Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    let overrides = ConfigOverrides {
        input: args.input,
        input_type: args.input_type,
        excel_worksheet_name: args.excel_worksheet_name,
        year: args.year,
        output_directory: args.output_directory,
        columns: args.columns,
    };

    let res = report::run_report(
        args.config,
        &overrides,
        args.reference,
        args.out,
        !args.summary_only,
    );

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!("Error occured {:?}", e);
            eprintln!("An error occured {}", e);
            for cause in ErrorCompat::iter_chain(&e).skip(1) {
                eprintln!("caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
