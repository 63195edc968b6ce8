//! Predict the next monthly objectives, or backtest the predictor.
//!
//! The result is printed as JSON on stdout; any failure is reported on stderr
//! with exit status 1.

use clap::Parser;
use objective_forecast::cli::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli, std::io::stdin().lock()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
