//! Command-line front end shared by the `predict_objectives` binary
//!
//! Input comes from `--months`, `--objectives`/`--sales`, `--csv`, or a JSON
//! document on stdin. The answer is a JSON string for stdout.

use crate::backtest::backtest;
use crate::config::{
    BacktestConfig, ForecastConfig, DEFAULT_BASELINE_WINDOW, DEFAULT_HORIZON,
    DEFAULT_RECENT_WINDOW,
};
use crate::data::{
    load_months_csv, months_field, parse_month_records, parse_payload, MonthlyRecord, SeriesInput,
};
use crate::error::{ForecastError, Result};
use crate::pipeline::predict;
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "predict_objectives",
    author,
    version,
    about = "Predict next objectives or backtest",
    long_about = None
)]
pub struct Cli {
    /// JSON array of objectives
    #[arg(long)]
    pub objectives: Option<String>,

    /// JSON array of sales
    #[arg(long)]
    pub sales: Option<String>,

    /// JSON array of {year, month, objective, sales} objects
    #[arg(long)]
    pub months: Option<String>,

    /// CSV file with year,month (or date),objective,sales columns
    #[arg(long, conflicts_with = "months")]
    pub csv: Option<PathBuf>,

    /// Run a rolling-origin backtest instead of a single prediction
    #[arg(long, default_value_t = false)]
    pub backtest: bool,

    /// Number of months to forecast
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Number of recent sales points used for the sales trend
    #[arg(long, default_value_t = DEFAULT_RECENT_WINDOW)]
    pub recent_window: usize,

    /// Trailing months averaged by the backtest baseline
    #[arg(long, default_value_t = DEFAULT_BASELINE_WINDOW)]
    pub baseline_window: usize,
}

/// Where the history came from
enum Request {
    Payload(Value),
    Records(Vec<MonthlyRecord>),
}

/// Execute one invocation, reading `stdin` only when no flag supplies data.
pub fn run<R: Read>(cli: &Cli, stdin: R) -> Result<String> {
    let request = read_request(cli, stdin)?;

    if cli.backtest {
        let records = match request {
            Request::Records(records) => records,
            Request::Payload(payload) => {
                let months = months_field(&payload).ok_or_else(|| {
                    ForecastError::ValidationError("Backtest requires a 'months' array".to_string())
                })?;
                parse_month_records(months)?
            }
        };
        let config = BacktestConfig::default()
            .with_horizon(cli.horizon)
            .with_recent_window(cli.recent_window)
            .with_baseline_window(cli.baseline_window);
        let result = backtest(&records, &config)?;
        return Ok(serde_json::to_string(&result)?);
    }

    let input = match request {
        Request::Records(records) => SeriesInput::Months(records),
        Request::Payload(payload) => parse_payload(&payload)?,
    };
    let config = ForecastConfig::default()
        .with_horizon(cli.horizon)
        .with_recent_window(cli.recent_window);
    let output = predict(&input, &config)?;
    Ok(serde_json::to_string(&output)?)
}

fn read_request<R: Read>(cli: &Cli, mut stdin: R) -> Result<Request> {
    if let Some(path) = &cli.csv {
        return Ok(Request::Records(load_months_csv(path)?));
    }
    if let Some(months) = &cli.months {
        let months: Value = serde_json::from_str(months)?;
        return Ok(Request::Payload(serde_json::json!({ "months": months })));
    }
    if let (Some(objectives), Some(sales)) = (&cli.objectives, &cli.sales) {
        let objectives: Value = serde_json::from_str(objectives)?;
        let sales: Value = serde_json::from_str(sales)?;
        return Ok(Request::Payload(
            serde_json::json!({ "objectives": objectives, "sales": sales }),
        ));
    }

    let mut raw = String::new();
    stdin.read_to_string(&mut raw)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ForecastError::ValidationError(
            "Provide input via --months/--objectives/--sales/--csv or STDIN JSON".to_string(),
        ));
    }
    Ok(Request::Payload(serde_json::from_str(raw)?))
}
