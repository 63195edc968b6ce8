//! Input records and their normalisation into an aligned series pair

use crate::error::{ForecastError, Result};
use crate::timeline::YearMonth;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::path::Path;

/// One calendar month of history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub year: i32,
    /// 1 through 12
    pub month: u32,
    pub objective: f64,
    pub sales: f64,
}

impl MonthlyRecord {
    pub fn new(year: i32, month: u32, objective: f64, sales: f64) -> Self {
        Self {
            year,
            month,
            objective,
            sales,
        }
    }

    /// Calendar month this record describes
    pub fn period(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    fn is_well_formed(&self) -> bool {
        (1..=12).contains(&self.month) && self.objective.is_finite() && self.sales.is_finite()
    }
}

/// The two accepted shapes of forecasting input
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesInput {
    /// Dated monthly records, in any order
    Months(Vec<MonthlyRecord>),
    /// Legacy undated parallel arrays, already chronological
    Arrays { objectives: Vec<f64>, sales: Vec<f64> },
}

impl From<Vec<MonthlyRecord>> for SeriesInput {
    fn from(records: Vec<MonthlyRecord>) -> Self {
        SeriesInput::Months(records)
    }
}

/// Objectives and sales aligned by index, plus the month of the last record
/// when the input was dated
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    objectives: Vec<f64>,
    sales: Vec<f64>,
    anchor: Option<YearMonth>,
}

impl PreparedSeries {
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    pub fn sales(&self) -> &[f64] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// Month of the chronologically last dated record
    pub fn anchor(&self) -> Option<YearMonth> {
        self.anchor
    }

    pub fn last_year(&self) -> Option<i32> {
        self.anchor.map(|a| a.year)
    }

    pub fn last_month(&self) -> Option<u32> {
        self.anchor.map(|a| a.month)
    }
}

/// Normalise either input shape into a [`PreparedSeries`].
pub fn prepare_series(input: &SeriesInput) -> Result<PreparedSeries> {
    match input {
        SeriesInput::Months(records) => prepare_months(records),
        SeriesInput::Arrays { objectives, sales } => prepare_arrays(objectives, sales),
    }
}

fn prepare_months(records: &[MonthlyRecord]) -> Result<PreparedSeries> {
    if records.iter().any(|r| !r.is_well_formed()) {
        return Err(ForecastError::ValidationError(
            "Each month must include integer year, month (1-12), and numeric objective/sales"
                .to_string(),
        ));
    }

    let mut sorted = records.to_vec();
    sorted.sort_by_key(MonthlyRecord::period);

    let anchor = sorted.last().map(MonthlyRecord::period).ok_or_else(|| {
        ForecastError::ValidationError("months must contain at least one record".to_string())
    })?;

    Ok(PreparedSeries {
        objectives: sorted.iter().map(|r| r.objective).collect(),
        sales: sorted.iter().map(|r| r.sales).collect(),
        anchor: Some(anchor),
    })
}

fn prepare_arrays(objectives: &[f64], sales: &[f64]) -> Result<PreparedSeries> {
    if objectives.iter().chain(sales).any(|v| !v.is_finite()) {
        return Err(ForecastError::ValidationError(
            "objectives and sales must be numeric lists".to_string(),
        ));
    }
    if objectives.len() != sales.len() {
        return Err(ForecastError::ValidationError(format!(
            "objectives and sales must have the same length ({} vs {})",
            objectives.len(),
            sales.len()
        )));
    }

    Ok(PreparedSeries {
        objectives: objectives.to_vec(),
        sales: sales.to_vec(),
        anchor: None,
    })
}

/// Interpret a decoded JSON request body.
///
/// Accepts `{"months": [...]}` (or `"entries"`) with `{year, month, objective,
/// sales}` objects, or the legacy `{"objectives": [...], "sales": [...]}`.
/// An empty months list falls through to the legacy arrays.
pub fn parse_payload(payload: &Value) -> Result<SeriesInput> {
    if let Some(months) = months_field(payload) {
        return parse_month_records(months).map(SeriesInput::Months);
    }

    let (objectives, sales) = match (payload.get("objectives"), payload.get("sales")) {
        (Some(o), Some(s)) if !o.is_null() && !s.is_null() => (o, s),
        _ => {
            return Err(ForecastError::ValidationError(
                "Provide either months array or objectives and sales arrays".to_string(),
            ))
        }
    };

    let (Some(objectives), Some(sales)) = (objectives.as_array(), sales.as_array()) else {
        return Err(ForecastError::ValidationError(
            "objectives and sales must be lists".to_string(),
        ));
    };

    Ok(SeriesInput::Arrays {
        objectives: coerce_numbers(objectives)?,
        sales: coerce_numbers(sales)?,
    })
}

/// The non-empty `months`/`entries` field of a request, if any
pub fn months_field(payload: &Value) -> Option<&Value> {
    ["months", "entries"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|v| match v {
            Value::Null | Value::Bool(false) => false,
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// Strictly typed decoding of a JSON list of month objects
pub fn parse_month_records(months: &Value) -> Result<Vec<MonthlyRecord>> {
    let entries = months.as_array().ok_or_else(|| {
        ForecastError::ValidationError(
            "months must be a list of {year, month, objective, sales}".to_string(),
        )
    })?;

    entries.iter().map(parse_month_record).collect()
}

fn parse_month_record(entry: &Value) -> Result<MonthlyRecord> {
    let malformed = || {
        ForecastError::ValidationError(
            "Each month must include integer year, month (1-12), and numeric objective/sales"
                .to_string(),
        )
    };

    let year = entry
        .get("year")
        .and_then(Value::as_i64)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(malformed)?;
    let month = entry
        .get("month")
        .and_then(Value::as_i64)
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(malformed)? as u32;
    let objective = entry
        .get("objective")
        .and_then(Value::as_f64)
        .ok_or_else(malformed)?;
    let sales = entry
        .get("sales")
        .and_then(Value::as_f64)
        .ok_or_else(malformed)?;

    Ok(MonthlyRecord::new(year, month, objective, sales))
}

fn coerce_numbers(values: &[Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| {
            ForecastError::ValidationError("objectives and sales must be numeric lists".to_string())
        })
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    year: Option<i32>,
    month: Option<u32>,
    date: Option<String>,
    objective: f64,
    sales: f64,
}

/// Load monthly records from a headered CSV file.
///
/// Each row carries `objective` and `sales` plus either `year` and `month`
/// columns or a `date` column (`YYYY-MM` or `YYYY-MM-DD`).
pub fn load_months_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MonthlyRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let (year, month) = match (row.year, row.month, row.date.as_deref()) {
            (Some(year), Some(month), _) => (year, month),
            (_, _, Some(date)) => {
                let date = parse_month_date(date).ok_or_else(|| {
                    ForecastError::ValidationError(format!(
                        "row {}: unparseable date '{}'",
                        line + 1,
                        date
                    ))
                })?;
                (date.year(), date.month())
            }
            _ => {
                return Err(ForecastError::ValidationError(format!(
                    "row {}: needs year and month columns or a date column",
                    line + 1
                )))
            }
        };
        records.push(MonthlyRecord::new(year, month, row.objective, row.sales));
    }

    Ok(records)
}

fn parse_month_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
}
