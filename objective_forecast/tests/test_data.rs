use objective_forecast::data::{load_months_csv, parse_payload};
use objective_forecast::{
    predict, prepare_series, ForecastConfig, ForecastError, MonthlyRecord, SeriesInput, YearMonth,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

#[test]
fn test_load_csv_with_year_month_columns() {
    let file = write_csv(&[
        "year,month,objective,sales",
        "2023,11,100,500",
        "2023,12, 110 ,520.5",
        "2024,1,120,540",
    ]);
    let records = load_months_csv(file.path()).unwrap();
    assert_eq!(
        records,
        vec![
            MonthlyRecord::new(2023, 11, 100.0, 500.0),
            MonthlyRecord::new(2023, 12, 110.0, 520.5),
            MonthlyRecord::new(2024, 1, 120.0, 540.0),
        ]
    );
}

#[test]
fn test_load_csv_with_date_column() {
    let file = write_csv(&[
        "date,objective,sales",
        "2024-02,10,40",
        "2024-03-01,12,44",
    ]);
    let records = load_months_csv(file.path()).unwrap();
    assert_eq!(records[0].period(), YearMonth::new(2024, 2));
    assert_eq!(records[1].period(), YearMonth::new(2024, 3));
}

#[test]
fn test_load_csv_errors() {
    let file = write_csv(&["objective,sales", "10,40"]);
    assert!(matches!(
        load_months_csv(file.path()),
        Err(ForecastError::ValidationError(_))
    ));

    let file = write_csv(&["year,month,objective,sales", "2024,1,ten,40"]);
    assert!(matches!(
        load_months_csv(file.path()),
        Err(ForecastError::CsvError(_))
    ));

    assert!(matches!(
        load_months_csv("/nonexistent/months.csv"),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_csv_records_drive_prediction() {
    let file = write_csv(&[
        "year,month,objective,sales",
        "2023,10,100,500",
        "2023,11,110,540",
        "2023,12,120,580",
        "2023,9,90,460",
    ]);
    let records = load_months_csv(file.path()).unwrap();
    let output = predict(&SeriesInput::Months(records), &ForecastConfig::default()).unwrap();
    let timeline = output.timeline.unwrap();
    assert_eq!((timeline[0].year, timeline[0].month), (2024, 1));
}

#[test]
fn test_payload_shapes() {
    let dated = parse_payload(&json!({
        "months": [
            {"year": 2023, "month": 2, "objective": 20, "sales": 200},
            {"year": 2023, "month": 1, "objective": 10, "sales": 100}
        ]
    }))
    .unwrap();
    let series = prepare_series(&dated).unwrap();
    assert_eq!(series.objectives(), &[10.0, 20.0]);
    assert_eq!(series.anchor(), Some(YearMonth::new(2023, 2)));

    let legacy = parse_payload(&json!({"objectives": [1, 2], "sales": [3, 4]})).unwrap();
    assert!(prepare_series(&legacy).unwrap().anchor().is_none());

    let err = parse_payload(&json!({})).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("months array"));
}
