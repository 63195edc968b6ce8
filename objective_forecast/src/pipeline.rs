//! Single-call forecasting entry point

use crate::config::ForecastConfig;
use crate::data::{prepare_series, SeriesInput};
use crate::error::Result;
use crate::models::{ForecastPath, ObjectiveForecastModel};
use crate::scaling::ScalingAdjuster;
use crate::timeline::{build_timeline, TimelineEntry};
use serde::{Deserialize, Serialize};

/// What a forecasting call returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastOutput {
    /// Rounded predictions, one per future month
    pub predictions: Vec<i64>,
    /// Dated predictions; present only for dated input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEntry>>,
}

/// A forecast with the intermediate values that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedForecast {
    pub output: ForecastOutput,
    /// Model output before calibration
    pub raw: Vec<f64>,
    /// Calibrated values before rounding
    pub scaled: Vec<f64>,
    /// Estimator that produced `raw`
    pub path: ForecastPath,
}

/// Forecast the next `config.horizon` objectives.
pub fn predict(input: &SeriesInput, config: &ForecastConfig) -> Result<ForecastOutput> {
    predict_detailed(input, config).map(|detailed| detailed.output)
}

/// Like [`predict`], keeping raw values and the model path.
pub fn predict_detailed(input: &SeriesInput, config: &ForecastConfig) -> Result<DetailedForecast> {
    let model = ObjectiveForecastModel::from_config(config)?;
    let series = prepare_series(input)?;

    let forecast = model.forecast(series.objectives(), series.sales())?;
    let scaled = ScalingAdjuster::new(config.scaling).apply(
        &forecast.values,
        series.objectives(),
        series.sales(),
    );
    let predictions: Vec<i64> = scaled.iter().map(|v| v.round_ties_even() as i64).collect();
    let timeline = build_timeline(&predictions, series.anchor());

    Ok(DetailedForecast {
        output: ForecastOutput {
            predictions,
            timeline,
        },
        raw: forecast.values,
        scaled,
        path: forecast.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MonthlyRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arrays_have_no_timeline() {
        let input = SeriesInput::Arrays {
            objectives: vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0],
            sales: vec![100.0, 110.0, 120.0, 130.0, 140.0, 150.0],
        };
        let config = ForecastConfig::default().with_primary_model(false);
        let detailed = predict_detailed(&input, &config).unwrap();
        // Mean sales are ten times mean objectives: multiplier hits the 1.15 cap
        assert_eq!(detailed.output.predictions, vec![25, 28, 30]);
        assert!(detailed.output.timeline.is_none());
        assert_eq!(detailed.path, ForecastPath::Fallback);
    }

    #[test]
    fn test_dated_input_gets_timeline() {
        let input = SeriesInput::Months(vec![
            MonthlyRecord::new(2024, 1, 2.0, 2.0),
            MonthlyRecord::new(2024, 2, 3.0, 3.0),
        ]);
        let config = ForecastConfig::default()
            .with_horizon(2)
            .with_primary_model(false);
        let output = predict(&input, &config).unwrap();
        // Sales project to 4 and 5; objective = sales; ratio 1 leaves them unscaled
        assert_eq!(output.predictions, vec![4, 5]);
        let timeline = output.timeline.unwrap();
        assert_eq!((timeline[0].year, timeline[0].month), (2024, 3));
    }

    #[test]
    fn test_half_values_round_to_even() {
        let input = SeriesInput::Arrays {
            objectives: vec![1.5, 2.0],
            sales: vec![1.5, 2.0],
        };
        let config = ForecastConfig::default().with_primary_model(false);
        let detailed = predict_detailed(&input, &config).unwrap();
        assert_eq!(detailed.scaled[0], 2.5);
        assert_eq!(detailed.output.predictions, vec![2, 3, 4]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let input = SeriesInput::Arrays {
            objectives: vec![1.0, 2.0],
            sales: vec![1.0, 2.0],
        };
        assert!(predict(&input, &ForecastConfig::default().with_horizon(0)).is_err());
    }

    #[test]
    fn test_serialization_omits_missing_timeline() {
        let output = ForecastOutput {
            predictions: vec![1, 2, 3],
            timeline: None,
        };
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"predictions":[1,2,3]}"#
        );
    }
}
