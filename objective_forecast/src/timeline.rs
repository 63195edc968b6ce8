//! Calendar dating of forecasts

use serde::{Deserialize, Serialize};

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1 through 12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The following calendar month, rolling December into January.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One dated forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: i32,
    pub month: u32,
    pub prediction: i64,
}

/// Date each prediction with the months following `anchor`.
///
/// Without an anchor there is no timeline at all (`None`, not an empty list).
pub fn build_timeline(predictions: &[i64], anchor: Option<YearMonth>) -> Option<Vec<TimelineEntry>> {
    let mut current = anchor?;
    let timeline = predictions
        .iter()
        .map(|&prediction| {
            current = current.next();
            TimelineEntry {
                year: current.year,
                month: current.month,
                prediction,
            }
        })
        .collect();
    Some(timeline)
}
