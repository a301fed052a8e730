use serde::{Deserialize, Serialize};

use crate::models::TimePoint;

/// Totals over the historical part of a chart series.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSummary {
    pub total: i64,
    pub average: i64,
    pub peak: i64,
    pub periods: usize,
}

/// Summarize the `actual` points of a chart series. Forecast points are ignored.
pub fn summarize_actuals(points: &[TimePoint]) -> HistoricalSummary {
    let actuals: Vec<i64> = points.iter().filter_map(|p| p.actual).collect();
    if actuals.is_empty() {
        return HistoricalSummary::default();
    }

    let total: i64 = actuals.iter().sum();
    let average = crate::core::timeseries::round_value(total as f64 / actuals.len() as f64);
    let peak = actuals.iter().copied().max().unwrap_or(0);

    HistoricalSummary {
        total,
        average,
        peak,
        periods: actuals.len(),
    }
}
