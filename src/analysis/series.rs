use serde::{Deserialize, Serialize};

use crate::analysis::confidence::{mean_confidence, ConfidenceEstimator};
use crate::analysis::trend::{self, TrendDirection};
use crate::catalog::registry::Registry;
use crate::core::timeseries::{period_label, round_value, tail_start};
use crate::models::{DiseaseSelection, ForecastPayload, TimePoint};

/// Number of trailing historical periods shown before the forecast.
pub const HISTORY_WINDOW: usize = 9;

pub const ALL_DISEASES_LABEL: &str = "All Diseases (Combined Total)";

/// Headline numbers for the current selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub next_period_value: i64,
    pub trend_direction: TrendDirection,
    pub trend_percent: String,
    pub confidence: u8,
    pub disease_label: String,
}

/// Actual-vs-predicted chart points: the last [`HISTORY_WINDOW`] historical
/// periods followed by every forecast period, in that order.
pub fn build_chart_series(
    payload: &ForecastPayload,
    diseases: &[String],
    selection: &DiseaseSelection,
) -> Vec<TimePoint> {
    let dates = &payload.historical.dates;
    let start = tail_start(dates.len(), HISTORY_WINDOW);

    let historical = dates[start..].iter().enumerate().map(|(offset, date)| {
        let idx = start + offset;
        let value = match selection {
            DiseaseSelection::All => {
                let sum: f64 = diseases.iter().map(|d| payload.historical_at(d, idx)).sum();
                round_value(sum)
            }
            DiseaseSelection::Disease(id) => round_value(payload.historical_at(id, idx)),
        };
        TimePoint {
            period: period_label(date),
            actual: Some(value),
            predicted: None,
        }
    });

    let forecast = payload.forecast_dates.iter().enumerate().map(|(idx, date)| {
        let value = match selection {
            DiseaseSelection::All => {
                let sum: f64 = diseases.iter().map(|d| payload.prediction_at(d, idx)).sum();
                round_value(sum)
            }
            DiseaseSelection::Disease(id) => round_value(payload.prediction_at(id, idx)),
        };
        TimePoint {
            period: period_label(date),
            actual: None,
            predicted: Some(value),
        }
    });

    historical.chain(forecast).collect()
}

/// Summary for the selection, or `None` when there is no disease to summarize.
///
/// The aggregate path compares the sum of first predictions with the sum of
/// last predictions; it does not reuse the chart's combined series.
pub fn build_summary(
    payload: &ForecastPayload,
    diseases: &[String],
    selection: &DiseaseSelection,
    estimator: &dyn ConfidenceEstimator,
) -> Option<SummaryStats> {
    if diseases.is_empty() {
        return None;
    }

    let stats = match selection {
        DiseaseSelection::All => {
            let mut first_sum = 0.0;
            let mut last_sum = 0.0;
            for id in diseases {
                let values = payload.prediction_values(id);
                first_sum += values.first().copied().unwrap_or(0.0);
                last_sum += values.last().copied().unwrap_or(0.0);
            }

            SummaryStats {
                next_period_value: round_value(first_sum),
                trend_direction: trend::classify_change(first_sum, last_sum),
                trend_percent: trend::format_change(first_sum, last_sum),
                confidence: mean_confidence(estimator, diseases),
                disease_label: ALL_DISEASES_LABEL.to_string(),
            }
        }
        DiseaseSelection::Disease(id) => {
            let values = payload.prediction_values(id);
            SummaryStats {
                next_period_value: round_value(values.first().copied().unwrap_or(0.0)),
                trend_direction: trend::classify(&values),
                trend_percent: trend::percent_change(&values),
                confidence: estimator.confidence(id),
                disease_label: Registry::label(id),
            }
        }
    };

    Some(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::confidence::StaticConfidence;
    use serde_json::json;

    fn twelve_month_payload() -> ForecastPayload {
        let dates: Vec<String> = (1..=12).map(|m| format!("2024-{:02}-01", m)).collect();
        let dengue: Vec<f64> = (1..=12).map(|m| m as f64 * 10.0).collect();
        let flu: Vec<f64> = (1..=12).map(|m| m as f64 + 0.4).collect();
        serde_json::from_value(json!({
            "barangay": "Poblacion",
            "historical": { "dates": dates, "dengue_cases": dengue, "flu_cases": flu },
            "forecast_dates": ["2025-01-01", "2025-02-01", "2025-03-01"],
            "predictions": {
                "dengue_cases": [130.0, 140.0, null],
                "flu_cases": [13.4, 14.4, 15.4]
            }
        }))
        .unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chart_all_mode_shape() {
        let payload = twelve_month_payload();
        let points = build_chart_series(&payload, &ids(&["dengue_cases", "flu_cases"]), &DiseaseSelection::All);

        assert_eq!(points.len(), HISTORY_WINDOW + 3);
        assert!(points[..HISTORY_WINDOW].iter().all(|p| p.predicted.is_none() && p.actual.is_some()));
        assert!(points[HISTORY_WINDOW..].iter().all(|p| p.actual.is_none() && p.predicted.is_some()));

        // First shown month is April (index 3): 40 + 4.4
        assert_eq!(points[0].period, "2024-04");
        assert_eq!(points[0].actual, Some(44));
        assert_eq!(points[HISTORY_WINDOW].period, "2025-01");
        assert_eq!(points[HISTORY_WINDOW].predicted, Some(143));
        // Missing dengue prediction counts as 0
        assert_eq!(points[HISTORY_WINDOW + 2].predicted, Some(15));
    }

    #[test]
    fn test_chart_single_mode() {
        let payload = twelve_month_payload();
        let selection = DiseaseSelection::Disease("flu_cases".into());
        let points = build_chart_series(&payload, &ids(&["dengue_cases", "flu_cases"]), &selection);

        assert_eq!(points[0].actual, Some(4));
        assert_eq!(points[HISTORY_WINDOW + 2].predicted, Some(15));
    }

    #[test]
    fn test_chart_short_history_and_unknown_disease() {
        let payload: ForecastPayload = serde_json::from_value(json!({
            "historical": { "dates": ["2024-01-01", "2024-02-01"] },
            "forecast_dates": ["2024-03-01"],
            "predictions": {}
        }))
        .unwrap();
        let selection = DiseaseSelection::Disease("ghost_cases".into());
        let points = build_chart_series(&payload, &ids(&["ghost_cases"]), &selection);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].actual, Some(0));
        assert_eq!(points[2].predicted, Some(0));
    }

    #[test]
    fn test_summary_all_mode_uses_first_and_last_sums() {
        let payload: ForecastPayload = serde_json::from_value(json!({
            "forecast_dates": ["2025-01", "2025-02"],
            "predictions": { "a_cases": [10.0, 12.0], "b_cases": [5.0, 4.0] }
        }))
        .unwrap();
        let estimator = StaticConfidence::new();
        let stats = build_summary(&payload, &ids(&["a_cases", "b_cases"]), &DiseaseSelection::All, &estimator).unwrap();

        assert_eq!(stats.next_period_value, 15);
        assert_eq!(stats.trend_direction, TrendDirection::Increasing);
        assert_eq!(stats.trend_percent, "+6.7%");
        assert_eq!(stats.confidence, 78);
        assert_eq!(stats.disease_label, ALL_DISEASES_LABEL);
    }

    #[test]
    fn test_summary_all_mode_with_disease_missing_from_payload() {
        let payload: ForecastPayload = serde_json::from_value(json!({
            "forecast_dates": ["2025-01", "2025-02"],
            "predictions": { "dengue_cases": [10.0, 12.0] }
        }))
        .unwrap();
        let estimator = StaticConfidence::new();
        let diseases = ids(&["dengue_cases", "ghost_cases"]);
        let stats = build_summary(&payload, &diseases, &DiseaseSelection::All, &estimator).unwrap();

        // ghost_cases adds 0 to both sums but still counts toward confidence: (87 + 78) / 2
        assert_eq!(stats.next_period_value, 10);
        assert_eq!(stats.trend_direction, TrendDirection::Increasing);
        assert_eq!(stats.trend_percent, "+20.0%");
        assert_eq!(stats.confidence, 83);

        let points = build_chart_series(&payload, &diseases, &DiseaseSelection::All);
        assert_eq!(points[0].predicted, Some(10));
        assert_eq!(points[1].predicted, Some(12));
    }

    #[test]
    fn test_summary_single_mode() {
        let payload = twelve_month_payload();
        let estimator = StaticConfidence::new();
        let selection = DiseaseSelection::Disease("dengue_cases".into());
        let stats = build_summary(&payload, &ids(&["dengue_cases"]), &selection, &estimator).unwrap();

        assert_eq!(stats.next_period_value, 130);
        // Trailing null reads as 0
        assert_eq!(stats.trend_direction, TrendDirection::Decreasing);
        assert_eq!(stats.trend_percent, "-100.0%");
        assert_eq!(stats.confidence, 87);
        assert_eq!(stats.disease_label, "Dengue");
    }

    #[test]
    fn test_summary_empty_disease_list() {
        let payload = twelve_month_payload();
        let estimator = StaticConfidence::new();
        assert!(build_summary(&payload, &[], &DiseaseSelection::All, &estimator).is_none());
    }
}
