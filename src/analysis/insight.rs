use serde::{Deserialize, Serialize};

use crate::analysis::trend::{self, TrendDirection};
use crate::catalog::registry::Registry;
use crate::models::ForecastPayload;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Warning,  // Rising cases
    Positive, // Falling cases
    Neutral,  // No meaningful change
    Info,     // Locality-wide note
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Insight {
    pub text: String,
    pub severity: InsightSeverity,
}

impl Insight {
    fn new(text: String, severity: InsightSeverity) -> Self {
        Self { text, severity }
    }
}

/// One statement per disease in `payload.predictions` (payload order), then
/// one trailing monitoring note for the locality.
pub fn build_insights(payload: &ForecastPayload, locality: &str) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(payload.predictions.len() + 1);

    for disease_id in payload.predictions.keys() {
        let values = payload.prediction_values(disease_id);
        let label = Registry::label(disease_id);
        let direction = trend::classify(&values);
        let pct = trend::percent_change(&values);
        let magnitude = pct.trim_start_matches(['+', '-']);

        let insight = match direction {
            TrendDirection::Increasing => Insight::new(
                format!("{} cases are expected to increase by {} in {}.", label, magnitude, locality),
                InsightSeverity::Warning,
            ),
            TrendDirection::Decreasing => Insight::new(
                format!("{} cases are expected to decrease by {} in {}.", label, magnitude, locality),
                InsightSeverity::Positive,
            ),
            TrendDirection::Stable => Insight::new(
                format!("{} remains stable in {}.", label, locality),
                InsightSeverity::Neutral,
            ),
        };
        insights.push(insight);
    }

    insights.push(Insight::new(
        format!(
            "Continue monitoring health conditions in {} and update the dataset as new monthly records arrive.",
            locality
        ),
        InsightSeverity::Info,
    ));

    insights
}
