use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Score used for diseases without a seeded value.
pub const DEFAULT_CONFIDENCE: u8 = 78;

/// Source of a 0-100 confidence score for a disease's forecast.
pub trait ConfidenceEstimator: Send + Sync {
    fn confidence(&self, disease_id: &str) -> u8;
}

// Seed values stand in for a backtest score until the service reports one.
static SEED_TABLE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    HashMap::from([
        ("dengue_cases", 87),
        ("diarrhea_cases", 84),
        ("respiratory_cases", 82),
        ("influenza_cases", 81),
        ("typhoid_cases", 79),
        ("leptospirosis_cases", 76),
        ("tuberculosis_cases", 80),
        ("pneumonia_cases", 83),
        ("hypertension_prevalence_pct", 85),
        ("diabetes_prevalence_pct", 86),
        ("malnutrition_prevalence_pct", 77),
    ])
});

/// Fixed per-disease table with a constant fallback.
#[derive(Debug, Clone, Default)]
pub struct StaticConfidence {
    overrides: HashMap<String, u8>,
}

impl StaticConfidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the seeded score for one disease. Values above 100 are clamped.
    pub fn with_override(mut self, disease_id: &str, score: u8) -> Self {
        self.overrides.insert(disease_id.to_string(), score.min(100));
        self
    }
}

impl ConfidenceEstimator for StaticConfidence {
    fn confidence(&self, disease_id: &str) -> u8 {
        if let Some(score) = self.overrides.get(disease_id) {
            return *score;
        }
        SEED_TABLE
            .get(disease_id)
            .copied()
            .unwrap_or(DEFAULT_CONFIDENCE)
    }
}

/// Rounded mean confidence across several diseases. Empty input yields the default.
pub fn mean_confidence<E: ConfidenceEstimator + ?Sized>(estimator: &E, disease_ids: &[String]) -> u8 {
    if disease_ids.is_empty() {
        return DEFAULT_CONFIDENCE;
    }
    let sum: u32 = disease_ids.iter().map(|id| estimator.confidence(id) as u32).sum();
    let mean = sum as f64 / disease_ids.len() as f64;
    crate::core::timeseries::round_value(mean).clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_and_default() {
        let estimator = StaticConfidence::new();
        assert_eq!(estimator.confidence("dengue_cases"), 87);
        assert_eq!(estimator.confidence("unknown_marker_cases"), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_override_wins() {
        let estimator = StaticConfidence::new().with_override("dengue_cases", 250);
        assert_eq!(estimator.confidence("dengue_cases"), 100);
    }

    #[test]
    fn test_mean_confidence_rounds() {
        let estimator = StaticConfidence::new();
        // (87 + 84) / 2 = 85.5
        let ids = vec!["dengue_cases".to_string(), "diarrhea_cases".to_string()];
        assert_eq!(mean_confidence(&estimator, &ids), 86);
        assert_eq!(mean_confidence(&estimator, &[]), DEFAULT_CONFIDENCE);
    }
}
