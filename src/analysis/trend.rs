use serde::{Deserialize, Serialize};

/// Absolute change below which a series is classified as stable.
pub const TREND_DEADBAND: f64 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Classify the direction of a predicted series from its first and last points.
/// Fewer than two points is `Stable`.
pub fn classify(series: &[f64]) -> TrendDirection {
    match endpoints(series) {
        Some((first, last)) => classify_change(first, last),
        None => TrendDirection::Stable,
    }
}

/// Percentage change between the first and last points, e.g. `"+6.7%"`.
/// Fewer than two points is `"0%"`.
pub fn percent_change(series: &[f64]) -> String {
    match endpoints(series) {
        Some((first, last)) => format_change(first, last),
        None => "0%".to_string(),
    }
}

/// Direction of a change from `first` to `last`, applying the deadband.
pub fn classify_change(first: f64, last: f64) -> TrendDirection {
    let delta = last - first;
    if delta > TREND_DEADBAND {
        TrendDirection::Increasing
    } else if delta < -TREND_DEADBAND {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Signed one-decimal percentage from `first` to `last`.
///
/// A first value of exactly zero is replaced by 1 as the denominator, so
/// `0 -> 50` reads as `+5000.0%` rather than failing.
pub fn format_change(first: f64, last: f64) -> String {
    let denominator = if first == 0.0 { 1.0 } else { first };
    let pct = (last - first) / denominator * 100.0;
    if pct >= 0.0 {
        format!("+{:.1}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

fn endpoints(series: &[f64]) -> Option<(f64, f64)> {
    if series.len() < 2 {
        return None;
    }
    Some((series[0], series[series.len() - 1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_series() {
        assert_eq!(classify(&[]), TrendDirection::Stable);
        assert_eq!(classify(&[42.0]), TrendDirection::Stable);
        assert_eq!(percent_change(&[]), "0%");
        assert_eq!(percent_change(&[42.0]), "0%");
    }

    #[test]
    fn test_deadband() {
        assert_eq!(classify(&[100.0, 100.4]), TrendDirection::Stable);
        assert_eq!(classify(&[100.0, 100.6]), TrendDirection::Increasing);
        assert_eq!(classify(&[100.0, 99.4]), TrendDirection::Decreasing);
        assert_eq!(classify(&[100.0, 100.5]), TrendDirection::Stable);
    }

    #[test]
    fn test_only_endpoints_matter() {
        assert_eq!(classify(&[10.0, 50.0, 0.0, 10.2]), TrendDirection::Stable);
        assert_eq!(percent_change(&[10.0, 99.0, 12.0]), "+20.0%");
    }

    #[test]
    fn test_percent_change_zero_denominator() {
        assert_eq!(percent_change(&[0.0, 50.0]), "+5000.0%");
        assert_eq!(percent_change(&[0.0, 0.0]), "+0.0%");
    }

    #[test]
    fn test_percent_change_sign() {
        assert_eq!(percent_change(&[15.0, 16.0]), "+6.7%");
        assert_eq!(percent_change(&[20.0, 15.0]), "-25.0%");
    }
}
