use chrono::NaiveDate;

/// Characters kept from an ISO date to form a month-granularity label (`YYYY-MM`).
pub const PERIOD_LABEL_LEN: usize = 7;

/// Truncates an ISO date string (`2024-03-01`, `2024-03-01T00:00:00`) to its `YYYY-MM` label.
/// Shorter inputs are returned as-is.
pub fn period_label(date: &str) -> String {
    date.trim().chars().take(PERIOD_LABEL_LEN).collect()
}

/// Rounds half-up, the same way chart values have always been rounded (2.5 -> 3, -2.5 -> -2).
pub fn round_value(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Human readable month for a period label: `2026-04` -> `April 2026`.
/// Labels that do not parse are returned unchanged.
pub fn month_name(period: &str) -> String {
    let label = period_label(period);
    match NaiveDate::parse_from_str(&format!("{}-01", label), "%Y-%m-%d") {
        Ok(date) => date.format("%B %Y").to_string(),
        Err(_) => period.to_string(),
    }
}

/// Start index of the trailing window of `window` items in a sequence of `len` items.
pub fn tail_start(len: usize, window: usize) -> usize {
    len.saturating_sub(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_label_truncates() {
        assert_eq!(period_label("2024-03-01"), "2024-03");
        assert_eq!(period_label("2024-03-01T00:00:00Z"), "2024-03");
        assert_eq!(period_label("2024-03"), "2024-03");
        assert_eq!(period_label("2024"), "2024");
    }

    #[test]
    fn test_round_value_half_up() {
        assert_eq!(round_value(2.5), 3);
        assert_eq!(round_value(2.49), 2);
        assert_eq!(round_value(-2.5), -2);
        assert_eq!(round_value(f64::NAN), 0);
    }

    #[test]
    fn test_round_value_just_below_half() {
        assert_eq!(round_value(0.49999999999999994), 0);
        assert_eq!(round_value(-0.5000000000000001), -1);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name("2026-04-01"), "April 2026");
        assert_eq!(month_name("Q2"), "Q2");
    }

    #[test]
    fn test_tail_start() {
        assert_eq!(tail_start(12, 9), 3);
        assert_eq!(tail_start(4, 9), 0);
    }
}
