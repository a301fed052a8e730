use std::time::Duration;

use crate::error::ForecastError;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:5000";
pub const DEFAULT_ENDPOINT: &str = "/api/forecast";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// The forecasting service trains for at most six months ahead.
pub const DEFAULT_MAX_HORIZON: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub max_horizon_months: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_horizon_months: DEFAULT_MAX_HORIZON,
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> Result<Self, ForecastError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to read .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ForecastError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServiceConfig::default();

        if let Some(url) = lookup("FORECAST_SERVICE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(endpoint) = lookup("FORECAST_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            let endpoint = endpoint.trim();
            config.endpoint = if endpoint.starts_with('/') {
                endpoint.to_string()
            } else {
                format!("/{}", endpoint)
            };
        }
        if let Some(raw) = lookup("FORECAST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ForecastError::Config(format!("FORECAST_TIMEOUT_SECS must be a number of seconds, got '{}'", raw)))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("FORECAST_MAX_HORIZON") {
            let months: u32 = raw
                .trim()
                .parse()
                .ok()
                .filter(|m| *m >= 1)
                .ok_or_else(|| ForecastError::Config(format!("FORECAST_MAX_HORIZON must be a positive integer, got '{}'", raw)))?;
            config.max_horizon_months = months;
        }

        Ok(config)
    }

    pub fn forecast_url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.forecast_url(), "http://localhost:5000/api/forecast");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("FORECAST_SERVICE_URL", "https://model.example.org/"),
            ("FORECAST_ENDPOINT", "predict"),
            ("FORECAST_TIMEOUT_SECS", "30"),
            ("FORECAST_MAX_HORIZON", "12"),
        ]))
        .unwrap();

        assert_eq!(config.forecast_url(), "https://model.example.org/predict");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_horizon_months, 12);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = ServiceConfig::from_lookup(lookup_from(&[("FORECAST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));

        let err = ServiceConfig::from_lookup(lookup_from(&[("FORECAST_MAX_HORIZON", "0")])).unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }
}
