use async_trait::async_trait;
use crate::config::ServiceConfig;
use crate::models::{ForecastPayload, ForecastRequest};
use super::ForecastService;
use anyhow::{Result, anyhow};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

pub struct HttpForecastService {
    url: String,
    client: Client,
}

impl HttpForecastService {
    pub fn new(config: &ServiceConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("HealthForecast/0.1"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { url: config.forecast_url(), client }
    }

    /// Message the service put in an `{"error": "..."}` body, if any.
    fn error_message(json: &Value) -> Option<String> {
        match json.get("error") {
            Some(Value::String(msg)) if !msg.is_empty() => Some(msg.clone()),
            _ => None,
        }
    }

    fn parse_payload(json: &Value) -> Result<ForecastPayload> {
        if let Some(msg) = Self::error_message(json) {
            return Err(anyhow!(msg));
        }
        if !json.is_object() {
            return Err(anyhow!("Invalid forecast response: expected a JSON object"));
        }
        if json.get("predictions").map_or(true, |p| !p.is_object()) {
            return Err(anyhow!("Invalid forecast response: missing predictions"));
        }

        let payload: ForecastPayload = serde_json::from_value(json.clone())
            .map_err(|e| anyhow!("Invalid forecast response: {}", e))?;

        for (disease, series) in &payload.predictions {
            if series.len() != payload.forecast_dates.len() {
                tracing::warn!(
                    disease = %disease,
                    predicted = series.len(),
                    periods = payload.forecast_dates.len(),
                    "prediction length differs from forecast dates"
                );
            }
        }

        Ok(payload)
    }
}

#[async_trait]
impl ForecastService for HttpForecastService {
    fn name(&self) -> &str {
        "http"
    }

    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastPayload> {
        tracing::info!(
            url = %self.url,
            locality = %request.locality,
            diseases = request.diseases.len(),
            horizon = request.horizon_months,
            "requesting forecast"
        );

        let resp = self.client.post(&self.url).json(request).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if let Some(msg) = serde_json::from_str::<Value>(&body).ok().as_ref().and_then(Self::error_message) {
                return Err(anyhow!(msg));
            }
            return Err(anyhow!("Forecast service error: {}", status));
        }

        let json: Value = resp.json().await?;
        let payload = Self::parse_payload(&json)?;

        tracing::info!(
            diseases = payload.predictions.len(),
            periods = payload.forecast_dates.len(),
            "forecast received"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_response() {
        let json_data = json!({
            "barangay": "Poblacion",
            "historical": { "dates": ["2024-01-01"], "dengue_cases": [12.0] },
            "forecast_dates": ["2024-02-01", "2024-03-01"],
            "predictions": { "dengue_cases": [14.2, 15.9] }
        });

        let payload = HttpForecastService::parse_payload(&json_data).unwrap();
        assert_eq!(payload.locality, "Poblacion");
        assert_eq!(payload.predictions["dengue_cases"], vec![Some(14.2), Some(15.9)]);
    }

    #[test]
    fn test_error_body_is_verbatim() {
        let json_data = json!({ "error": "No data found for barangay: Nowhere" });
        let err = HttpForecastService::parse_payload(&json_data).unwrap_err();
        assert_eq!(err.to_string(), "No data found for barangay: Nowhere");
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(HttpForecastService::parse_payload(&json!([1, 2, 3])).is_err());
        assert!(HttpForecastService::parse_payload(&json!({ "barangay": "x" })).is_err());
    }

    #[test]
    fn test_short_series_is_not_fatal() {
        let json_data = json!({
            "forecast_dates": ["2024-02-01", "2024-03-01"],
            "predictions": { "dengue_cases": [14.2] }
        });
        let payload = HttpForecastService::parse_payload(&json_data).unwrap();
        assert_eq!(payload.prediction_at("dengue_cases", 1), 0.0);
    }
}
