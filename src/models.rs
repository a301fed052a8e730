use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One disease's numeric observations. `None` marks a missing value.
pub type Series = Vec<Option<f64>>;

/// Request sent to the forecasting service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastRequest {
    pub file: String,
    #[serde(rename = "barangay", alias = "locality")]
    pub locality: String,
    pub diseases: Vec<String>,
    #[serde(rename = "forecast_months", alias = "horizonMonths")]
    pub horizon_months: u32,
}

/// Historical observations: one shared `dates` axis plus one series per disease column.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct HistoricalData {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(flatten, deserialize_with = "numeric_series_only")]
    pub series: IndexMap<String, Series>,
}

/// Keeps the keys whose value is an array of numbers/nulls. Anything else the
/// service echoes under `historical` is skipped rather than failing the payload.
fn numeric_series_only<'de, D>(deserializer: D) -> Result<IndexMap<String, Series>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    let mut series = IndexMap::with_capacity(raw.len());

    for (key, value) in raw {
        let parsed = value.as_array().and_then(|items| {
            items
                .iter()
                .map(|v| match v {
                    Value::Null => Some(None),
                    Value::Number(n) => n.as_f64().map(Some),
                    _ => None,
                })
                .collect::<Option<Series>>()
        });

        match parsed {
            Some(values) => {
                series.insert(key, values);
            }
            None => tracing::debug!(key = %key, "skipping non-numeric historical field"),
        }
    }

    Ok(series)
}

/// Response of the forecasting service.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPayload {
    #[serde(default, alias = "barangay")]
    pub locality: String,
    #[serde(default)]
    pub historical: HistoricalData,
    #[serde(default, alias = "forecast_dates")]
    pub forecast_dates: Vec<String>,
    #[serde(default)]
    pub predictions: IndexMap<String, Series>,
    #[serde(default, alias = "disease_columns", skip_serializing_if = "Option::is_none")]
    pub disease_columns: Option<Vec<String>>,
}

impl ForecastPayload {
    /// Prediction series for a disease with missing values read as 0.
    /// An absent disease yields an empty series.
    pub fn prediction_values(&self, disease_id: &str) -> Vec<f64> {
        self.predictions
            .get(disease_id)
            .map(|s| s.iter().map(|v| v.unwrap_or(0.0)).collect())
            .unwrap_or_default()
    }

    pub fn prediction_at(&self, disease_id: &str, index: usize) -> f64 {
        self.predictions
            .get(disease_id)
            .and_then(|s| s.get(index).copied().flatten())
            .unwrap_or(0.0)
    }

    pub fn historical_at(&self, disease_id: &str, index: usize) -> f64 {
        self.historical
            .series
            .get(disease_id)
            .and_then(|s| s.get(index).copied().flatten())
            .unwrap_or(0.0)
    }

    /// Authoritative disease list: `diseaseColumns` when the service sent it,
    /// otherwise the prediction keys in payload order.
    pub fn disease_ids(&self) -> Vec<String> {
        match &self.disease_columns {
            Some(cols) if !cols.is_empty() => cols.clone(),
            _ => self.predictions.keys().cloned().collect(),
        }
    }
}

/// Which slice of the payload a view is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseSelection {
    /// Sum across every disease.
    All,
    Disease(String),
}

impl DiseaseSelection {
    /// Parses a selector value; `"all"` (any case) or an empty key selects the aggregate.
    pub fn from_key(key: &str) -> Self {
        let trimmed = key.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            DiseaseSelection::All
        } else {
            DiseaseSelection::Disease(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, DiseaseSelection::All)
    }
}

/// One point on the actual-vs-predicted chart. Exactly one of the two values is set.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimePoint {
    pub period: String,
    pub actual: Option<i64>,
    pub predicted: Option<i64>,
}
