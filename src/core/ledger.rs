use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::confidence::ConfidenceEstimator;
use crate::analysis::insight::{self, Insight};
use crate::analysis::trend::{self, TrendDirection};
use crate::catalog::registry::Registry;
use crate::core::timeseries::{month_name, period_label, round_value};
use crate::models::{ForecastPayload, ForecastRequest};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Completed,
}

/// One disease x forecast-period row of a generation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastHistoryEntry {
    pub id: u64,
    pub disease_id: String,
    pub disease_label: String,
    pub period: String,
    pub months_ahead: u32,
    pub predicted_value: i64,
    pub trend: TrendDirection,
    pub confidence: u8,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub forecast_horizon: String,
    pub locality: String,
    pub insights: Vec<Insight>,
}

impl ForecastHistoryEntry {
    /// e.g. "Dengue - April 2026"
    pub fn title(&self) -> String {
        format!("{} - {}", self.disease_label, month_name(&self.period))
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub total: usize,
    pub average_confidence: u8,
    pub increasing: usize,
    pub decreasing: usize,
    pub latest_id: Option<u64>,
}

/// "1 Month Ahead", "3 Months Ahead"
pub fn horizon_description(months: u32) -> String {
    if months == 1 {
        "1 Month Ahead".to_string()
    } else {
        format!("{} Months Ahead", months)
    }
}

/// Session-scoped forecast history, newest first. Entries are never mutated.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    entries: Vec<ForecastHistoryEntry>,
    next_id: u64,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_id: 1 }
    }

    /// Record one entry per disease per forecast period and return the new rows.
    pub fn record_generation(
        &mut self,
        payload: &ForecastPayload,
        request: &ForecastRequest,
        estimator: &dyn ConfidenceEstimator,
    ) -> Vec<ForecastHistoryEntry> {
        self.record_generation_at(payload, request, estimator, Utc::now())
    }

    pub fn record_generation_at(
        &mut self,
        payload: &ForecastPayload,
        request: &ForecastRequest,
        estimator: &dyn ConfidenceEstimator,
        created_at: DateTime<Utc>,
    ) -> Vec<ForecastHistoryEntry> {
        let locality = if payload.locality.is_empty() {
            request.locality.clone()
        } else {
            payload.locality.clone()
        };
        let insights = insight::build_insights(payload, &locality);
        let horizon = horizon_description(request.horizon_months);

        let mut created = Vec::with_capacity(payload.predictions.len() * payload.forecast_dates.len());

        for disease_id in payload.predictions.keys() {
            let values = payload.prediction_values(disease_id);
            let direction = trend::classify(&values);
            let confidence = estimator.confidence(disease_id);
            let label = Registry::label(disease_id);

            for (idx, date) in payload.forecast_dates.iter().enumerate() {
                created.push(ForecastHistoryEntry {
                    id: self.allocate_id(),
                    disease_id: disease_id.clone(),
                    disease_label: label.clone(),
                    period: period_label(date),
                    months_ahead: idx as u32 + 1,
                    predicted_value: round_value(payload.prediction_at(disease_id, idx)),
                    trend: direction,
                    confidence,
                    status: EntryStatus::Completed,
                    created_at,
                    file_name: request.file.clone(),
                    forecast_horizon: horizon.clone(),
                    locality: locality.clone(),
                    insights: insights.clone(),
                });
            }
        }

        // Prepend the whole batch, keeping its internal order.
        let mut merged = created.clone();
        merged.append(&mut self.entries);
        self.entries = merged;

        tracing::info!(
            added = created.len(),
            total = self.entries.len(),
            locality = %locality,
            "recorded forecast generation"
        );
        created
    }

    /// Remove one entry. Returns the removed entry, or `None` if the id is unknown.
    pub fn delete_entry(&mut self, id: u64) -> Option<ForecastHistoryEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(pos);
        tracing::debug!(id, remaining = self.entries.len(), "deleted history entry");
        Some(removed)
    }

    pub fn find_entry(&self, id: u64) -> Option<&ForecastHistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ForecastHistoryEntry] {
        &self.entries
    }

    pub fn entries_for_disease(&self, disease_id: &str) -> Vec<&ForecastHistoryEntry> {
        self.entries.iter().filter(|e| e.disease_id == disease_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> LedgerStats {
        let total = self.entries.len();
        let average_confidence = if total == 0 {
            0
        } else {
            let sum: u32 = self.entries.iter().map(|e| e.confidence as u32).sum();
            round_value(sum as f64 / total as f64).clamp(0, 100) as u8
        };

        LedgerStats {
            total,
            average_confidence,
            increasing: self.entries.iter().filter(|e| e.trend == TrendDirection::Increasing).count(),
            decreasing: self.entries.iter().filter(|e| e.trend == TrendDirection::Decreasing).count(),
            latest_id: self.entries.first().map(|e| e.id),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        // `Default` leaves next_id at 0; ids start at 1 either way.
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
