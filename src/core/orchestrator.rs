use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::analysis::confidence::{ConfidenceEstimator, StaticConfidence};
use crate::analysis::insight::{self, Insight};
use crate::analysis::series::{self, SummaryStats};
use crate::analysis::statistics::{self, HistoricalSummary};
use crate::config::DEFAULT_MAX_HORIZON;
use crate::core::ledger::{ForecastHistoryEntry, HistoryLedger, LedgerStats};
use crate::core::session::SessionSeed;
use crate::error::ForecastError;
use crate::fetcher::ForecastService;
use crate::models::{DiseaseSelection, ForecastPayload, ForecastRequest, TimePoint};

const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// What the operator asked for. An empty disease list means every known column.
#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    pub diseases: Vec<String>,
    pub horizon_months: u32,
}

/// Result of one successful forecast call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub request: ForecastRequest,
    pub payload: ForecastPayload,
    pub insights: Vec<Insight>,
    pub entries: Vec<ForecastHistoryEntry>,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastView {
    pub chart: Vec<TimePoint>,
    pub summary: Option<SummaryStats>,
    pub insights: Vec<Insight>,
    pub history: HistoricalSummary,
}

/// Derive chart, summary and insights for a payload. Pure; recompute on every selection change.
pub fn build_view(
    payload: &ForecastPayload,
    diseases: &[String],
    selection: &DiseaseSelection,
    locality: &str,
    estimator: &dyn ConfidenceEstimator,
) -> ForecastView {
    let chart = series::build_chart_series(payload, diseases, selection);
    let history = statistics::summarize_actuals(&chart);
    ForecastView {
        summary: series::build_summary(payload, diseases, selection, estimator),
        insights: insight::build_insights(payload, locality),
        chart,
        history,
    }
}

/// The last successful call, kept so views are rebuilt from the same inputs
/// the generation used.
#[derive(Debug, Clone)]
struct LatestForecast {
    request: ForecastRequest,
    payload: ForecastPayload,
    locality: String,
}

impl LatestForecast {
    /// Diseases a view aggregates: the ones that were requested, or the
    /// payload's own list when the request carried none.
    fn diseases(&self) -> Vec<String> {
        if self.request.diseases.is_empty() {
            self.payload.disease_ids()
        } else {
            self.request.diseases.clone()
        }
    }
}

/// Owns one session's forecast flow: validation, the single outstanding
/// service call, and the history ledger.
pub struct Orchestrator {
    service: Arc<dyn ForecastService>,
    estimator: Arc<dyn ConfidenceEstimator>,
    seed: SessionSeed,
    max_horizon_months: u32,
    ledger: Mutex<HistoryLedger>,
    latest: Mutex<Option<LatestForecast>>,
    in_flight: AtomicBool,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn ForecastService>, seed: SessionSeed) -> Self {
        Self {
            service,
            estimator: Arc::new(StaticConfidence::new()),
            seed,
            max_horizon_months: DEFAULT_MAX_HORIZON,
            ledger: Mutex::new(HistoryLedger::new()),
            latest: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn ConfidenceEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_max_horizon(mut self, months: u32) -> Self {
        self.max_horizon_months = months.max(1);
        self
    }

    /// Check every precondition and assemble the service request.
    pub fn build_request(&self, params: &GenerateParams) -> Result<ForecastRequest, ForecastError> {
        if !self.seed.has_dataset() {
            return Err(ForecastError::NoDataset);
        }
        let file = self.seed.file_name().ok_or(ForecastError::NoDataset)?;
        let locality = self.seed.locality().ok_or(ForecastError::NoLocality)?;

        if !has_allowed_extension(file) {
            return Err(ForecastError::UnsupportedFile(file.to_string()));
        }

        if params.horizon_months < 1 || params.horizon_months > self.max_horizon_months {
            return Err(ForecastError::InvalidHorizon {
                requested: params.horizon_months,
                max: self.max_horizon_months,
            });
        }

        let diseases = if params.diseases.is_empty() {
            self.available_diseases()
        } else {
            params.diseases.clone()
        };
        if diseases.is_empty() {
            return Err(ForecastError::NoDiseases);
        }

        Ok(ForecastRequest {
            file: file.to_string(),
            locality: locality.to_string(),
            diseases,
            horizon_months: params.horizon_months,
        })
    }

    /// Validate, call the service and record the result. A failed call leaves
    /// the ledger untouched and is never retried here.
    pub async fn generate(&self, params: GenerateParams) -> Result<Generation, ForecastError> {
        let request = match self.build_request(&params) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "forecast precondition failed");
                return Err(e);
            }
        };

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(ForecastError::RequestInFlight)?;

        let payload = self.service.forecast(&request).await.map_err(|e| {
            tracing::warn!(service = self.service.name(), error = %e, "forecast request failed");
            ForecastError::Service(e.to_string())
        })?;

        let locality = if payload.locality.is_empty() {
            request.locality.clone()
        } else {
            payload.locality.clone()
        };
        let insights = insight::build_insights(&payload, &locality);
        let entries = self
            .ledger()
            .record_generation(&payload, &request, self.estimator.as_ref());

        *self.latest_slot() = Some(LatestForecast {
            request: request.clone(),
            payload: payload.clone(),
            locality,
        });

        Ok(Generation { request, payload, insights, entries })
    }

    /// View of the most recent payload for a selection, or `None` before the first generation.
    pub fn current_view(&self, selection: &DiseaseSelection) -> Option<ForecastView> {
        let latest = self.latest_slot();
        let latest = latest.as_ref()?;
        let diseases = latest.diseases();
        Some(build_view(
            &latest.payload,
            &diseases,
            selection,
            &latest.locality,
            self.estimator.as_ref(),
        ))
    }

    pub fn available_diseases(&self) -> Vec<String> {
        let latest = self.latest_slot();
        self.seed.available_diseases(latest.as_ref().map(|l| &l.payload))
    }

    pub fn history(&self) -> Vec<ForecastHistoryEntry> {
        self.ledger().entries().to_vec()
    }

    pub fn find_entry(&self, id: u64) -> Option<ForecastHistoryEntry> {
        self.ledger().find_entry(id).cloned()
    }

    /// Returns whether an entry was removed.
    pub fn delete_entry(&self, id: u64) -> bool {
        self.ledger().delete_entry(id).is_some()
    }

    pub fn ledger_stats(&self) -> LedgerStats {
        self.ledger().stats()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn ledger(&self) -> MutexGuard<'_, HistoryLedger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn latest_slot(&self) -> MutexGuard<'_, Option<LatestForecast>> {
        self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn has_allowed_extension(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

/// Clears the in-flight flag when the request finishes, however it finishes.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
