pub mod config;
pub mod error;
pub mod models;
pub mod catalog;
pub mod analysis;
pub mod core;
pub mod fetcher;

pub use crate::analysis::confidence::{ConfidenceEstimator, StaticConfidence};
pub use crate::analysis::insight::{Insight, InsightSeverity};
pub use crate::analysis::series::SummaryStats;
pub use crate::analysis::trend::TrendDirection;
pub use crate::catalog::registry::Registry;
pub use crate::config::ServiceConfig;
pub use crate::core::ledger::{ForecastHistoryEntry, HistoryLedger};
pub use crate::core::orchestrator::{build_view, ForecastView, GenerateParams, Generation, Orchestrator};
pub use crate::core::session::SessionSeed;
pub use crate::error::ForecastError;
pub use crate::fetcher::ForecastService;
pub use crate::models::{DiseaseSelection, ForecastPayload, ForecastRequest, TimePoint};
