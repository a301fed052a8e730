use async_trait::async_trait;
use anyhow::Result;
use crate::models::{ForecastPayload, ForecastRequest};

pub mod service;

/// The external model service: one request, one payload.
#[async_trait]
pub trait ForecastService: Send + Sync {
    fn name(&self) -> &str;
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastPayload>;
}
