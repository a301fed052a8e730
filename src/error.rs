use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("No dataset loaded. Please upload a dataset in Data Import first.")]
    NoDataset,

    #[error("No barangay found in the uploaded data. Please re-upload your dataset in Data Import.")]
    NoLocality,

    #[error("Unsupported file '{0}'. Please upload a .csv, .xlsx or .xls file in Data Import.")]
    UnsupportedFile(String),

    #[error("Forecast horizon must be between 1 and {max} months (got {requested}).")]
    InvalidHorizon { requested: u32, max: u32 },

    #[error("No disease columns selected. Please upload a dataset with disease columns in Data Import.")]
    NoDiseases,

    #[error("A forecast request is already in progress.")]
    RequestInFlight,

    /// Message from the forecasting service, unchanged.
    #[error("{0}")]
    Service(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ForecastError {
    /// Raised before any service call is attempted.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ForecastError::NoDataset
                | ForecastError::NoLocality
                | ForecastError::UnsupportedFile(_)
                | ForecastError::InvalidHorizon { .. }
                | ForecastError::NoDiseases
        )
    }
}
