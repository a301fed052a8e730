use serde::{Deserialize, Serialize};

use crate::models::ForecastPayload;

/// The `uploadedData` record left behind by the data-import step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedData {
    #[serde(default, alias = "barangay")]
    pub locality: Option<String>,
    #[serde(default, alias = "file_name", alias = "filename")]
    pub file_name: Option<String>,
}

/// Client-side key-value entries read once at start-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSeed {
    pub uploaded_data: Option<UploadedData>,
    pub disease_columns: Vec<String>,
}

impl SessionSeed {
    /// Build from the raw stored JSON strings. Unreadable values are treated as absent.
    pub fn from_stored(uploaded_data: Option<&str>, disease_columns: Option<&str>) -> Self {
        let uploaded_data = uploaded_data.and_then(|raw| match serde_json::from_str::<UploadedData>(raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable uploadedData entry");
                None
            }
        });

        let disease_columns = disease_columns
            .and_then(|raw| match serde_json::from_str::<Vec<String>>(raw) {
                Ok(cols) => Some(cols),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring unreadable diseaseColumns entry");
                    None
                }
            })
            .unwrap_or_default();

        Self { uploaded_data, disease_columns }
    }

    /// Locality of the loaded dataset, if one was resolved.
    pub fn locality(&self) -> Option<&str> {
        self.uploaded_data
            .as_ref()
            .and_then(|d| d.locality.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.uploaded_data
            .as_ref()
            .and_then(|d| d.file_name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn has_dataset(&self) -> bool {
        self.uploaded_data.is_some()
    }

    /// Diseases for the selector: the live payload's list when there is one,
    /// otherwise the stored column list.
    pub fn available_diseases(&self, live: Option<&ForecastPayload>) -> Vec<String> {
        match live {
            Some(payload) => {
                let ids = payload.disease_ids();
                if ids.is_empty() {
                    self.disease_columns.clone()
                } else {
                    ids
                }
            }
            None => self.disease_columns.clone(),
        }
    }
}
