use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

use crate::{DiseasePredictions, ExpandedDisease, PlantPredictResponse};

/// Opaque handle to an uploaded object in remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StorageKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub storage_key: StorageKey,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PipelineStage {
    Uploading,
    Predicting,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantIdentification {
    pub upload: UploadResult,
    pub prediction: PlantPredictResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseIdentification {
    pub upload: UploadResult,
    pub predictions: DiseasePredictions,
    pub diseases: Vec<ExpandedDisease>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_is_transparent() {
        let key = StorageKey::from("uploads/2025/09/04/leaf.png");
        assert_eq!(key.to_string(), "uploads/2025/09/04/leaf.png");
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            serde_json::json!("uploads/2025/09/04/leaf.png")
        );
    }

    #[test]
    fn pipeline_stage_displays_lowercase() {
        assert_eq!(PipelineStage::Predicting.to_string(), "predicting");
    }
}
