use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDiseaseRecord {
    pub id: i64,
    pub name: String,
    pub scientific_name: String,
    pub images: Vec<String>,
    pub hosts: Vec<String>,
    pub aliases: Vec<String>,
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment: String,
    pub prevention: String,
}

/// A single ranked candidate returned by the disease recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPrediction {
    pub disease_id: i64,
    pub score: Option<f64>,
    /// Confidence as a fraction in `[0, 1]`, parsed from either a number or a `"93.2%"` label.
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseasePredictions {
    pub predictions: Vec<NormalizedPrediction>,
    pub total: Option<u64>,
}

impl DiseasePredictions {
    /// The "no matching disease" answer.
    pub fn empty() -> Self {
        Self {
            predictions: Vec::new(),
            total: Some(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// Disease detail merged with the metadata of the prediction that pointed at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedDisease {
    #[serde(flatten)]
    pub disease: NormalizedDiseaseRecord,
    pub score: Option<f64>,
    pub confidence: Option<f64>,
}
