use shared::PipelineStage;

use crate::storage::UploadValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}{}", display_message(.message))]
    Status { status: u16, message: Option<String> },
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid upload: {0}")]
    Validation(#[from] UploadValidationError),
    #[error("Upload succeeded but no storage key was returned")]
    MissingStorageKey,
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{stage} failed: {source}")]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: Box<ApiError>,
    },
}

fn display_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::Pipeline { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn at_stage(self, stage: PipelineStage) -> Self {
        ApiError::Pipeline {
            stage,
            source: Box::new(self),
        }
    }
}
