use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_API_ROOT: &str = "https://ky21h193r2.execute-api.us-east-1.amazonaws.com/plantx";
pub const DEFAULT_CLIMATE_BASE: &str = "http://plantx-alb-1374376113.us-east-1.elb.amazonaws.com";
pub const DEFAULT_TREE_LOCATOR_URL: &str =
    "https://ky21h193r2.execute-api.us-east-1.amazonaws.com/test/TreeLocator";
pub const DEFAULT_BATCH_CONCURRENCY: usize = 6;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base for relative paths passed to the generic `get`/`post` helpers.
    pub api_base: String,
    /// API gateway stage hosting plants, diseases, uploads and recommendations.
    pub api_root: String,
    pub climate_base: String,
    pub tree_locator_url: String,
    pub request_timeout_secs: Option<u64>,
    pub batch_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
            climate_base: DEFAULT_CLIMATE_BASE.to_string(),
            tree_locator_url: DEFAULT_TREE_LOCATOR_URL.to_string(),
            request_timeout_secs: None,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Every key is optional so a file can override a single endpoint.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base: Option<String>,
    api_root: Option<String>,
    climate_base: Option<String>,
    tree_locator_url: Option<String>,
    request_timeout_secs: Option<u64>,
    batch_concurrency: Option<usize>,
    max_upload_bytes: Option<usize>,
}

impl ApiConfig {
    /// Defaults, then the YAML file named by `PLANTX_CONFIG`, then `PLANTX_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("PLANTX_CONFIG") {
            config = config.merge_file(&path)?;
        }
        config.apply_env(|key| std::env::var(key).ok())
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::default().merge_file(path)
    }

    fn merge_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path.as_ref())?;
        let file: ConfigFile = serde_yaml::from_str(&config_str)?;
        log::debug!("Loaded config overrides from {}", path.as_ref().display());

        if let Some(v) = file.api_base {
            self.api_base = v;
        }
        if let Some(v) = file.api_root {
            self.api_root = v;
        }
        if let Some(v) = file.climate_base {
            self.climate_base = v;
        }
        if let Some(v) = file.tree_locator_url {
            self.tree_locator_url = v;
        }
        if file.request_timeout_secs.is_some() {
            self.request_timeout_secs = file.request_timeout_secs;
        }
        if let Some(v) = file.batch_concurrency {
            self.batch_concurrency = v.max(1);
        }
        if let Some(v) = file.max_upload_bytes {
            self.max_upload_bytes = v;
        }
        Ok(self)
    }

    /// Applies environment overrides read through `lookup`. Blank values are ignored.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PLANTX_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = get("PLANTX_API_ROOT") {
            self.api_root = v;
        }
        if let Some(v) = get("PLANTX_CLIMATE_BASE") {
            self.climate_base = v;
        }
        if let Some(v) = get("PLANTX_TREE_LOCATOR_URL") {
            self.tree_locator_url = v;
        }
        if let Some(v) = get("PLANTX_BATCH_CONCURRENCY") {
            let parsed: usize = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "PLANTX_BATCH_CONCURRENCY",
                    value: v.clone(),
                })?;
            self.batch_concurrency = parsed.max(1);
        }
        if let Some(v) = get("PLANTX_TIMEOUT_SECS") {
            let parsed: u64 = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PLANTX_TIMEOUT_SECS",
                value: v.clone(),
            })?;
            self.request_timeout_secs = Some(parsed);
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `{api_root}/{segment}` without doubled slashes.
    pub fn api_url(&self, segment: &str) -> String {
        join_url(&self.api_root, segment)
    }

    pub fn climate_url(&self, segment: &str) -> String {
        join_url(&self.climate_base, segment)
    }
}

fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}
