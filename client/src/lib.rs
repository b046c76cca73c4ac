//! Async client for the Plant'X backends: plant and disease search, image
//! identification, plant recommendations, climate maps and the tree locator.
//!
//! Every service shares one [`ApiClient`], which is cheap to clone.

pub mod batch;
pub mod climate;
pub mod config;
pub mod disease;
pub mod error;
pub mod fields;
pub mod http;
pub mod pagination;
pub mod plant;
pub mod storage;
pub mod trees;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use http::{ApiClient, Transport};

use std::sync::Arc;

use climate::ClimateService;
use disease::DiseaseService;
use plant::{PlantService, PlantsMapService, RecommendationService};
use storage::UploadService;
use trees::TreeService;

/// All services over a single client.
#[derive(Clone)]
pub struct PlantX {
    pub diseases: DiseaseService,
    pub plants: PlantService,
    pub recommendations: RecommendationService,
    pub plants_map: PlantsMapService,
    pub uploads: UploadService,
    pub climate: ClimateService,
    pub trees: TreeService,
}

impl PlantX {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::from_client(ApiClient::new(config)?))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self::from_client(ApiClient::with_transport(config, transport))
    }

    pub fn from_client(client: ApiClient) -> Self {
        Self {
            diseases: DiseaseService::new(client.clone()),
            plants: PlantService::new(client.clone()),
            recommendations: RecommendationService::new(client.clone()),
            plants_map: PlantsMapService::new(client.clone()),
            uploads: UploadService::new(client.clone()),
            climate: ClimateService::new(client.clone()),
            trees: TreeService::new(client),
        }
    }
}
