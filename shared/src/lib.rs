//! Data model shared between the Plant'X API client and anything rendering its results.
//!
//! Every type here is a transient request/response shape: nothing is persisted and
//! nothing performs I/O.

mod climate;
mod disease;
mod page;
mod plant;
mod tree;
mod upload;

pub use climate::{StateTimeseriesPoint, YearMapData};
pub use disease::{DiseasePredictions, ExpandedDisease, NormalizedDiseaseRecord, NormalizedPrediction};
pub use page::PageResult;
pub use plant::{
    IdQuery, Pagination, PlantCard, PlantDetail, PlantFilters, PlantFlags, PlantKind,
    PlantPredictResponse, PlantPrediction, PlantSearchParams, PlantsListPage, Recommendation,
    RecommendedPlant,
};
pub use tree::{SearchCenter, Tree, TreeDetailResponse, TreeSearchParams, TreeSearchResponse};
pub use upload::{DiseaseIdentification, PipelineStage, PlantIdentification, StorageKey, UploadResult};
