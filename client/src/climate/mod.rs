pub mod climate_service;
pub mod geo;

pub use climate_service::ClimateService;
pub use geo::normalize_feature_collection;
