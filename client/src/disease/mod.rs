pub mod disease_service;
pub mod normalize;

pub use disease_service::DiseaseService;
