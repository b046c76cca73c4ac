pub mod id_query;
pub mod normalize;
pub mod plant_service;
pub mod plants_map_service;
pub mod recommendation_service;

pub use id_query::{parse_id_query, split_ids};
pub use plant_service::PlantService;
pub use plants_map_service::PlantsMapService;
pub use recommendation_service::RecommendationService;
