use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlantKind {
    General,
    Threatened,
}

/// Minimal plant information for list and card views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id_type", rename_all = "lowercase")]
pub enum PlantCard {
    General {
        general_plant_id: i64,
        common_name: String,
        scientific_name: String,
        image_url: Option<String>,
    },
    Threatened {
        threatened_plant_id: i64,
        common_name: String,
        scientific_name: String,
        image_url: Option<String>,
    },
}

impl PlantCard {
    pub fn kind(&self) -> PlantKind {
        match self {
            PlantCard::General { .. } => PlantKind::General,
            PlantCard::Threatened { .. } => PlantKind::Threatened,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            PlantCard::General {
                general_plant_id, ..
            } => *general_plant_id,
            PlantCard::Threatened {
                threatened_plant_id,
                ..
            } => *threatened_plant_id,
        }
    }

    pub fn common_name(&self) -> &str {
        match self {
            PlantCard::General { common_name, .. } | PlantCard::Threatened { common_name, .. } => {
                common_name
            }
        }
    }
}

/// Yes/no attributes; `None` when the backend did not say.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantFlags {
    pub threatened: Option<bool>,
    pub edible: Option<bool>,
    pub indoors: Option<bool>,
    pub medicinal: Option<bool>,
    pub poisonous: Option<bool>,
    pub fruits: Option<bool>,
    pub flowers: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantDetail {
    pub plant_id: Option<i64>,
    pub general_plant_id: Option<i64>,
    pub threatened_plant_id: Option<i64>,
    pub common_name: String,
    pub scientific_name: String,
    pub other_names: Vec<String>,
    pub flags: PlantFlags,
    pub sun_expose: Vec<String>,
    pub watering: Option<String>,
    pub plant_cycle: Option<String>,
    pub growth_rate: Option<String>,
    pub image_urls: Vec<String>,
    // Free-form sections rendered as-is by the UI.
    pub description: Option<Value>,
    pub care_guide: Option<Value>,
    pub distribution_map_html: Option<String>,
    pub threatened: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantFilters {
    pub threatened: Option<bool>,
    pub edible: Option<bool>,
    pub medicinal: Option<bool>,
    pub fruits: Option<bool>,
    pub indoors: Option<bool>,
    pub poisonous: Option<bool>,
    pub flowers: Option<bool>,
    pub sun: Vec<String>,
    pub watering: Option<String>,
    pub cycle: Option<String>,
    pub growth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSearchParams {
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub filters: PlantFilters,
}

impl Default for PlantSearchParams {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            page_size: 12,
            filters: PlantFilters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantPrediction {
    pub plant_id: i64,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantPredictResponse {
    pub s3_key: String,
    pub count: u32,
    pub results: Vec<PlantPrediction>,
}

/// Result of parsing a typed id query such as `t#12, 14` or `ids: 3 4`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdQuery {
    /// `None` when the input is not an id query at all.
    pub kind: Option<PlantKind>,
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_plant_ids: Vec<i64>,
    /// The backend payload, kept for weather and location details.
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPlant {
    pub card: PlantCard,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub has_next: Option<bool>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantsListPage {
    #[serde(default)]
    pub plants: Vec<Value>,
    #[serde(default)]
    pub pagination: Pagination,
}
