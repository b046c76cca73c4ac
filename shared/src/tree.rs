use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSearchParams {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in metres.
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tree {
    pub com_id: String,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub genus: Option<String>,
    pub family: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub diameter_breast_height: Option<Value>,
    pub year_planted: Option<i32>,
    pub date_planted: Option<String>,
    pub age_description: Option<String>,
    pub maturity_std: Option<String>,
    pub useful_life_expectency: Option<String>,
    pub useful_life_expectency_value: Option<Value>,
    pub located_in: Option<String>,
    /// Distance from the search centre in metres; only set on search results.
    pub distance: Option<f64>,
    pub age: Option<i32>,
    pub uploaddate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCenter {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSearchResponse {
    pub success: bool,
    pub trees: Vec<Tree>,
    pub total: u64,
    pub center: Option<SearchCenter>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDetailResponse {
    pub success: bool,
    pub tree: Option<Tree>,
    pub error: Option<String>,
}
