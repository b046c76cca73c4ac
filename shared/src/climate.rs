use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// State name to Threatened Plant Index for one year.
pub type YearMapData = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTimeseriesPoint {
    pub year: i32,
    #[serde(default)]
    pub index_value: Option<f64>,
    #[serde(default)]
    pub annual_mean_temp: Option<f64>,
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
