use serde_json::Value;
use shared::{StateTimeseriesPoint, YearMapData};

use super::geo::normalize_feature_collection;
use crate::error::ApiError;
use crate::fields::{key, record_list, to_finite_number};
use crate::http::{ApiClient, QueryParams};

#[derive(Clone)]
pub struct ClimateService {
    client: ApiClient,
}

impl ClimateService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn get(&self, segment: &str) -> Result<Value, ApiError> {
        let url = self.client.config().climate_url(segment);
        self.client.get(&url, &QueryParams::new()).await
    }

    /// Australian state outlines with normalized state names.
    pub async fn australia_geojson(&self) -> Result<Value, ApiError> {
        Ok(normalize_feature_collection(self.get("api/map/geojson").await?))
    }

    /// Threatened Plant Index per state for `year`. Non-numeric entries are skipped.
    pub async fn year_map_data(&self, year: i32) -> Result<YearMapData, ApiError> {
        let data = self.get(&format!("api/map/data/{}", year)).await?;
        let Value::Object(states) = data else {
            return Err(ApiError::UnexpectedResponse(format!(
                "map data for {} is not an object",
                year
            )));
        };
        Ok(states
            .iter()
            .filter_map(|(state, value)| Some((state.clone(), to_finite_number(value)?)))
            .collect())
    }

    pub async fn state_timeseries(&self, state: &str) -> Result<Vec<StateTimeseriesPoint>, ApiError> {
        let segment = format!("api/chart/data/{}", urlencoding::encode(state));
        let data = self.get(&segment).await?;
        let points = record_list(&data, &[key("data"), key("items")])
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(point) => Some(point),
                Err(e) => {
                    log::debug!("Skipping timeseries point for {}: {}", state, e);
                    None
                }
            })
            .collect();
        Ok(points)
    }
}
