use serde_json::Value;
use shared::PlantsListPage;

use crate::climate::normalize_feature_collection;
use crate::error::ApiError;
use crate::http::{ApiClient, QueryParams};

pub const MAX_LIST_LIMIT: u32 = 100;
/// `all_plants` stops after this many pages even if the backend keeps saying there are more.
pub const MAX_LIST_PAGES: u32 = 200;

/// Map endpoints grouped under `getPlantsList`.
#[derive(Clone)]
pub struct PlantsMapService {
    client: ApiClient,
}

impl PlantsMapService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn url(&self, path: &str) -> String {
        self.client.config().api_url(&format!("getPlantsList/{}", path))
    }

    /// One page of the plant list. `limit` is clamped to `1..=100`.
    pub async fn plants_list(&self, page: u32, limit: u32) -> Result<PlantsListPage, ApiError> {
        let params = QueryParams::new()
            .set("page", page.max(1))
            .set("limit", limit.clamp(1, MAX_LIST_LIMIT));
        let data = self.client.get(&self.url("plants"), &params).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Every plant across all pages, at most [`MAX_LIST_PAGES`] requests.
    pub async fn all_plants(&self, limit: u32) -> Result<Vec<Value>, ApiError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let mut all = Vec::new();
        let mut page = 1;
        let mut has_next = true;

        for _ in 0..MAX_LIST_PAGES {
            let PlantsListPage { plants, pagination } = self.plants_list(page, limit).await?;
            let fetched = plants.len();
            all.extend(plants);

            has_next = match (pagination.has_next, pagination.page, pagination.total_pages) {
                (Some(has_next), reported, _) => {
                    // A reported page behind the requested one must not rewind the walk.
                    page = reported.unwrap_or(page).max(page);
                    has_next
                }
                (None, Some(reported), Some(total_pages)) => reported < total_pages,
                _ => fetched == limit as usize,
            };
            if !has_next {
                break;
            }
            page += 1;
        }

        if has_next {
            log::warn!("Plant list still reports more after {} pages, stopping", MAX_LIST_PAGES);
        }
        log::info!("Loaded {} plants from the plant list", all.len());
        Ok(all)
    }

    /// Plant markers for the map.
    pub async fn map_data(&self) -> Result<Value, ApiError> {
        self.client
            .get(&self.url("getPlantsMapData"), &QueryParams::new())
            .await
    }

    /// State boundaries as a normalized FeatureCollection, optionally for one state.
    pub async fn state_boundaries(&self, state: Option<&str>) -> Result<Value, ApiError> {
        let params = QueryParams::new().set("state", state);
        let data = self
            .client
            .get(&self.url("getPlantsMapData/states/boundaries"), &params)
            .await?;
        let collection = match data {
            Value::Object(mut map) if map.contains_key("boundaries") => {
                map.remove("boundaries").unwrap_or_default()
            }
            other => other,
        };
        Ok(normalize_feature_collection(collection))
    }

    pub async fn plant_detail(&self, plant_id: i64) -> Result<Value, ApiError> {
        let params = QueryParams::new().set("plantId", plant_id);
        self.client.get(&self.url("getPlantDetail"), &params).await
    }
}
