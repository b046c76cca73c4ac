use serde_json::Value;
use shared::{PlantKind, Recommendation, RecommendedPlant};

use super::plant_service::PlantService;
use crate::error::ApiError;
use crate::fields::{FieldPath, array_items, first_id, first_number, key, to_id};
use crate::http::{ApiClient, QueryParams};

const ID_LIST_FIELDS: [FieldPath; 4] = [
    key("recommended_plant_ids"),
    key("recommended_ids"),
    key("plant_ids"),
    key("ids"),
];

/// Recommended ids from whichever list field the backend filled, else from `items[].id`.
pub fn normalize_recommendation(raw: Value) -> Recommendation {
    let listed = ID_LIST_FIELDS
        .iter()
        .filter_map(|path| path.get(&raw))
        .find_map(Value::as_array);
    let recommended_plant_ids = match listed {
        Some(ids) => ids.iter().filter_map(to_id).collect(),
        None => array_items(&raw, &[key("items")])
            .iter()
            .filter_map(|item| first_id(item, &[key("id")]))
            .collect(),
    };
    Recommendation {
        recommended_plant_ids,
        raw,
    }
}

fn item_scores(raw: &Value) -> impl Iterator<Item = (i64, Option<f64>)> + '_ {
    array_items(raw, &[key("items")]).iter().filter_map(|item| {
        let id = first_id(item, &[key("id"), key("plant_id")])?;
        Some((id, first_number(item, &[key("score")])))
    })
}

#[derive(Clone)]
pub struct RecommendationService {
    client: ApiClient,
    plants: PlantService,
}

impl RecommendationService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            plants: PlantService::new(client.clone()),
            client,
        }
    }

    pub async fn get_recommendations(&self, lat: f64, lon: f64) -> Result<Recommendation, ApiError> {
        let endpoint = self.client.config().api_url("plant_recommendation");
        let params = QueryParams::new().set("lat", lat).set("lon", lon);
        let data = self.client.get(&endpoint, &params).await?;
        let recommendation = normalize_recommendation(data);
        log::info!(
            "{} plants recommended for ({}, {})",
            recommendation.recommended_plant_ids.len(),
            lat,
            lon
        );
        Ok(recommendation)
    }

    /// Expands a recommendation into general plant cards, keeping any per-item score.
    pub async fn recommended_cards(&self, recommendation: &Recommendation) -> Vec<RecommendedPlant> {
        let scores: Vec<(i64, Option<f64>)> = item_scores(&recommendation.raw).collect();
        let entries = recommendation.recommended_plant_ids.iter().map(|id| {
            let score = scores
                .iter()
                .find(|(scored, _)| scored == id)
                .and_then(|(_, score)| *score);
            (*id, score)
        });

        self.plants
            .cards_with_meta(entries, PlantKind::General)
            .await
            .into_iter()
            .map(|(card, score)| RecommendedPlant { card, score })
            .collect()
    }
}
