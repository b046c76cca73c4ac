use serde_json::Value;
use shared::{ExpandedDisease, NormalizedDiseaseRecord, NormalizedPrediction, PageResult};

use super::normalize::{normalize_disease, normalize_predictions};
use crate::batch::expand_by_id;
use crate::error::ApiError;
use crate::fields::{key, record_list};
use crate::http::{ApiClient, QueryParams};
use crate::pagination::{PageRequest, RawPage, fetch_page, pick_total};

pub const DEFAULT_SEED: &str = "a";
pub const DEFAULT_PAGE_SIZE: u32 = 8;
// Seeds scanned when the backend ignores `plant_disease_id`.
const FALLBACK_SEEDS: [&str; 9] = ["a", "e", "i", "o", "u", "r", "s", "t", "n"];
const FALLBACK_SCAN_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct DiseaseService {
    client: ApiClient,
}

impl DiseaseService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> String {
        self.client.config().api_url("diseases")
    }

    /// Paged disease search. A blank query searches with the default seed.
    pub async fn search(
        &self,
        q: &str,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<NormalizedDiseaseRecord>, ApiError> {
        let query = match q.trim() {
            "" => DEFAULT_SEED,
            trimmed => trimmed,
        };
        let endpoint = self.endpoint();

        let page = fetch_page(PageRequest::new(page, page_size), |offset, limit| {
            let params = QueryParams::new()
                .set("q", query)
                .set("limit", limit)
                .set("offset", offset);
            let endpoint = endpoint.clone();
            async move {
                let data = self.client.get(&endpoint, &params).await?;
                Ok(RawPage {
                    items: record_list(&data, &[key("items")]),
                    total: pick_total(&data),
                })
            }
        })
        .await?;

        log::info!(
            "Disease search '{}' page {}: {} items, total {}{}",
            query,
            page.page,
            page.items.len(),
            page.total,
            if page.total_is_exact { "" } else { "+" }
        );
        Ok(page.filter_map_items(|raw| normalize_disease(&raw)))
    }

    /// Looks a disease up by id, scanning seed searches if the direct lookup yields nothing.
    pub async fn get_by_id(&self, id: i64) -> Result<NormalizedDiseaseRecord, ApiError> {
        let endpoint = self.endpoint();
        let params = QueryParams::new().set("plant_disease_id", id);

        match self.client.get(&endpoint, &params).await {
            Ok(data) => {
                // Either a one-element `items` list or the bare record.
                let record = match data.get("items") {
                    Some(_) => record_list(&data, &[key("items")])
                        .first()
                        .and_then(normalize_disease),
                    None => normalize_disease(&data),
                };
                if let Some(record) = record.filter(|record| record.id == id) {
                    return Ok(record);
                }
            }
            Err(e) => log::debug!("Direct lookup of disease {} failed: {}", id, e),
        }

        for seed in FALLBACK_SEEDS {
            let params = QueryParams::new()
                .set("q", seed)
                .set("limit", FALLBACK_SCAN_LIMIT)
                .set("offset", 0u32);
            let data = self.client.get(&endpoint, &params).await?;
            let found = record_list(&data, &[key("items")])
                .iter()
                .filter_map(normalize_disease)
                .find(|record| record.id == id);
            if let Some(record) = found {
                return Ok(record);
            }
        }

        Err(ApiError::NotFound(format!("Disease {}", id)))
    }

    /// Fetches the detail of every predicted disease and keeps the prediction's score.
    pub async fn expand_predictions(&self, predictions: &[Value]) -> Vec<ExpandedDisease> {
        self.expand(&normalize_predictions(predictions)).await
    }

    pub async fn expand(&self, predictions: &[NormalizedPrediction]) -> Vec<ExpandedDisease> {
        let entries = predictions
            .iter()
            .map(|p| (p.disease_id, (p.score, p.confidence)));

        expand_by_id(
            entries,
            None,
            self.client.config().batch_concurrency,
            |id| self.get_by_id(id),
        )
        .await
        .into_iter()
        .map(|(disease, (score, confidence))| ExpandedDisease {
            disease,
            score,
            confidence,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::HttpResponse;
    use crate::http::fake::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn service(fake: &Arc<FakeTransport>) -> DiseaseService {
        DiseaseService::new(ApiClient::with_transport(ApiConfig::default(), fake.clone()))
    }

    fn disease(id: i64) -> Value {
        json!({"plant_disease_id": id, "common_name": format!("Disease {}", id)})
    }

    #[tokio::test]
    async fn search_overfetches_when_total_is_missing() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_with("/diseases", |request| {
            let limit: i64 = request.query_value("limit").unwrap().parse().unwrap();
            let items: Vec<Value> = (1..=limit.min(9)).map(disease).collect();
            HttpResponse {
                status: 200,
                text: json!({ "items": items }).to_string(),
            }
        });

        let page = service(&fake).search("  ", 1, 8).await.unwrap();

        assert_eq!(page.items.len(), 8);
        assert!(page.has_next);
        assert_eq!(page.total, 9);
        assert!(!page.total_is_exact);

        let requests = fake.requests_to("/diseases");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query_value("q").as_deref(), Some("a"));
        assert_eq!(requests[1].query_value("limit").as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn search_uses_reported_total() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/diseases",
            200,
            json!({"items": [disease(1), disease(2)], "total": "2"}),
        );

        let page = service(&fake).search("rust", 1, 8).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(!page.has_next);
        assert!(page.total_is_exact);
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test]
    async fn get_by_id_falls_back_to_seed_scan() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_with("/diseases", |request| {
            let items = match (request.query_value("plant_disease_id"), request.query_value("q")) {
                (Some(_), _) => vec![],
                (None, Some(seed)) if seed == "e" => vec![disease(40), disease(41)],
                _ => vec![disease(1)],
            };
            HttpResponse {
                status: 200,
                text: json!({ "items": items }).to_string(),
            }
        });

        let record = service(&fake).get_by_id(41).await.unwrap();
        assert_eq!(record.name, "Disease 41");
        // direct lookup, seed "a", seed "e"
        assert_eq!(fake.request_count(), 3);
    }

    #[tokio::test]
    async fn get_by_id_accepts_bare_record() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/diseases",
            200,
            json!({"plant_disease_id": "5", "common_name": "Rust"}),
        );

        let record = service(&fake).get_by_id(5).await.unwrap();
        assert_eq!(record.id, 5);
        assert_eq!(record.name, "Rust");
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test]
    async fn get_by_id_reports_not_found() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json("/diseases", 200, json!({"items": []}));
        let err = service(&fake).get_by_id(99).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Disease 99 not found");
    }

    #[tokio::test]
    async fn expand_predictions_deduplicates_and_merges_scores() {
        let fake = Arc::new(FakeTransport::new());
        fake.respond_with("/diseases", |request| {
            let id: i64 = request
                .query_value("plant_disease_id")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            HttpResponse {
                status: 200,
                text: json!({ "items": [disease(id)] }).to_string(),
            }
        });

        let expanded = service(&fake)
            .expand_predictions(&[
                json!({"predicted_id": 3, "probability": 0.8, "confidence": "80.00%"}),
                json!({"predicted_id": 3, "probability": 0.1}),
                json!({"predicted_id": 7, "probability": 0.05}),
                json!({"probability": 0.05}),
            ])
            .await;

        let looked_up: Vec<String> = fake
            .requests()
            .iter()
            .filter_map(|r| r.query_value("plant_disease_id"))
            .collect();
        assert_eq!(looked_up.len(), 2);
        assert!(looked_up.contains(&"3".to_string()));
        assert!(looked_up.contains(&"7".to_string()));

        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].disease.id, 3);
        assert_eq!(expanded[0].score, Some(0.8));
        assert_eq!(expanded[0].confidence, Some(0.8));
        assert_eq!(expanded[1].disease.id, 7);
    }
}
