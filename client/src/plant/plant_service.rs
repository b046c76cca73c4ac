use serde_json::Value;
use shared::{PageResult, PlantCard, PlantDetail, PlantKind, PlantSearchParams};

use super::id_query::parse_id_query;
use super::normalize::{apply_filters, card_from_detail, normalize_card, normalize_detail};
use crate::batch::expand_by_id;
use crate::error::ApiError;
use crate::fields::{key, record_list};
use crate::http::{ApiClient, QueryParams};
use crate::pagination::{PageRequest, RawPage, fetch_page, pick_total};

pub const DEFAULT_SEED: &str = "a";
/// Plant id expansions never look up more than this many unique ids.
pub const MAX_CARD_IDS: usize = 12;

#[derive(Clone)]
pub struct PlantService {
    client: ApiClient,
}

impl PlantService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> String {
        self.client.config().api_url("plants")
    }

    /// Paged plant search with filters.
    ///
    /// A search text that is an id query (`#12 14`, `t#3`) is answered with the
    /// cards of those ids as a single exact page. An id query without valid ids
    /// falls back to a text search.
    pub async fn search(&self, params: &PlantSearchParams) -> Result<PageResult<PlantCard>, ApiError> {
        let search = params.search.as_deref().map(str::trim).unwrap_or_default();

        let id_query = parse_id_query(search);
        if let (Some(kind), false) = (id_query.kind, id_query.ids.is_empty()) {
            let cards = self.cards_by_ids(&id_query.ids, kind).await;
            log::info!("Plant id query {:?} matched {} {} cards", id_query.ids, cards.len(), kind);
            let total = cards.len() as u64;
            return Ok(PageResult {
                items: cards,
                page: 1,
                page_size: params.page_size.max(1),
                total,
                has_next: false,
                total_is_exact: true,
            });
        }

        let query = if search.is_empty() { DEFAULT_SEED } else { search };
        let endpoint = self.endpoint();
        let mut base = QueryParams::new().set("q", query);
        apply_filters(&mut base, &params.filters);

        let page = fetch_page(PageRequest::new(params.page, params.page_size), |offset, limit| {
            let query = base.clone().set("limit", limit).set("offset", offset);
            let endpoint = endpoint.clone();
            async move {
                let data = self.client.get(&endpoint, &query).await?;
                Ok(RawPage {
                    items: record_list(&data, &[key("items"), key("plants"), key("results")]),
                    total: pick_total(&data),
                })
            }
        })
        .await?;

        log::info!(
            "Plant search '{}' page {}: {} items, total {}{}",
            query,
            page.page,
            page.items.len(),
            page.total,
            if page.total_is_exact { "" } else { "+" }
        );
        Ok(page.filter_map_items(|raw| normalize_card(&raw)))
    }

    async fn detail(&self, kind: PlantKind, id: i64) -> Result<PlantDetail, ApiError> {
        let id_param = match kind {
            PlantKind::General => "general_plant_id",
            PlantKind::Threatened => "threatened_plant_id",
        };
        let params = QueryParams::new().set(id_param, id);
        let data: Value = self.client.get(&self.endpoint(), &params).await?;
        normalize_detail(&data).ok_or_else(|| ApiError::NotFound(format!("Plant {} {}", kind, id)))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<PlantDetail, ApiError> {
        self.detail(PlantKind::General, id).await
    }

    pub async fn get_threatened_by_id(&self, id: i64) -> Result<PlantDetail, ApiError> {
        self.detail(PlantKind::Threatened, id).await
    }

    /// Cards for up to [`MAX_CARD_IDS`] unique ids, in first-seen order. Ids whose
    /// lookup fails are left out.
    pub async fn cards_by_ids(&self, ids: &[i64], kind: PlantKind) -> Vec<PlantCard> {
        self.cards_with_meta(ids.iter().map(|id| (*id, ())), kind)
            .await
            .into_iter()
            .map(|(card, ())| card)
            .collect()
    }

    /// Like [`PlantService::cards_by_ids`], carrying per-id metadata along.
    pub async fn cards_with_meta<M>(
        &self,
        entries: impl IntoIterator<Item = (i64, M)>,
        kind: PlantKind,
    ) -> Vec<(PlantCard, M)> {
        expand_by_id(
            entries,
            Some(MAX_CARD_IDS),
            self.client.config().batch_concurrency,
            |id| async move {
                let detail = self.detail(kind, id).await?;
                card_from_detail(detail, kind)
                    .ok_or_else(|| ApiError::NotFound(format!("Plant {} {}", kind, id)))
            },
        )
        .await
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

    fn service(fake: &Arc<FakeTransport>) -> PlantService {
        PlantService::new(ApiClient::with_transport(ApiConfig::default(), fake.clone()))
    }

    fn serve_details(fake: &FakeTransport) {
        fake.respond_with("/plants", |request| {
            let general = request.query_value("general_plant_id");
            let threatened = request.query_value("threatened_plant_id");
            let body = match (general, threatened) {
                (Some(id), _) if id == "404" => json!({"items": []}),
                (Some(id), _) => json!({"items": [{
                    "general_plant_id": id.parse::<i64>().unwrap(),
                    "common_name": format!("Plant {}", id),
                    "image_urls": ["map.png", "photo.jpg"]
                }]}),
                (None, Some(id)) => json!({
                    "threatened_plant_id": id.parse::<i64>().unwrap(),
                    "common_name": "Threatened",
                    "image_urls": ["first.jpg"]
                }),
                (None, None) => json!({"items": []}),
            };
            HttpResponse {
                status: 200,
                text: body.to_string(),
            }
        });
    }

    #[tokio::test]
    async fn search_sends_seed_and_filters() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/plants",
            200,
            json!({
                "items": [
                    {"id_type": "general", "general_plant_id": 1, "common_name": "Wattle"},
                    {"id_type": "threatened", "threatened_plant_id": 2, "common_name": "Orchid"},
                    {"common_name": "no id"}
                ],
                "total": 3
            }),
        );

        let mut params = PlantSearchParams::default();
        params.filters.edible = Some(true);
        params.filters.sun = vec!["full sun".into(), "part shade".into()];
        let page = service(&fake).search(&params).await.unwrap();

        assert_eq!(page.total, 3);
        assert!(page.total_is_exact);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].kind(), PlantKind::Threatened);

        let request = fake.last_request().unwrap();
        assert_eq!(request.query_value("q").as_deref(), Some("a"));
        assert_eq!(request.query_value("limit").as_deref(), Some("12"));
        assert_eq!(request.query_value("offset").as_deref(), Some("0"));
        assert_eq!(request.query_value("if_edible").as_deref(), Some("true"));
        assert_eq!(
            request.query_value("sun_expose").as_deref(),
            Some("full sun,part shade")
        );
        assert_eq!(request.query_value("if_poisonous"), None);
    }

    #[tokio::test]
    async fn search_with_id_query_expands_cards() {
        let fake = Arc::new(FakeTransport::new());
        serve_details(&fake);

        let params = PlantSearchParams {
            search: Some("#5, 6；5".into()),
            ..PlantSearchParams::default()
        };
        let page = service(&fake).search(&params).await.unwrap();

        let ids: Vec<i64> = page.items.iter().map(PlantCard::id).collect();
        assert_eq!(ids, vec![5, 6]);
        assert!(page.total_is_exact);
        assert!(!page.has_next);
        assert_eq!(fake.request_count(), 2);
    }

    #[tokio::test]
    async fn get_by_id_reads_wrapped_detail() {
        let fake = Arc::new(FakeTransport::new());
        serve_details(&fake);

        let detail = service(&fake).get_by_id(9).await.unwrap();
        assert_eq!(detail.general_plant_id, Some(9));
        assert_eq!(detail.common_name, "Plant 9");

        let err = service(&fake).get_by_id(404).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn threatened_lookup_uses_its_own_parameter() {
        let fake = Arc::new(FakeTransport::new());
        serve_details(&fake);

        let detail = service(&fake).get_threatened_by_id(4).await.unwrap();
        assert_eq!(detail.threatened_plant_id, Some(4));
        let request = fake.last_request().unwrap();
        assert_eq!(request.query_value("threatened_plant_id").as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn cards_by_ids_caps_and_drops_failures() {
        let fake = Arc::new(FakeTransport::new());
        serve_details(&fake);

        let mut ids: Vec<i64> = vec![404];
        ids.extend(1..=20);
        let cards = service(&fake).cards_by_ids(&ids, PlantKind::General).await;

        assert_eq!(fake.request_count(), MAX_CARD_IDS);
        assert_eq!(cards.len(), MAX_CARD_IDS - 1);
        assert_eq!(cards[0].id(), 1);
        assert!(matches!(
            &cards[0],
            PlantCard::General { image_url: Some(url), .. } if url == "photo.jpg"
        ));
    }
}
