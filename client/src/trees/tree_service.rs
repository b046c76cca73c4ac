use shared::{TreeDetailResponse, TreeSearchParams, TreeSearchResponse};

use crate::error::ApiError;
use crate::http::{ApiClient, QueryParams};

/// Urban forest tree locator.
#[derive(Clone)]
pub struct TreeService {
    client: ApiClient,
}

impl TreeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn endpoint(&self) -> &str {
        &self.client.config().tree_locator_url
    }

    /// Trees within `radius` metres of a point, optionally filtered by name.
    pub async fn search(&self, params: &TreeSearchParams) -> Result<TreeSearchResponse, ApiError> {
        let body = serde_json::to_value(params)?;
        let data = self.client.post(self.endpoint(), &body).await?;
        let response: TreeSearchResponse = serde_json::from_value(data)?;
        if !response.success {
            return Err(ApiError::UnexpectedResponse(
                response
                    .error
                    .unwrap_or_else(|| "tree search was not successful".to_string()),
            ));
        }
        log::info!(
            "{} trees within {}m of ({}, {})",
            response.total,
            params.radius,
            params.lat,
            params.lon
        );
        Ok(response)
    }

    pub async fn get_by_id(&self, com_id: &str) -> Result<TreeDetailResponse, ApiError> {
        let params = QueryParams::new().set("com_id", com_id);
        let data = self.client.get(self.endpoint(), &params).await?;
        let response: TreeDetailResponse = serde_json::from_value(data)?;
        if response.tree.is_none() {
            return Err(ApiError::NotFound(format!("Tree {}", com_id)));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::RequestBody;
    use crate::http::fake::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn service(fake: &Arc<FakeTransport>) -> TreeService {
        TreeService::new(ApiClient::with_transport(ApiConfig::default(), fake.clone()))
    }

    #[tokio::test]
    async fn search_posts_parameters() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/TreeLocator",
            200,
            json!({
                "success": true,
                "total": 1,
                "trees": [{
                    "com_id": "1027345",
                    "common_name": "River Red Gum",
                    "latitude": -37.81,
                    "longitude": 144.96,
                    "diameter_breast_height": "45",
                    "distance": 12.5
                }],
                "center": {"lat": -37.81, "lon": 144.96, "radius": 100.0}
            }),
        );

        let params = TreeSearchParams {
            lat: -37.81,
            lon: 144.96,
            radius: 100.0,
            search: None,
        };
        let response = service(&fake).search(&params).await.unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.trees[0].com_id, "1027345");
        assert_eq!(response.trees[0].diameter_breast_height, Some(json!("45")));

        let request = fake.last_request().unwrap();
        match request.body {
            RequestBody::Json(body) => {
                assert_eq!(body, json!({"lat": -37.81, "lon": 144.96, "radius": 100.0}));
            }
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unsuccessful_search_is_an_error() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/TreeLocator",
            200,
            json!({"success": false, "error": "Database query failed"}),
        );
        let params = TreeSearchParams {
            lat: 0.0,
            lon: 0.0,
            radius: 10.0,
            search: Some("gum".into()),
        };
        let err = service(&fake).search(&params).await.unwrap_err();
        assert_eq!(err.to_string(), "Unexpected response: Database query failed");
    }

    #[tokio::test]
    async fn detail_not_found_carries_backend_message() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/TreeLocator",
            404,
            json!({"success": false, "error": "Tree not found"}),
        );
        let err = service(&fake).get_by_id("42").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404: Tree not found");
        assert_eq!(
            fake.last_request().unwrap().query_value("com_id").as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn detail_returns_tree() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/TreeLocator",
            200,
            json!({"success": true, "tree": {"com_id": "42", "year_planted": 1998, "age": 27}}),
        );
        let response = service(&fake).get_by_id("42").await.unwrap();
        assert_eq!(response.tree.unwrap().year_planted, Some(1998));
    }
}
