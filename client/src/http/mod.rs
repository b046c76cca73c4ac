//! HTTP plumbing: a mockable transport, query building, safe body parsing and
//! gateway-proxy unwrapping.

mod envelope;
pub mod fake;
mod query;
mod reqwest_transport;

pub use envelope::{ResponseBody, unwrap_gateway_proxy};
pub use query::{QueryParams, QueryValue};
pub use reqwest_transport::ReqwestTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    None,
    Json(Value),
    Multipart(FilePart),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Fully resolved URL, query string included.
    pub url: Url,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub text: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> ResponseBody {
        ResponseBody::parse(&self.text)
    }

    /// The most useful human-readable message in an error body, if any.
    pub fn error_message(&self) -> Option<String> {
        match self.body() {
            ResponseBody::Empty => None,
            ResponseBody::Text(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            ResponseBody::Json(value) => ["message", "error"]
                .iter()
                .filter_map(|key| value.get(key))
                .find_map(|v| match v {
                    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                    _ => None,
                })
                .or_else(|| match &value {
                    Value::Object(map) if map.is_empty() => None,
                    Value::Null => None,
                    other => Some(other.to_string()),
                }),
        }
    }

    pub fn into_status_error(self) -> ApiError {
        let message = self.error_message();
        ApiError::Status {
            status: self.status,
            message,
        }
    }
}

/// Sends one request and returns the raw status and text. Non-2xx is not an error here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Cheaply cloneable handle shared by every service.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    /// Client backed by `reqwest`.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URLs pass through; anything else is joined onto `api_base`.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        match Url::parse(path) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(Url::parse(&self.config.api_base)?.join(path)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        log::debug!("{:?} {}", request.method, request.url);
        self.transport.send(request).await
    }

    /// GET returning the raw response, for callers with their own status policy.
    pub async fn get_raw(&self, path: &str, query: &QueryParams) -> Result<HttpResponse, ApiError> {
        let mut url = self.resolve(path)?;
        query.apply_to(&mut url);
        self.send(HttpRequest {
            method: HttpMethod::Get,
            url,
            body: RequestBody::None,
        })
        .await
    }

    pub async fn get(&self, path: &str, query: &QueryParams) -> Result<Value, ApiError> {
        let response = self.get_raw(path, query).await?;
        Self::read_success(response)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.resolve(path)?;
        let response = self
            .send(HttpRequest {
                method: HttpMethod::Post,
                url,
                body: RequestBody::Json(body.clone()),
            })
            .await?;
        Self::read_success(response)
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        query: &QueryParams,
        file: FilePart,
    ) -> Result<HttpResponse, ApiError> {
        let mut url = self.resolve(path)?;
        query.apply_to(&mut url);
        self.send(HttpRequest {
            method: HttpMethod::Post,
            url,
            body: RequestBody::Multipart(file),
        })
        .await
    }

    /// Non-2xx becomes an error; the body is parsed leniently and unwrapped once.
    pub fn read_success(response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(response.into_status_error());
        }
        Ok(unwrap_gateway_proxy(response.body()).into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeTransport;
    use super::*;
    use serde_json::json;

    fn client(fake: &Arc<FakeTransport>) -> ApiClient {
        ApiClient::with_transport(ApiConfig::default(), fake.clone())
    }

    #[tokio::test]
    async fn get_resolves_relative_paths_and_drops_empty_params() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json("/plants", 200, json!({"items": []}));

        let query = QueryParams::new().set("q", "fern").set("watering", "");
        let value = client(&fake).get("/plants", &query).await.unwrap();

        assert_eq!(value, json!({"items": []}));
        let request = fake.last_request().unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:3000/plants?q=fern");
    }

    #[tokio::test]
    async fn get_unwraps_proxy_envelope() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json(
            "/wrapped",
            200,
            json!({"statusCode": 200, "body": "{\"total\": 2}"}),
        );
        let value = client(&fake).get("/wrapped", &QueryParams::new()).await.unwrap();
        assert_eq!(value, json!({"total": 2}));
    }

    #[tokio::test]
    async fn malformed_success_body_is_returned_as_text() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_text("/text", 200, "not json");
        let value = client(&fake).get("/text", &QueryParams::new()).await.unwrap();
        assert_eq!(value, json!("not json"));
    }

    #[tokio::test]
    async fn non_success_carries_status_and_message() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json("/boom", 500, json!({"error": "database unavailable"}));
        fake.add_text("/bare", 503, "");

        let err = client(&fake).get("/boom", &QueryParams::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: database unavailable");

        let err = client(&fake).get("/bare", &QueryParams::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let fake = Arc::new(FakeTransport::new());
        fake.add_json("TreeLocator", 200, json!({"success": true}));
        let body = json!({"lat": -37.8, "lon": 144.9, "radius": 500});

        client(&fake)
            .post("https://gateway.test/test/TreeLocator", &body)
            .await
            .unwrap();

        let request = fake.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body, RequestBody::Json(body));
    }

    #[test]
    fn error_message_prefers_message_then_error_then_text() {
        let response = HttpResponse {
            status: 400,
            text: r#"{"message": "bad key", "error": "ignored"}"#.into(),
        };
        assert_eq!(response.error_message().as_deref(), Some("bad key"));

        let response = HttpResponse {
            status: 400,
            text: r#"{"detail": "x"}"#.into(),
        };
        assert_eq!(response.error_message().as_deref(), Some(r#"{"detail":"x"}"#));

        let response = HttpResponse {
            status: 502,
            text: "Bad Gateway".into(),
        };
        assert_eq!(response.error_message().as_deref(), Some("Bad Gateway"));
    }
}
