//! In-memory transport for tests.
//!
//! Routes are matched against the end of the request path, in registration order.
//! Every request is recorded so tests can assert on what went over the "wire".

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, RwLock};

use super::{HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;

type Responder = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

#[derive(Default)]
pub struct FakeTransport {
    routes: RwLock<Vec<(String, Responder)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests whose path ends with `path_suffix` using `responder`.
    pub fn respond_with<F>(&self, path_suffix: &str, responder: F)
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.routes
            .write()
            .unwrap()
            .push((path_suffix.to_string(), Arc::new(responder)));
    }

    pub fn add_json(&self, path_suffix: &str, status: u16, body: Value) {
        let text = body.to_string();
        self.respond_with(path_suffix, move |_| HttpResponse {
            status,
            text: text.clone(),
        });
    }

    pub fn add_text(&self, path_suffix: &str, status: u16, text: &str) {
        let text = text.to_string();
        self.respond_with(path_suffix, move |_| HttpResponse {
            status,
            text: text.clone(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Recorded requests whose path ends with `path_suffix`.
    pub fn requests_to(&self, path_suffix: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path().ends_with(path_suffix))
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());

        let responder = self
            .routes
            .read()
            .unwrap()
            .iter()
            .find(|(suffix, _)| request.url.path().ends_with(suffix.as_str()))
            .map(|(_, responder)| responder.clone());

        Ok(match responder {
            Some(responder) => responder(&request),
            None => HttpResponse {
                status: 404,
                text: format!(r#"{{"message": "no fake route for {}"}}"#, request.url.path()),
            },
        })
    }
}
