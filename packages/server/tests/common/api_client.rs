//! HTTP client for integration testing.
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Client for calling the management API in tests.
#[derive(Clone)]
pub struct ApiClient {
    router: Router,
}

/// Status and decoded JSON body of one call.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Gets a value at the given dotted JSON path.
    ///
    /// # Example
    /// ```ignore
    /// let uid = response.get("operations.0.account_dst.uid");
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let mut current = &self.body;
        for key in path.split('.') {
            current = match key.parse::<usize>() {
                Ok(index) => &current[index],
                Err(_) => &current[key],
            };
        }
        current.clone()
    }

    /// The `error` or `errors` message of a failed call.
    pub fn error(&self) -> String {
        self.body
            .get("error")
            .or_else(|| self.body.get("errors"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

impl ApiClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> ApiResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> ApiResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        ApiResponse { status, body }
    }
}
