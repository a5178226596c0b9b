use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    storage: StorageHealth,
}

#[derive(Serialize)]
pub struct StorageHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Returns 200 OK if the storage backend answers, 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let storage = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        state.server_deps.store.ping(),
    )
    .await
    {
        Ok(Ok(())) => StorageHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => StorageHealth {
            status: "error".to_string(),
            error: Some(format!("Ping failed: {}", e)),
        },
        Err(_) => StorageHealth {
            status: "error".to_string(),
            error: Some("Ping timeout (>5s)".to_string()),
        },
    };

    let is_healthy = storage.status == "ok";
    let (status_code, overall_status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            storage,
        }),
    )
}
