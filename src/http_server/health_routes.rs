//! `GET /health`
//!
//! Reports the build version and how many countries the store holds. A
//! store that cannot answer turns the check into a 503 so the process
//! supervisor sees a dead disk, not just a live socket.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::storage::CountryStore;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Live countries, absent when the store failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<usize>,
}

impl HealthResponse {
    fn from_count(count: Option<usize>) -> (StatusCode, Self) {
        let (status_code, status) = match count {
            Some(_) => (StatusCode::OK, "ok"),
            None => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        };
        let body = Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            countries: count,
        };
        (status_code, body)
    }
}

pub fn health_routes(store: Arc<dyn CountryStore>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(store)
}

async fn health_handler(
    State(store): State<Arc<dyn CountryStore>>,
) -> (StatusCode, Json<HealthResponse>) {
    let count = tokio::task::spawn_blocking(move || store.len())
        .await
        .ok()
        .and_then(|result| match result {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(error = %e, code = e.code(), "health check could not read store");
                None
            }
        });

    let (status_code, body) = HealthResponse::from_count(count);
    (status_code, Json(body))
}
