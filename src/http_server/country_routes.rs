//! Selected Country HTTP Routes
//!
//! - `GET    /selected-countries/`        list, ordered by name
//! - `POST   /selected-countries/`        validate and upsert
//! - `DELETE /selected-countries/{code}/` delete, idempotent
//!
//! Any other verb on these paths is answered with 405, `HEAD` included.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use crate::countries::{validate, CountryPayload, CountryResponse};
use crate::observability::Event;
use crate::storage::{CountryStore, StorageResult};

// ==================
// Shared State
// ==================

/// Handler state: the record store, injected at startup
pub struct CountryState {
    pub store: Arc<dyn CountryStore>,
}

impl CountryState {
    pub fn new(store: Arc<dyn CountryStore>) -> Self {
        Self { store }
    }
}

// ==================
// Country Routes
// ==================

/// Create selected country routes
pub fn country_routes(state: Arc<CountryState>) -> Router {
    Router::new()
        .route(
            "/selected-countries/",
            get(list_countries_handler)
                .head(method_not_allowed_handler)
                .post(upsert_country_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/selected-countries/:code/",
            delete(delete_country_handler).fallback(method_not_allowed_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Run a store call off the async workers.
async fn with_store<T, F>(state: &CountryState, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn CountryStore) -> StorageResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?;
    Ok(result?)
}

// ==================
// Handlers
// ==================

async fn list_countries_handler(
    State(state): State<Arc<CountryState>>,
) -> ApiResult<Json<Vec<CountryResponse>>> {
    let countries = with_store(&state, |store| store.list()).await?;
    Ok(Json(countries.into_iter().map(CountryResponse::from).collect()))
}

async fn upsert_country_handler(
    State(state): State<Arc<CountryState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CountryResponse>)> {
    let payload = CountryPayload::from_body(&body);
    let country = validate(&payload)?;

    let stored = with_store(&state, move |store| store.upsert(country)).await?;
    tracing::info!(event = %Event::CountryUpserted, code = %stored.code);

    Ok((StatusCode::CREATED, Json(CountryResponse::from(stored))))
}

async fn delete_country_handler(
    State(state): State<Arc<CountryState>>,
    Path(code): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted_code = code.clone();
    with_store(&state, move |store| store.delete(&code)).await?;
    tracing::info!(event = %Event::CountryDeleted, code = %deleted_code);

    Ok(StatusCode::NO_CONTENT)
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
