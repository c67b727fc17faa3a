//! # HTTP Server Module
//!
//! Axum server exposing the selected country API.
//!
//! # Endpoints
//!
//! - `/health` - Store-backed health check
//! - `/api/selected-countries/` - List (GET) and upsert (POST)
//! - `/api/selected-countries/{code}/` - Delete (DELETE)

pub mod config;
pub mod country_routes;
pub mod errors;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use country_routes::{country_routes, CountryState};
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
