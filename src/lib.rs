//! country-service - durable storage for the countries pinned by a user interface
//!
//! Data flow: HTTP request -> `http_server` handler -> `countries` validation
//! -> `storage` record store -> JSON response.

pub mod cli;
pub mod countries;
pub mod http_server;
pub mod observability;
pub mod storage;
