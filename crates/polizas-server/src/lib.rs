//! Polizas Server - REST API for the insurance policy dashboard
//!
//! This crate provides an HTTP API over the Polizas core and database crates:
//!
//! - **Auth**: Login issuing signed session tokens, logout
//! - **Policies**: Create, list with filters, fetch and delete policy records
//! - **Statistics**: The dashboard's aggregate facets
//! - **Reports**: Chart and table data rendered to `.xlsx` or `.pdf`
//!
//! # API Documentation
//!
//! When running the server, interactive API documentation is available
//! at `/swagger-ui`.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use auth::TokenIssuer;
pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
