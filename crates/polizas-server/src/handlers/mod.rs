//! HTTP request handlers for API endpoints.

pub mod auth;
pub mod health;
pub mod policies;
pub mod reports;
pub mod stats;
