//! Polizas Core - Domain types, statistics and report rendering.
//!
//! This crate provides the core functionality for Polizas, including:
//!
//! - **Domain models**: [`Policy`], [`NewPolicy`], [`PolicyFilter`], [`PolicyStats`]
//! - **Services**: [`StatsService`] for the dashboard's aggregate facets
//! - **Reports**: [`report`] lays out and renders spreadsheet and PDF documents
//! - **Traits**: [`PolicyStore`] and [`CredentialVerifier`] for dependency injection
//!
//! # Architecture
//!
//! This crate is independent of HTTP and of PostgreSQL. Storage is reached
//! through [`PolicyStore`] (implemented by `polizas-db`) and authentication
//! through [`CredentialVerifier`], so both can be replaced in tests.
//!
//! # Example
//!
//! ```ignore
//! use polizas_core::StatsService;
//!
//! let stats = StatsService::new(store).get_stats().await?;
//! assert_eq!(
//!     stats.active_vs_inactive.total(),
//!     stats.policies_by_company.iter().map(|c| c.count).sum::<i64>()
//! );
//! ```

pub mod credentials;
pub mod error;
pub mod models;
pub mod report;
pub mod stats;
pub mod traits;

// Error handling
pub use error::AppError;

// Domain models
pub use models::{
    Company, CompanyCount, CompanyPremium, MonthlyBucket, NewPolicy, Policy, PolicyFilter,
    PolicyStats, PolicyStatus, PremiumStats, Section, StatusCounts,
};

// Reports
pub use report::{ReportData, ReportFormat, ReportLayout, ReportRequest, Series};

// Traits for dependency injection
pub use traits::{CredentialVerifier, PolicyStore, Principal};

// Services
pub use credentials::StaticCredentialVerifier;
pub use stats::StatsService;
