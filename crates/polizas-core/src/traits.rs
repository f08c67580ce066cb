//! Trait definitions for external dependencies.
//!
//! This module defines traits that abstract over the record store and the
//! credential check, enabling:
//!
//! - **Testability**: Mock implementations for unit testing
//! - **Flexibility**: The credential check can be replaced without touching the server
//! - **Decoupling**: Statistics logic doesn't depend on PostgreSQL
//!
//! # Example
//!
//! ```
//! use polizas_core::traits::PolicyStore;
//! use polizas_core::{AppError, StatusCounts};
//! use polizas_core::models::PolicyStatus;
//!
//! async fn status_counts<S: PolicyStore>(store: &S) -> Result<StatusCounts, AppError> {
//!     Ok(StatusCounts {
//!         active: store.count_with_status(PolicyStatus::Active).await?,
//!         inactive: store.count_with_status(PolicyStatus::Inactive).await?,
//!     })
//! }
//! ```

use std::future::Future;

use crate::models::{
    CompanyCount, CompanyPremium, MonthlyBucket, NewPolicy, Policy, PolicyFilter, PolicyStatus,
};
use crate::AppError;

/// Store for policy persistence and aggregate queries.
///
/// Every method is a single statement; there is no transaction spanning
/// several calls.
pub trait PolicyStore: Send + Sync + Clone {
    /// Inserts a policy and returns the identifier assigned by the store.
    fn insert(&self, policy: &NewPolicy) -> impl Future<Output = Result<i32, AppError>> + Send;

    /// Lists policies matching the filter, ordered by identifier.
    fn list(
        &self,
        filter: &PolicyFilter,
    ) -> impl Future<Output = Result<Vec<Policy>, AppError>> + Send;

    /// Retrieves a policy by identifier.
    fn get_by_id(&self, id: i32) -> impl Future<Output = Result<Option<Policy>, AppError>> + Send;

    /// Deletes a policy. Returns `false` if no row matched.
    fn delete(&self, id: i32) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Number of policies grouped by company name.
    fn count_by_company(&self) -> impl Future<Output = Result<Vec<CompanyCount>, AppError>> + Send;

    /// Number of policies with the given status.
    fn count_with_status(
        &self,
        status: PolicyStatus,
    ) -> impl Future<Output = Result<i64, AppError>> + Send;

    /// Sum of premiums grouped by company name.
    fn premium_by_company(
        &self,
    ) -> impl Future<Output = Result<Vec<CompanyPremium>, AppError>> + Send;

    /// Sum of all premiums (zero for an empty store).
    fn premium_total(&self) -> impl Future<Output = Result<i64, AppError>> + Send;

    /// Counts and premium sums per issue month, oldest month first.
    fn monthly_distribution(
        &self,
    ) -> impl Future<Output = Result<Vec<MonthlyBucket>, AppError>> + Send;

    /// Checks store connectivity.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Identity established by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

/// Verifies login credentials.
///
/// The server holds this behind `Arc<dyn CredentialVerifier>`, so
/// implementations must be object safe.
pub trait CredentialVerifier: Send + Sync {
    /// Returns the authenticated principal, or `None` if the credentials
    /// are not accepted.
    fn verify(&self, email: &str, password: &str) -> Option<Principal>;
}
