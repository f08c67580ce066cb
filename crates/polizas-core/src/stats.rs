//! Statistics service assembling the dashboard's aggregate facets.
//!
//! # Example
//!
//! ```ignore
//! use polizas_core::StatsService;
//!
//! let stats = StatsService::new(store).get_stats().await?;
//! println!("{} active policies", stats.active_vs_inactive.active);
//! ```

use tracing::debug;

use crate::error::AppError;
use crate::models::{PolicyStats, PolicyStatus, PremiumStats, StatusCounts};
use crate::traits::PolicyStore;

/// Service computing the four statistics facets from the full policy set.
pub struct StatsService<S>
where
    S: PolicyStore,
{
    store: S,
}

impl<S> Clone for StatsService<S>
where
    S: PolicyStore + Clone,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> StatsService<S>
where
    S: PolicyStore,
{
    /// Creates a new statistics service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs every aggregate query and assembles the response.
    ///
    /// Queries run concurrently and share no snapshot. The first failing
    /// query aborts the whole call; partial results are never returned.
    pub async fn get_stats(&self) -> Result<PolicyStats, AppError> {
        let (by_company, active, inactive, premium_by_company, premium_total, by_month) =
            tokio::try_join!(
                self.store.count_by_company(),
                self.store.count_with_status(PolicyStatus::Active),
                self.store.count_with_status(PolicyStatus::Inactive),
                self.store.premium_by_company(),
                self.store.premium_total(),
                self.store.monthly_distribution(),
            )?;

        debug!(
            companies = by_company.len(),
            months = by_month.len(),
            "Statistics computed"
        );

        Ok(PolicyStats {
            policies_by_company: by_company,
            active_vs_inactive: StatusCounts { active, inactive },
            policies_by_date: by_month,
            premium_stats: PremiumStats {
                by_company: premium_by_company,
                total: premium_total,
            },
        })
    }
}
