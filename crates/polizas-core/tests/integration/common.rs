//! Test utilities and mock implementations for integration tests.
//!
//! Provides an in-memory [`PolicyStore`] for testing `StatsService`
//! without a database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use polizas_core::traits::PolicyStore;
use polizas_core::{
    AppError, Company, CompanyCount, CompanyPremium, MonthlyBucket, NewPolicy, Policy,
    PolicyFilter, PolicyStatus, Section,
};

// =============================================================================
// MockPolicyStore
// =============================================================================

/// In-memory policy store.
///
/// Aggregates are computed the way the SQL queries compute them: grouped by
/// company name or by `YYYY-MM` issue month, with sums of premiums.
#[derive(Clone)]
pub struct MockPolicyStore {
    policies: Arc<Mutex<Vec<Policy>>>,
    next_id: Arc<AtomicI32>,
    fail_queries: Arc<AtomicBool>,
}

impl MockPolicyStore {
    pub fn new() -> Self {
        Self {
            policies: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicI32::new(1)),
            fail_queries: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every aggregate query fail with a database error.
    pub fn fail_aggregates(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.policies.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }

    fn grouped<K: Ord, F: Fn(&Policy) -> K>(&self, key: F) -> BTreeMap<K, (i64, i64)> {
        let policies = self.policies.lock().unwrap();
        let mut groups: BTreeMap<K, (i64, i64)> = BTreeMap::new();
        for policy in policies.iter() {
            let entry = groups.entry(key(policy)).or_default();
            entry.0 += 1;
            entry.1 += i64::from(policy.premium);
        }
        groups
    }
}

impl Default for MockPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore for MockPolicyStore {
    async fn insert(&self, policy: &NewPolicy) -> Result<i32, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.policies.lock().unwrap().push(Policy {
            id,
            company_id: policy.company_id,
            company: policy.company,
            policy_number: policy.policy_number,
            issue_date: policy.issue_date,
            status: policy.status,
            premium: policy.premium,
            section: policy.section,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list(&self, filter: &PolicyFilter) -> Result<Vec<Policy>, AppError> {
        let policies = self.policies.lock().unwrap();
        Ok(policies.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Policy>, AppError> {
        let policies = self.policies.lock().unwrap();
        Ok(policies.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut policies = self.policies.lock().unwrap();
        let before = policies.len();
        policies.retain(|p| p.id != id);
        Ok(policies.len() != before)
    }

    async fn count_by_company(&self) -> Result<Vec<CompanyCount>, AppError> {
        self.check()?;
        Ok(self
            .grouped(|p| p.company.as_str().to_string())
            .into_iter()
            .map(|(company, (count, _))| CompanyCount { company, count })
            .collect())
    }

    async fn count_with_status(&self, status: PolicyStatus) -> Result<i64, AppError> {
        self.check()?;
        let policies = self.policies.lock().unwrap();
        Ok(policies.iter().filter(|p| p.status == status).count() as i64)
    }

    async fn premium_by_company(&self) -> Result<Vec<CompanyPremium>, AppError> {
        self.check()?;
        Ok(self
            .grouped(|p| p.company.as_str().to_string())
            .into_iter()
            .map(|(company, (_, total))| CompanyPremium { company, total })
            .collect())
    }

    async fn premium_total(&self) -> Result<i64, AppError> {
        self.check()?;
        let policies = self.policies.lock().unwrap();
        Ok(policies.iter().map(|p| i64::from(p.premium)).sum())
    }

    async fn monthly_distribution(&self) -> Result<Vec<MonthlyBucket>, AppError> {
        self.check()?;
        Ok(self
            .grouped(|p| p.issue_date.format("%Y-%m").to_string())
            .into_iter()
            .map(|(month, (count, premium))| MonthlyBucket {
                month,
                count,
                premium,
            })
            .collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Creates a policy for the given company, issue date and premium.
pub fn sample_policy(company: Company, date: (i32, u32, u32), premium: i32) -> NewPolicy {
    NewPolicy {
        company_id: 1,
        company,
        policy_number: 1000 + premium,
        issue_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        status: PolicyStatus::Active,
        premium,
        section: Section::Automotor,
    }
}
