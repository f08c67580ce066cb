//! Domain models for policy records and their aggregate statistics.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// =============================================================================
// Enumerations
// =============================================================================

/// Insurer issuing a policy. The set is closed; the table enforces the
/// same values with a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "Compañía1")]
    Compania1,
    #[serde(rename = "Compañía2")]
    Compania2,
    #[serde(rename = "Compañía3")]
    Compania3,
    #[serde(rename = "Compañía4")]
    Compania4,
    #[serde(rename = "Compañía5")]
    Compania5,
}

impl Company {
    pub const ALL: [Company; 5] = [
        Company::Compania1,
        Company::Compania2,
        Company::Compania3,
        Company::Compania4,
        Company::Compania5,
    ];

    /// Name as stored in the `nombre_compania` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Company::Compania1 => "Compañía1",
            Company::Compania2 => "Compañía2",
            Company::Compania3 => "Compañía3",
            Company::Compania4 => "Compañía4",
            Company::Compania5 => "Compañía5",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Company {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Company::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::InvalidCompany(s.to_string()))
    }
}

/// Policy category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "automotor")]
    Automotor,
    #[serde(rename = "robo")]
    Robo,
    #[serde(rename = "responsabilidad civil")]
    ResponsabilidadCivil,
    #[serde(rename = "combinado familiar")]
    CombinadoFamiliar,
    #[serde(rename = "integral para comercio")]
    IntegralParaComercio,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Automotor,
        Section::Robo,
        Section::ResponsabilidadCivil,
        Section::CombinadoFamiliar,
        Section::IntegralParaComercio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Automotor => "automotor",
            Section::Robo => "robo",
            Section::ResponsabilidadCivil => "responsabilidad civil",
            Section::CombinadoFamiliar => "combinado familiar",
            Section::IntegralParaComercio => "integral para comercio",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|sec| sec.as_str() == s)
            .ok_or_else(|| AppError::InvalidSection(s.to_string()))
    }
}

/// Policy status, stored as `0`/`1` in the `estado` column and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i16")]
pub enum PolicyStatus {
    Inactive,
    #[default]
    Active,
}

impl PolicyStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            PolicyStatus::Inactive => 0,
            PolicyStatus::Active => 1,
        }
    }
}

impl TryFrom<i64> for PolicyStatus {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PolicyStatus::Inactive),
            1 => Ok(PolicyStatus::Active),
            other => Err(AppError::InvalidStatus(other)),
        }
    }
}

impl From<PolicyStatus> for i16 {
    fn from(status: PolicyStatus) -> Self {
        status.as_i16()
    }
}

impl FromStr for PolicyStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| AppError::Generic(format!("Invalid status value: '{}'", s)))?;
        PolicyStatus::try_from(value)
    }
}

// =============================================================================
// Policy records
// =============================================================================

/// A persisted policy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: i32,
    pub company_id: i32,
    pub company: Company,
    pub policy_number: i32,
    pub issue_date: NaiveDate,
    pub status: PolicyStatus,
    pub premium: i32,
    pub section: Section,
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a new policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPolicy {
    pub company_id: i32,
    pub company: Company,
    pub policy_number: i32,
    pub issue_date: NaiveDate,
    pub status: PolicyStatus,
    pub premium: i32,
    pub section: Section,
}

/// Optional filters for listing policies. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyFilter {
    pub company: Option<Company>,
    pub status: Option<PolicyStatus>,
    /// Inclusive issue-date range.
    pub issued_between: Option<(NaiveDate, NaiveDate)>,
    pub section: Option<Section>,
}

impl PolicyFilter {
    /// Returns true if the policy satisfies every set filter.
    pub fn matches(&self, policy: &Policy) -> bool {
        self.company.is_none_or(|c| c == policy.company)
            && self.status.is_none_or(|s| s == policy.status)
            && self
                .issued_between
                .is_none_or(|(from, to)| policy.issue_date >= from && policy.issue_date <= to)
            && self.section.is_none_or(|s| s == policy.section)
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Number of policies issued by one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: i64,
}

/// Sum of premiums for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyPremium {
    pub company: String,
    pub total: i64,
}

/// Active and inactive totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub active: i64,
    pub inactive: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.active + self.inactive
    }
}

/// Premium totals, per company and overall.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PremiumStats {
    pub by_company: Vec<CompanyPremium>,
    pub total: i64,
}

/// Policies issued in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub count: i64,
    pub premium: i64,
}

/// The four facets of the statistics response.
///
/// Each facet comes from an independent query; facets may reflect slightly
/// different snapshots under concurrent writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyStats {
    pub policies_by_company: Vec<CompanyCount>,
    pub active_vs_inactive: StatusCounts,
    pub policies_by_date: Vec<MonthlyBucket>,
    pub premium_stats: PremiumStats,
}
