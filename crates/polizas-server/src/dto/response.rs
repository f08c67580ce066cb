//! Response DTOs for API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use polizas_core::{Policy, PolicyStats};

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("healthy" or "degraded")
    pub status: String,
    /// Server version
    pub version: String,
    /// Database connectivity status
    pub database: ServiceStatus,
}

/// Status of an individual service component.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    /// Whether the service is reachable
    pub healthy: bool,
    /// Optional message (e.g., error details)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

/// Successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    /// Session token to send as `Authorization: Bearer <token>`
    pub token: String,
}

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Policies
// =============================================================================

/// Result of creating a policy.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    /// Identifier assigned by the store
    pub id: i32,
}

/// A policy record, with the column names used by the dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct PolicyResponse {
    pub id: i32,
    pub id_compania: i32,
    #[schema(example = "Compañía1")]
    pub nombre_compania: String,
    pub numero_poliza: i32,
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub fecha_emision: NaiveDate,
    /// 1 active, 0 inactive
    pub estado: i16,
    pub prima: i32,
    #[schema(example = "automotor")]
    pub seccion: String,
    pub created_at: DateTime<Utc>,
}

impl From<Policy> for PolicyResponse {
    fn from(p: Policy) -> Self {
        Self {
            id: p.id,
            id_compania: p.company_id,
            nombre_compania: p.company.to_string(),
            numero_poliza: p.policy_number,
            fecha_emision: p.issue_date,
            estado: p.status.as_i16(),
            prima: p.premium,
            seccion: p.section.to_string(),
            created_at: p.created_at,
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyCountDto {
    pub company: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveInactiveDto {
    pub active: i64,
    pub inactive: i64,
}

/// Policies issued in one month.
#[derive(Debug, Serialize, ToSchema)]
pub struct DateBucketDto {
    /// Month as `YYYY-MM`
    #[schema(example = "2024-03")]
    pub date: String,
    pub count: i64,
    pub premium: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyPremiumDto {
    pub company: String,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatsDto {
    pub by_company: Vec<CompanyPremiumDto>,
    pub total: i64,
}

/// The four dashboard facets.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub policies_by_company: Vec<CompanyCountDto>,
    pub active_vs_inactive: ActiveInactiveDto,
    /// Oldest month first
    pub policies_by_date: Vec<DateBucketDto>,
    pub premium_stats: PremiumStatsDto,
}

impl From<PolicyStats> for StatsResponse {
    fn from(s: PolicyStats) -> Self {
        Self {
            policies_by_company: s
                .policies_by_company
                .into_iter()
                .map(|c| CompanyCountDto {
                    company: c.company,
                    count: c.count,
                })
                .collect(),
            active_vs_inactive: ActiveInactiveDto {
                active: s.active_vs_inactive.active,
                inactive: s.active_vs_inactive.inactive,
            },
            policies_by_date: s
                .policies_by_date
                .into_iter()
                .map(|b| DateBucketDto {
                    date: b.month,
                    count: b.count,
                    premium: b.premium,
                })
                .collect(),
            premium_stats: PremiumStatsDto {
                by_company: s
                    .premium_stats
                    .by_company
                    .into_iter()
                    .map(|c| CompanyPremiumDto {
                        company: c.company,
                        total: c.total,
                    })
                    .collect(),
                total: s.premium_stats.total,
            },
        }
    }
}
