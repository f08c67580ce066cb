//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dto::{
    ActiveInactiveDto, CompanyCountDto, CompanyPremiumDto, CreatePolicyRequest, CreatedResponse,
    DatasetBody, DateBucketDto, HealthResponse, LoginRequest, LoginResponse, MessageResponse,
    PolicyQuery, PolicyResponse, PremiumStatsDto, ReportRequestBody, ServiceStatus, StatsResponse,
};
use crate::handlers::{auth, health, policies, reports, stats};

/// OpenAPI documentation for the Polizas API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Polizas API",
        version = "1.0.0",
        description = "Backend for the insurance policy dashboard.

Stores policy records, aggregates them into dashboard statistics and renders
chart or table data into downloadable spreadsheets and PDFs.

## Quick Start

1. Log in: `POST /api/auth/login` with `{\"email\": \"admin@test.com\", \"password\": \"admin123\"}`
2. Send the returned token as `Authorization: Bearer <token>`
3. View statistics: `GET /api/polizas/estadisticas`
",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        policies::create_policy,
        policies::list_policies,
        policies::get_policy,
        policies::delete_policy,
        stats::get_stats,
        reports::excel_report,
        reports::pdf_report,
    ),
    components(
        schemas(
            // Request types
            LoginRequest,
            PolicyQuery,
            CreatePolicyRequest,
            ReportRequestBody,
            DatasetBody,
            // Response types
            HealthResponse,
            ServiceStatus,
            LoginResponse,
            MessageResponse,
            CreatedResponse,
            PolicyResponse,
            StatsResponse,
            CompanyCountDto,
            ActiveInactiveDto,
            DateBucketDto,
            PremiumStatsDto,
            CompanyPremiumDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "system", description = "System health"),
        (name = "auth", description = "Session login and logout"),
        (name = "policies", description = "Policy records and statistics"),
        (name = "reports", description = "Spreadsheet and PDF downloads"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
