//! Statistics endpoint.

use axum::{Json, extract::State};

use crate::dto::StatsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Get dashboard statistics.
///
/// Returns the four aggregate facets over all policies. If any underlying
/// query fails the whole request fails.
#[utoipa::path(
    get,
    path = "/api/polizas/estadisticas",
    responses(
        (status = 200, description = "Policy statistics", body = StatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer" = [])),
    tag = "policies"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state
        .stats_service
        .get_stats()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(StatsResponse::from(stats)))
}
