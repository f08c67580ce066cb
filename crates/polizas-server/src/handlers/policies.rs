//! Policy CRUD endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::info;

use polizas_core::{AppError, NewPolicy, PolicyFilter};

use crate::dto::{
    CreatePolicyRequest, CreatedResponse, MessageResponse, PolicyQuery, PolicyResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Create a policy record.
#[utoipa::path(
    post,
    path = "/api/polizas",
    request_body = CreatePolicyRequest,
    responses(
        (status = 201, description = "Policy created", body = CreatedResponse),
        (status = 400, description = "Malformed body or value outside the allowed set"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer" = [])),
    tag = "policies"
)]
pub async fn create_policy(
    State(state): State<AppState>,
    payload: Result<Json<CreatePolicyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let policy = NewPolicy::from(request);

    let id = state.policy_repo.insert(&policy).await?;
    info!(
        "Created policy {} ({} #{})",
        id, policy.company, policy.policy_number
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: "Policy created successfully".to_string(),
            id,
        }),
    ))
}

/// List policies, optionally filtered.
///
/// Filters combine with AND. Results are ordered by id.
#[utoipa::path(
    get,
    path = "/api/polizas",
    params(PolicyQuery),
    responses(
        (status = 200, description = "Matching policies", body = Vec<PolicyResponse>),
        (status = 400, description = "Invalid filter value"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer" = [])),
    tag = "policies"
)]
pub async fn list_policies(
    State(state): State<AppState>,
    query: Result<Query<PolicyQuery>, QueryRejection>,
) -> Result<Json<Vec<PolicyResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = PolicyFilter::try_from(query)?;

    let policies = state.policy_repo.list(&filter).await?;

    Ok(Json(
        policies.into_iter().map(PolicyResponse::from).collect(),
    ))
}

/// Get a policy by id.
#[utoipa::path(
    get,
    path = "/api/polizas/{id}",
    params(
        ("id" = i32, Path, description = "Policy identifier")
    ),
    responses(
        (status = 200, description = "Policy found", body = PolicyResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Policy not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer" = [])),
    tag = "policies"
)]
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let policy = state
        .policy_repo
        .get(id)
        .await?
        .ok_or(AppError::PolicyNotFound(id))?;

    Ok(Json(PolicyResponse::from(policy)))
}

/// Delete a policy by id.
#[utoipa::path(
    delete,
    path = "/api/polizas/{id}",
    params(
        ("id" = i32, Path, description = "Policy identifier")
    ),
    responses(
        (status = 200, description = "Policy deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Policy not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer" = [])),
    tag = "policies"
)]
pub async fn delete_policy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.policy_repo.delete(id).await? {
        return Err(AppError::PolicyNotFound(id).into());
    }

    info!("Deleted policy {}", id);
    Ok(Json(MessageResponse::new("Policy deleted successfully")))
}
