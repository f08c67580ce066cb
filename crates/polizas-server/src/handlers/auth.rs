//! Login and logout endpoints.

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

use crate::auth::{AUTH_COOKIE, Claims};
use crate::dto::{LoginRequest, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

fn session_cookie(value: String, secure: bool, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Exchange credentials for a session token.
///
/// The token is returned in the body and also set as an httpOnly cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let Some(principal) = state
        .credentials
        .verify(&request.email, &request.password)
    else {
        warn!("Login rejected for {}", request.email);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let token = state
        .tokens
        .issue(&principal)
        .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))?;

    info!("Login succeeded for {}", principal.email);

    let cookie = session_cookie(
        token.clone(),
        state.cookie_secure,
        time::Duration::hours(state.tokens.ttl_hours()),
    );

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            id: principal.id,
            email: principal.email,
            token,
        }),
    ))
}

/// End the session by expiring the session cookie.
///
/// Tokens are stateless, so an already issued token stays valid until it
/// expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session closed", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!("Logout for {}", claims.email);

    let cookie = session_cookie(String::new(), state.cookie_secure, time::Duration::ZERO);

    (
        jar.add(cookie),
        Json(MessageResponse::new("Session closed successfully")),
    )
}
