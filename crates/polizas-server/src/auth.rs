//! Session tokens and the middleware protecting the policy endpoints.
//!
//! Login issues an HS256-signed JWT which clients send back as
//! `Authorization: Bearer <token>`. The same token is also set as the
//! `authToken` cookie for browser clients.

use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use polizas_core::{AppError, Principal};

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Name of the session cookie set at login and cleared at logout.
pub const AUTH_COOKIE: &str = "authToken";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id
    pub sub: String,
    pub email: String,
    /// Issued at (seconds since the epoch)
    pub iat: i64,
    /// Expiry (seconds since the epoch)
    pub exp: i64,
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_hours: i64,
}

impl TokenIssuer {
    /// Fails when the secret is empty or only whitespace.
    pub fn new(secret: &str, ttl_hours: u32) -> Result<Self, AppError> {
        if secret.trim().is_empty() {
            return Err(AppError::ConfigError(
                "JWT secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_hours: i64::from(ttl_hours),
        })
    }

    /// Token lifetime in hours, also used as the cookie max-age.
    pub fn ttl_hours(&self) -> i64 {
        self.ttl_hours
    }

    /// Issues a token for an authenticated principal.
    pub fn issue(&self, principal: &Principal) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            iat: now,
            exp: now + self.ttl_hours * 3600,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

fn unauthorized(message: &str) -> Response {
    let body = ErrorResponse {
        error: "unauthorized".to_string(),
        message: message.to_string(),
        details: None,
    };
    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

/// Middleware that validates `Authorization: Bearer <token>` against the token issuer.
///
/// - If the header is missing, returns 401 Unauthorized.
/// - If the token has a bad signature or has expired, returns 401 Unauthorized.
///
/// Verified [`Claims`] are stored in the request extensions.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return unauthorized("Missing Authorization header. Expected: Bearer <token>");
    };

    match state.tokens.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!("Rejected session token: {}", e);
            unauthorized("Invalid or expired token")
        }
    }
}
