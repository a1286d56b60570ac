//! Bearer-token authentication middleware

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use masthead_common::{
    auth::extract_bearer,
    errors::{AppError, Result},
};

/// Gate for protected operations.
///
/// Validates the bearer token and attaches the decoded [`AdminIdentity`]
/// to the request extensions for downstream handlers.
///
/// [`AdminIdentity`]: masthead_common::auth::AdminIdentity
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing Authorization header".to_string(),
        })?;

    let token = extract_bearer(auth_header).ok_or_else(|| AppError::Unauthorized {
        message: "Authorization header is not a bearer token".to_string(),
    })?;

    let identity = state.jwt.identity_from_token(token)?;

    tracing::debug!(admin = %identity.username, "Authenticated admin request");

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
