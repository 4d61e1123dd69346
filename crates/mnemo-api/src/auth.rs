//! Bearer-token extractor for authenticated routes.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use mnemo_core::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Resolves the token through the Identity Manager to a live user; the
/// user's id is the mandatory isolation key for every store operation.
///
/// Usage:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user.id scopes everything below
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                header.trim_start_matches("Bearer ").trim()
            }
            _ => {
                return Err(ApiError::Unauthorized(
                    "authentication required".to_string(),
                ))
            }
        };

        let user = state.identity.resolve(token).await.map_err(ApiError::from)?;
        Ok(AuthUser(user))
    }
}
