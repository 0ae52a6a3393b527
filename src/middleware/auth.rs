use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::routes::AppState;
use crate::services::auth::Claims;

/// Extractor for endpoints that require a valid bearer token
///
/// Reads the second whitespace-separated part of the Authorization header as
/// the token (the scheme label itself is not checked) and verifies it against
/// the application's signing keys. Handlers still re-resolve the user by the
/// claim ID; a token outliving its account is rejected there.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = bearer_token(header)
            .ok_or_else(|| AppError::Auth("Missing Authorization header".to_string()))?;

        let claims = state.keys.verify(token)?;
        Ok(AuthUser(claims))
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    parts.next();
    parts.next().filter(|token| !token.is_empty())
}
