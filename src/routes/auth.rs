use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::User;
use crate::routes::AppState;
use crate::services::auth;

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    user: User,
    token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    user: User,
}

/// Handler for account registration
///
/// A missing or unparseable body is treated as empty so the field validation
/// message stays consistent.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SignupRequest>>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(request) = body.unwrap_or_else(|| Json(SignupRequest::default()));

    let (user, token) = auth::signup(
        &state.users,
        &state.keys,
        &request.name,
        &request.email,
        &request.password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Handler for credential login
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Option<Json<LoginRequest>>,
) -> AppResult<Json<AuthResponse>> {
    let Json(request) = body.unwrap_or_else(|| Json(LoginRequest::default()));

    let (user, token) =
        auth::login(&state.users, &state.keys, &request.email, &request.password).await?;

    Ok(Json(AuthResponse { user, token }))
}

/// Handler returning the account behind the presented token
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<MeResponse>> {
    let user = auth::current_user(&state.users, &claims).await?;
    Ok(Json(MeResponse { user }))
}
