use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Movie, MovieId, RecKind, RecommendedMovie, UserId};
use crate::routes::{normalize_choice, parse_limit, AppState};
use crate::services::recommend;

/// Default and maximum result counts for content-based lookups
const DEFAULT_CONTENT_LIMIT: usize = 10;
const MAX_CONTENT_LIMIT: usize = 50;
/// Default and maximum result counts for per-user lookups
const DEFAULT_USER_LIMIT: usize = 20;
const MAX_USER_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ContentParams {
    limit: Option<String>,
    algorithm: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    movie_id: MovieId,
    movies: Vec<Movie>,
    count: usize,
    requested: usize,
    algorithm: String,
}

#[derive(Debug, Serialize)]
struct NoRecsResponse {
    movies: Vec<Movie>,
    message: &'static str,
}

/// Handler for per-movie content-based recommendations
pub async fn content_based(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Query(params): Query<ContentParams>,
) -> AppResult<Response> {
    let movie_id: MovieId = movie_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid movie ID".to_string()))?;

    let limit = parse_limit(params.limit.as_deref(), DEFAULT_CONTENT_LIMIT, MAX_CONTENT_LIMIT);
    let algorithm = normalize_choice(params.algorithm, "content");

    let Some(movies) =
        recommend::content_based(&state.movies, &state.recs, movie_id, &algorithm, limit)
    else {
        return Ok(Json(NoRecsResponse {
            movies: Vec::new(),
            message: "No recommendations found",
        })
        .into_response());
    };

    tracing::debug!(
        movie_id,
        algorithm = %algorithm,
        count = movies.len(),
        "Resolved content-based recommendations"
    );

    Ok(Json(ContentResponse {
        movie_id,
        count: movies.len(),
        requested: limit,
        algorithm,
        movies: movies.into_iter().cloned().collect(),
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    limit: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    user_id: UserId,
    #[serde(rename = "type")]
    kind: String,
    movies: Vec<RecommendedMovie>,
    count: usize,
    requested: usize,
    available_types: Vec<RecKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NoUserRecsResponse {
    user_id: UserId,
    #[serde(rename = "type")]
    kind: String,
    movies: Vec<RecommendedMovie>,
    message: &'static str,
}

/// Handler for per-user recommendations
pub async fn user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<UserParams>,
) -> AppResult<Response> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid user ID".to_string()))?;

    let limit = parse_limit(params.limit.as_deref(), DEFAULT_USER_LIMIT, MAX_USER_LIMIT);
    let kind = normalize_choice(params.kind, "hybrid");
    // Unknown labels fall back exactly like an absent list type
    let requested = RecKind::parse(&kind).unwrap_or(RecKind::Hybrid);

    let Some(outcome) = recommend::for_user(&state.movies, &state.recs, user_id, requested, limit)
    else {
        return Ok(Json(NoUserRecsResponse {
            user_id,
            kind,
            movies: Vec::new(),
            message: "No recommendations found for this user",
        })
        .into_response());
    };

    tracing::debug!(
        user_id,
        kind = %kind,
        count = outcome.movies.len(),
        "Resolved user recommendations"
    );

    Ok(Json(UserResponse {
        user_id,
        kind,
        count: outcome.movies.len(),
        requested: limit,
        available_types: outcome.available,
        movies: outcome.movies,
    })
    .into_response())
}
