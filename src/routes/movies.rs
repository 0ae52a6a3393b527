use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Movie, MovieId};
use crate::routes::{parse_limit, parse_offset, AppState};
use crate::services::catalog;

/// Default page size for the catalog listing
const DEFAULT_LIST_LIMIT: usize = 24;
/// Default result count for searches
const DEFAULT_SEARCH_LIMIT: usize = 30;
/// Upper bound for any caller-supplied limit
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    q: Option<String>,
    genre: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    movies: Vec<Movie>,
    total: usize,
    limit: usize,
    offset: usize,
    has_more: bool,
}

/// Handler for the catalog listing endpoint
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<ListResponse> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_LIST_LIMIT, MAX_LIMIT);
    let offset = parse_offset(params.offset.as_deref());

    let page = catalog::list(
        &state.movies,
        params.q.as_deref(),
        params.genre.as_deref(),
        limit,
        offset,
    );

    tracing::debug!(total = page.total, returned = page.movies.len(), "Listed movies");

    Json(ListResponse {
        movies: page.movies.into_iter().cloned().collect(),
        total: page.total,
        limit,
        offset,
        has_more: page.has_more,
    })
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    movie: Movie,
}

/// Handler for single-movie lookup
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieResponse>> {
    let id: MovieId = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid movie ID".to_string()))?;

    let movie = state
        .movies
        .get(id)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(MovieResponse {
        movie: movie.clone(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    movies: Vec<Movie>,
    total_matches: usize,
    query: String,
    returned: usize,
}

#[derive(Debug, Serialize)]
struct EmptySearchResponse {
    movies: Vec<Movie>,
    message: &'static str,
}

/// Handler for full-text search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Json(EmptySearchResponse {
            movies: Vec::new(),
            message: "No search query provided",
        })
        .into_response();
    }

    let limit = parse_limit(params.limit.as_deref(), DEFAULT_SEARCH_LIMIT, MAX_LIMIT);
    // The response echoes the query as matched: trimmed and lowercased
    let query = query.trim().to_lowercase();
    let results = catalog::search(&state.movies, &query, limit);

    tracing::debug!(query = %query, matches = results.total_matches, "Searched movies");

    let returned = results.movies.len();
    Json(SearchResponse {
        movies: results.movies.into_iter().cloned().collect(),
        total_matches: results.total_matches,
        query,
        returned,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct BatchParams {
    ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    movies: Vec<Movie>,
}

/// Handler for batch lookup by comma-separated IDs
pub async fn batch(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BatchParams>,
) -> AppResult<Json<BatchResponse>> {
    let raw = params
        .ids
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| AppError::Validation("Missing ids parameter".to_string()))?;

    let ids: Vec<MovieId> = raw
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .collect();

    let movies = state.movies.get_many(&ids);

    Ok(Json(BatchResponse {
        movies: movies.into_iter().cloned().collect(),
    }))
}
