use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::auth::TokenKeys;
use crate::store::{MovieStore, RecStore, UserStore};

pub mod auth;
pub mod ml;
pub mod movies;
pub mod recommendations;

/// Shared application state
///
/// Movie and recommendation data are read once at startup into immutable
/// snapshots; only the user store accepts writes.
pub struct AppState {
    pub config: Config,
    pub movies: MovieStore,
    pub recs: RecStore,
    pub users: UserStore,
    pub keys: TokenKeys,
    pub started_at: Instant,
}

impl AppState {
    /// Loads all data artifacts and prepares shared state
    pub fn new(config: Config) -> Self {
        let movies = MovieStore::load(&config.data_dir);
        let recs = RecStore::load(&config.data_dir);
        let users = UserStore::load(&config.data_dir);
        let keys = TokenKeys::new(&config.jwt_secret, config.jwt_expiry_days);

        Self {
            movies,
            recs,
            users,
            keys,
            started_at: Instant::now(),
            config,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health))
        .route("/movies", get(movies::list))
        .route("/movies/search", get(movies::search))
        .route("/movies/batch", get(movies::batch))
        .route("/movies/:id", get(movies::get_by_id))
        .route(
            "/recommendations/content-based/:movie_id",
            get(recommendations::content_based),
        )
        .route("/recommendations/user/:user_id", get(recommendations::user))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/ml/status", get(ml::status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "message": "Movie Recommendation API is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "environment": state.config.environment,
    }))
}

/// Parses a `limit` query value, falling back to `default` on anything that
/// is not a positive integer and capping at `max`
pub(crate) fn parse_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|&value| value > 0)
        .map(|value| (value as usize).min(max))
        .unwrap_or(default)
}

/// Parses an `offset` query value; anything not a non-negative integer is 0
pub(crate) fn parse_offset(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|&value| value >= 0)
        .map(|value| value as usize)
        .unwrap_or(0)
}

/// Lowercases a selector parameter, treating empty as absent
pub(crate) fn normalize_choice(raw: Option<String>, default: &str) -> String {
    raw.filter(|value| !value.is_empty())
        .map(|value| value.to_lowercase())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit_defaults_and_caps() {
        assert_eq!(parse_limit(None, 24, 100), 24);
        assert_eq!(parse_limit(Some("10"), 24, 100), 10);
        assert_eq!(parse_limit(Some("500"), 24, 100), 100);
        assert_eq!(parse_limit(Some("abc"), 24, 100), 24);
        assert_eq!(parse_limit(Some("0"), 24, 100), 24);
        assert_eq!(parse_limit(Some("-3"), 24, 100), 24);
        assert_eq!(parse_limit(Some(""), 24, 100), 24);
    }

    #[test]
    fn test_parse_offset_clamps_to_zero() {
        assert_eq!(parse_offset(None), 0);
        assert_eq!(parse_offset(Some("12")), 12);
        assert_eq!(parse_offset(Some("-4")), 0);
        assert_eq!(parse_offset(Some("junk")), 0);
    }

    #[test]
    fn test_normalize_choice() {
        assert_eq!(normalize_choice(None, "content"), "content");
        assert_eq!(normalize_choice(Some("".into()), "content"), "content");
        assert_eq!(normalize_choice(Some("HYBRID".into()), "content"), "hybrid");
        assert_eq!(normalize_choice(Some("svd".into()), "content"), "svd");
    }
}
