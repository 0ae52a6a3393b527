use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::routes::AppState;
use crate::store::movies::MOVIES_FILE;
use crate::store::recommendations::{CONTENT_RECS_FILE, USER_RECS_FILE};

/// Age in hours past which the offline artifacts count as stale
const RETRAINING_THRESHOLD_HOURS: i64 = 168;

struct FileReport {
    modified: Option<DateTime<Utc>>,
    size_bytes: u64,
}

fn inspect(path: &Path) -> Option<FileReport> {
    let meta = std::fs::metadata(path).ok()?;
    Some(FileReport {
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
        size_bytes: meta.len(),
    })
}

fn iso(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn age_hours(modified: Option<DateTime<Utc>>) -> Option<i64> {
    modified.map(|m| Utc::now().signed_duration_since(m).num_hours())
}

/// Handler reporting freshness and availability of the offline ML artifacts
///
/// Record counts come from the in-memory snapshot; existence, size and
/// modification time are read from disk at request time.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let data_dir = &state.config.data_dir;

    let content = inspect(&data_dir.join(CONTENT_RECS_FILE));
    let user = inspect(&data_dir.join(USER_RECS_FILE));
    let movies = inspect(&data_dir.join(MOVIES_FILE));

    let all_present = content.is_some() && user.is_some() && movies.is_some();
    let content_age = age_hours(content.as_ref().and_then(|r| r.modified));
    let user_age = age_hours(user.as_ref().and_then(|r| r.modified));
    let needs_retraining = content_age.map_or(false, |a| a > RETRAINING_THRESHOLD_HOURS)
        || user_age.map_or(false, |a| a > RETRAINING_THRESHOLD_HOURS);

    let content_file = match &content {
        Some(report) => json!({
            "exists": true,
            "lastModified": report.modified.map(iso),
            "sizeBytes": report.size_bytes,
            "movieCount": state.recs.content_count(),
        }),
        None => json!({ "exists": false, "error": "File not found" }),
    };

    let user_file = match &user {
        Some(report) => json!({
            "exists": true,
            "lastModified": report.modified.map(iso),
            "sizeBytes": report.size_bytes,
            "userCount": state.recs.user_count(),
            "availableTypes": state.recs.user_available_kinds(),
        }),
        None => json!({ "exists": false, "error": "File not found" }),
    };

    let movies_file = match &movies {
        Some(report) => json!({
            "exists": true,
            "lastModified": report.modified.map(iso),
            "sizeBytes": report.size_bytes,
            "movieCount": state.movies.len(),
        }),
        None => json!({ "exists": false, "error": "File not found" }),
    };

    Json(json!({
        "timestamp": iso(Utc::now()),
        "files": {
            "content_based": content_file,
            "user_recommendations": user_file,
            "movies": movies_file,
        },
        "summary": {
            "allFilesPresent": all_present,
            "contentBasedAgeHours": content_age,
            "userRecsAgeHours": user_age,
            "needsRetraining": needs_retraining,
            "recommendation": if needs_retraining {
                "ML data is older than 1 week. Consider retraining models."
            } else {
                "ML data is fresh."
            },
        },
    }))
}
