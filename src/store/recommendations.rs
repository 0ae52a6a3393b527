use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::models::{MovieId, RecEntry, RecKind, UserId, UserRecs};

/// Filename of the per-movie content-based recommendation map
pub const CONTENT_RECS_FILE: &str = "content_based.json";
/// Filename of the per-user recommendation map
pub const USER_RECS_FILE: &str = "user_recommendations.json";

/// Precomputed recommendation maps, loaded once at startup
///
/// Both maps key by ID-as-string because the offline pipeline serializes keys
/// inconsistently. Map values that do not fit the expected shape are skipped
/// per key; the rest of the document still loads.
pub struct RecStore {
    content: HashMap<String, Vec<RecEntry>>,
    users: HashMap<String, UserRecs>,
}

impl RecStore {
    /// Loads both recommendation artifacts from `data_dir`
    pub fn load(data_dir: &Path) -> Self {
        let store = Self::from_values(
            super::load_json(&data_dir.join(CONTENT_RECS_FILE)),
            super::load_json(&data_dir.join(USER_RECS_FILE)),
        );
        tracing::info!(
            movies = store.content_count(),
            users = store.user_count(),
            "Loaded recommendation maps"
        );
        store
    }

    pub(crate) fn from_values(content: Option<Value>, users: Option<Value>) -> Self {
        let mut content_map = HashMap::new();
        if let Some(value) = content {
            match value {
                Value::Object(map) => {
                    for (key, entry) in map {
                        match serde_json::from_value::<Vec<RecEntry>>(entry) {
                            Ok(entries) => {
                                content_map.insert(key, entries);
                            }
                            Err(_) => {
                                tracing::debug!(key = %key, "Content recommendation value is not a list, skipping");
                            }
                        }
                    }
                }
                _ => tracing::warn!("Content recommendation data is not an object, serving none"),
            }
        }

        let mut user_map = HashMap::new();
        if let Some(value) = users {
            match value {
                Value::Object(map) => {
                    for (key, entry) in map {
                        match serde_json::from_value::<UserRecs>(entry) {
                            Ok(recs) => {
                                user_map.insert(key, recs);
                            }
                            Err(_) => {
                                tracing::debug!(key = %key, "User recommendation value is not an object, skipping");
                            }
                        }
                    }
                }
                _ => tracing::warn!("User recommendation data is not an object, serving none"),
            }
        }

        Self {
            content: content_map,
            users: user_map,
        }
    }

    /// The raw content-based list for a movie, if it has one
    pub fn content_for(&self, movie_id: MovieId) -> Option<&[RecEntry]> {
        self.content.get(&movie_id.to_string()).map(Vec::as_slice)
    }

    /// The recommendation record for a user, if it has one
    pub fn user_recs(&self, user_id: UserId) -> Option<&UserRecs> {
        self.users.get(&user_id.to_string())
    }

    pub fn content_count(&self) -> usize {
        self.content.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Recommendation types carried by at least one user record
    pub fn user_available_kinds(&self) -> Vec<RecKind> {
        [RecKind::Hybrid, RecKind::Collaborative, RecKind::Content]
            .into_iter()
            .filter(|kind| {
                self.users.values().any(|recs| match kind {
                    RecKind::Hybrid => recs.hybrid.is_some(),
                    RecKind::Collaborative => recs.collaborative.is_some(),
                    RecKind::Content => recs.content.is_some(),
                })
            })
            .collect()
    }
}
