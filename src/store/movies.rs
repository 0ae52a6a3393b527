use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde_json::Value;

use crate::models::{Movie, MovieId};

/// Filename of the movie catalog artifact
pub const MOVIES_FILE: &str = "movies.json";

/// In-memory movie catalog, loaded once at startup and immutable afterwards
///
/// Entries that fail shape normalization are skipped rather than failing the
/// whole file. Lookup by ID only covers entries that normalized to a usable
/// integer identifier; on duplicate IDs the first entry wins.
pub struct MovieStore {
    movies: Vec<Movie>,
    by_id: HashMap<MovieId, usize>,
}

impl MovieStore {
    /// Loads the catalog from `movies.json` under `data_dir`
    pub fn load(data_dir: &Path) -> Self {
        let store = Self::from_value(super::load_json(&data_dir.join(MOVIES_FILE)));
        tracing::info!(count = store.len(), "Loaded movie catalog");
        store
    }

    pub(crate) fn from_value(value: Option<Value>) -> Self {
        let entries = match value {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                tracing::warn!("Movie data is not an array, serving an empty catalog");
                Vec::new()
            }
            None => Vec::new(),
        };

        let mut movies = Vec::with_capacity(entries.len());
        for entry in entries {
            // Sequence entries would otherwise deserialize positionally
            if !entry.is_object() {
                tracing::debug!("Skipping non-object movie entry");
                continue;
            }
            match serde_json::from_value::<Movie>(entry) {
                Ok(movie) => movies.push(movie),
                Err(error) => {
                    tracing::debug!(error = %error, "Skipping malformed movie entry");
                }
            }
        }

        let mut by_id = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            if let Some(id) = movie.id {
                by_id.entry(id).or_insert(index);
            }
        }

        Self { movies, by_id }
    }

    /// All movies in file order
    pub fn all(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&index| &self.movies[index])
    }

    /// Resolves IDs to movies, preserving caller order
    ///
    /// Duplicate IDs are kept only at their first occurrence and unknown IDs
    /// are dropped. Callers that correlate scores with the input list rely on
    /// this ordering.
    pub fn get_many(&self, ids: &[MovieId]) -> Vec<&Movie> {
        let mut seen = HashSet::with_capacity(ids.len());
        ids.iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.get(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MovieStore {
        MovieStore::from_value(Some(json!([
            { "id": 1, "title": "Dune" },
            { "id": 2, "title": "Arrival" },
            { "movieId": "3", "title": "Blade Runner" },
            { "id": "not-a-number", "title": "Unaddressable" },
            "garbage entry",
            [9],
            { "id": 1, "title": "Dune (duplicate)" }
        ])))
    }

    #[test]
    fn test_load_skips_malformed_entries() {
        let store = store();
        // The bare string and array entries are dropped; everything else survives
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_array_entry_is_not_read_positionally() {
        let store = store();
        // `[9]` must not become a movie with id 9
        assert!(store.get(9).is_none());
    }

    #[test]
    fn test_get_supports_both_id_fields() {
        let store = store();
        assert_eq!(store.get(1).unwrap().title, "Dune");
        assert_eq!(store.get(3).unwrap().title, "Blade Runner");
    }

    #[test]
    fn test_first_entry_wins_on_duplicate_id() {
        let store = store();
        assert_eq!(store.get(1).unwrap().title, "Dune");
    }

    #[test]
    fn test_unaddressable_entry_is_listed_but_not_found() {
        let store = store();
        assert!(store.all().iter().any(|m| m.title == "Unaddressable"));
        assert!(store.all().iter().find(|m| m.title == "Unaddressable").unwrap().id.is_none());
    }

    #[test]
    fn test_get_many_preserves_caller_order() {
        let store = store();
        let titles: Vec<_> = store.get_many(&[3, 1, 2]).iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Blade Runner", "Dune", "Arrival"]);
    }

    #[test]
    fn test_get_many_drops_unknown_and_duplicate_ids() {
        let store = store();
        let titles: Vec<_> =
            store.get_many(&[2, 99, 2, 1]).iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Arrival", "Dune"]);
    }

    #[test]
    fn test_get_many_empty_input() {
        let store = store();
        assert!(store.get_many(&[]).is_empty());
    }

    #[test]
    fn test_non_array_document_degrades_to_empty() {
        let store = MovieStore::from_value(Some(json!({ "movies": [] })));
        assert!(store.is_empty());

        let store = MovieStore::from_value(None);
        assert!(store.is_empty());
    }
}
