use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::movie::{coerce_id, MovieId};

/// One entry of a precomputed recommendation list
///
/// Entries arrive either as bare IDs (number or numeric string) or as objects
/// carrying an ID plus an optional score. Anything else is preserved as
/// `Other` and resolves to no movie rather than failing the whole list.
#[derive(Debug, Clone, PartialEq)]
pub enum RecEntry {
    Id(i64),
    Text(String),
    Scored(ScoredEntry),
    Other(Value),
}

// Dispatches on the JSON value kind by hand: only objects may become the
// scored form. A derived untagged enum would route arrays into `ScoredEntry`
// through its sequence visitor, since every field there carries a default.
impl<'de> Deserialize<'de> for RecEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(_) => match value.as_i64() {
                Some(id) => RecEntry::Id(id),
                // Whole floats still coerce at lookup time
                None => RecEntry::Other(value),
            },
            Value::String(s) => RecEntry::Text(s),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(RecEntry::Scored)
                .unwrap_or(RecEntry::Other(value)),
            other => RecEntry::Other(other),
        })
    }
}

impl RecEntry {
    /// The movie ID this entry points at, if it can be coerced to one
    pub fn movie_id(&self) -> Option<MovieId> {
        match self {
            RecEntry::Id(id) => Some(*id),
            RecEntry::Text(s) => s.trim().parse().ok(),
            RecEntry::Scored(entry) => entry.movie_id(),
            RecEntry::Other(value) => coerce_id(value),
        }
    }

    /// Like [`movie_id`](Self::movie_id), but only for bare entries
    ///
    /// Content-based lists carry plain IDs; object entries there are treated
    /// as invalid rather than unwrapped.
    pub fn bare_id(&self) -> Option<MovieId> {
        match self {
            RecEntry::Id(id) => Some(*id),
            RecEntry::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The score this entry carries, if any (`score` wins over `rating`)
    pub fn score(&self) -> Option<f64> {
        match self {
            RecEntry::Scored(entry) => entry.score(),
            _ => None,
        }
    }
}

/// Object form of a recommendation entry
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScoredEntry {
    #[serde(default, deserialize_with = "lenient_opt_id")]
    pub id: Option<MovieId>,
    #[serde(default, rename = "movieId", deserialize_with = "lenient_opt_id")]
    pub movie_id: Option<MovieId>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub rating: Option<f64>,
}

impl ScoredEntry {
    pub fn movie_id(&self) -> Option<MovieId> {
        self.id.or(self.movie_id)
    }

    pub fn score(&self) -> Option<f64> {
        self.score.or(self.rating)
    }
}

/// A recommendation list, either bare or wrapped in a container object
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecList {
    Entries(Vec<RecEntry>),
    Wrapped(WrappedRecList),
}

/// Container form: the list sits under `movies`, `ids` or `recommendations`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WrappedRecList {
    #[serde(default)]
    pub movies: Option<Vec<RecEntry>>,
    #[serde(default)]
    pub ids: Option<Vec<RecEntry>>,
    #[serde(default)]
    pub recommendations: Option<Vec<RecEntry>>,
}

impl RecList {
    pub fn entries(&self) -> &[RecEntry] {
        match self {
            RecList::Entries(entries) => entries,
            RecList::Wrapped(wrapped) => wrapped
                .movies
                .as_deref()
                .or(wrapped.ids.as_deref())
                .or(wrapped.recommendations.as_deref())
                .unwrap_or(&[]),
        }
    }
}

/// The recommendation types a user record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecKind {
    Hybrid,
    Collaborative,
    Content,
}

impl RecKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hybrid" => Some(RecKind::Hybrid),
            "collaborative" => Some(RecKind::Collaborative),
            "content" => Some(RecKind::Content),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecKind::Hybrid => "hybrid",
            RecKind::Collaborative => "collaborative",
            RecKind::Content => "content",
        }
    }
}

/// Per-user precomputed recommendation lists
///
/// A malformed list value degrades to absent instead of rejecting the user's
/// whole record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRecs {
    #[serde(default, deserialize_with = "lenient_list")]
    pub hybrid: Option<RecList>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub collaborative: Option<RecList>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub content: Option<RecList>,
}

impl UserRecs {
    fn get(&self, kind: RecKind) -> Option<&RecList> {
        match kind {
            RecKind::Hybrid => self.hybrid.as_ref(),
            RecKind::Collaborative => self.collaborative.as_ref(),
            RecKind::Content => self.content.as_ref(),
        }
    }

    /// The list for `requested`, falling back through hybrid, collaborative
    /// and content when the requested one is absent. An empty list that is
    /// present does not fall back.
    pub fn list_for(&self, requested: RecKind) -> &[RecEntry] {
        self.get(requested)
            .or_else(|| self.get(RecKind::Hybrid))
            .or_else(|| self.get(RecKind::Collaborative))
            .or_else(|| self.get(RecKind::Content))
            .map(RecList::entries)
            .unwrap_or(&[])
    }

    /// Which of the three types this record actually carries
    pub fn available_kinds(&self) -> Vec<RecKind> {
        [RecKind::Hybrid, RecKind::Collaborative, RecKind::Content]
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }
}

/// Cosmetic reordering applied to a recommendation list per requested
/// algorithm.
///
/// Every algorithm is served from the same precomputed list; these transforms
/// only make the demo output visibly differ per selection and carry no
/// statistical meaning. Replace with real per-model outputs once those exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStrategy {
    Identity,
    Reverse,
    Stride2,
    DropFirstTwo,
}

impl PlaceholderStrategy {
    pub fn for_algorithm(algorithm: &str) -> Self {
        match algorithm {
            "collaborative" | "svd" => PlaceholderStrategy::Reverse,
            "hybrid" => PlaceholderStrategy::Stride2,
            "cosine" => PlaceholderStrategy::DropFirstTwo,
            _ => PlaceholderStrategy::Identity,
        }
    }

    pub fn apply<T: Clone>(&self, entries: &[T]) -> Vec<T> {
        match self {
            PlaceholderStrategy::Identity => entries.to_vec(),
            PlaceholderStrategy::Reverse => entries.iter().rev().cloned().collect(),
            PlaceholderStrategy::Stride2 => entries.iter().step_by(2).cloned().collect(),
            PlaceholderStrategy::DropFirstTwo => entries.iter().skip(2).cloned().collect(),
        }
    }
}

fn lenient_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MovieId>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_id(&value))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RecList>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_from_bare_id() {
        let entry: RecEntry = serde_json::from_value(json!(550)).unwrap();
        assert_eq!(entry.movie_id(), Some(550));
        assert_eq!(entry.score(), None);
    }

    #[test]
    fn test_entry_from_numeric_string() {
        let entry: RecEntry = serde_json::from_value(json!("680")).unwrap();
        assert_eq!(entry.movie_id(), Some(680));
    }

    #[test]
    fn test_entry_from_scored_object() {
        let entry: RecEntry =
            serde_json::from_value(json!({ "movieId": "120", "score": 0.93 })).unwrap();
        assert_eq!(entry.movie_id(), Some(120));
        assert_eq!(entry.score(), Some(0.93));
    }

    #[test]
    fn test_entry_rating_used_when_score_missing() {
        let entry: RecEntry = serde_json::from_value(json!({ "id": 7, "rating": 4.5 })).unwrap();
        assert_eq!(entry.score(), Some(4.5));
    }

    #[test]
    fn test_bare_id_ignores_object_entries() {
        let scored: RecEntry = serde_json::from_value(json!({ "id": 7, "score": 0.5 })).unwrap();
        assert_eq!(scored.bare_id(), None);
        assert_eq!(scored.movie_id(), Some(7));

        let bare: RecEntry = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(bare.bare_id(), Some(42));
    }

    #[test]
    fn test_entry_garbage_resolves_to_nothing() {
        // An array must never be read as a positional scored entry
        let entry: RecEntry = serde_json::from_value(json!([1, 2])).unwrap();
        assert!(matches!(entry, RecEntry::Other(_)));
        assert_eq!(entry.movie_id(), None);
        assert_eq!(entry.score(), None);

        let entry: RecEntry = serde_json::from_value(json!({ "name": "oops" })).unwrap();
        assert_eq!(entry.movie_id(), None);

        let entry: RecEntry = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(entry.movie_id(), None);
    }

    #[test]
    fn test_rec_list_bare_and_wrapped() {
        let bare: RecList = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(bare.entries().len(), 3);

        let wrapped: RecList =
            serde_json::from_value(json!({ "movies": [4, 5], "ids": [9] })).unwrap();
        let ids: Vec<_> = wrapped.entries().iter().filter_map(RecEntry::movie_id).collect();
        assert_eq!(ids, vec![4, 5]);

        let ids_only: RecList = serde_json::from_value(json!({ "ids": [6] })).unwrap();
        assert_eq!(ids_only.entries().len(), 1);
    }

    #[test]
    fn test_user_recs_fallback_chain() {
        let recs: UserRecs = serde_json::from_value(json!({
            "collaborative": [10, 11],
            "content": [20]
        }))
        .unwrap();

        // hybrid absent: falls through to collaborative
        let ids: Vec<_> = recs
            .list_for(RecKind::Hybrid)
            .iter()
            .filter_map(RecEntry::movie_id)
            .collect();
        assert_eq!(ids, vec![10, 11]);

        let ids: Vec<_> = recs
            .list_for(RecKind::Content)
            .iter()
            .filter_map(RecEntry::movie_id)
            .collect();
        assert_eq!(ids, vec![20]);
    }

    #[test]
    fn test_user_recs_present_empty_list_does_not_fall_back() {
        let recs: UserRecs = serde_json::from_value(json!({
            "hybrid": [],
            "collaborative": [10]
        }))
        .unwrap();
        assert!(recs.list_for(RecKind::Hybrid).is_empty());
    }

    #[test]
    fn test_user_recs_malformed_list_degrades_to_absent() {
        let recs: UserRecs = serde_json::from_value(json!({
            "hybrid": 5,
            "collaborative": [1]
        }))
        .unwrap();
        assert!(recs.hybrid.is_none());
        assert_eq!(recs.available_kinds(), vec![RecKind::Collaborative]);
        assert_eq!(recs.list_for(RecKind::Hybrid).len(), 1);
    }

    #[test]
    fn test_available_kinds_order() {
        let recs: UserRecs = serde_json::from_value(json!({
            "content": [1],
            "hybrid": [2]
        }))
        .unwrap();
        assert_eq!(recs.available_kinds(), vec![RecKind::Hybrid, RecKind::Content]);
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(
            PlaceholderStrategy::for_algorithm("collaborative"),
            PlaceholderStrategy::Reverse
        );
        assert_eq!(PlaceholderStrategy::for_algorithm("svd"), PlaceholderStrategy::Reverse);
        assert_eq!(PlaceholderStrategy::for_algorithm("hybrid"), PlaceholderStrategy::Stride2);
        assert_eq!(
            PlaceholderStrategy::for_algorithm("cosine"),
            PlaceholderStrategy::DropFirstTwo
        );
        assert_eq!(
            PlaceholderStrategy::for_algorithm("anything-else"),
            PlaceholderStrategy::Identity
        );
    }

    #[test]
    fn test_strategy_transforms() {
        let entries = vec![1, 2, 3, 4, 5];
        assert_eq!(PlaceholderStrategy::Identity.apply(&entries), vec![1, 2, 3, 4, 5]);
        assert_eq!(PlaceholderStrategy::Reverse.apply(&entries), vec![5, 4, 3, 2, 1]);
        assert_eq!(PlaceholderStrategy::Stride2.apply(&entries), vec![1, 3, 5]);
        assert_eq!(PlaceholderStrategy::DropFirstTwo.apply(&entries), vec![3, 4, 5]);
    }

    #[test]
    fn test_strategy_on_short_lists() {
        let one = vec![1];
        assert_eq!(PlaceholderStrategy::DropFirstTwo.apply(&one), Vec::<i32>::new());
        assert_eq!(PlaceholderStrategy::Stride2.apply(&one), vec![1]);
        let empty: Vec<i32> = Vec::new();
        assert_eq!(PlaceholderStrategy::Reverse.apply(&empty), empty);
    }
}
