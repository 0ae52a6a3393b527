use std::collections::HashMap;

use crate::models::{Movie, MovieId, PlaceholderStrategy, RecEntry, RecKind, RecommendedMovie, UserId};
use crate::store::{MovieStore, RecStore};

/// Result of a per-user recommendation lookup
pub struct UserOutcome {
    pub movies: Vec<RecommendedMovie>,
    pub available: Vec<RecKind>,
}

/// Resolves the content-based list for a movie
///
/// The placeholder transform for `algorithm` is applied to the full raw list,
/// then the list is truncated to `limit`, coerced to IDs (invalid entries
/// dropped) and resolved against the catalog. `None` means the movie has no
/// usable list.
pub fn content_based<'a>(
    movies: &'a MovieStore,
    recs: &RecStore,
    movie_id: MovieId,
    algorithm: &str,
    limit: usize,
) -> Option<Vec<&'a Movie>> {
    let entries = recs.content_for(movie_id)?;

    let strategy = PlaceholderStrategy::for_algorithm(algorithm);
    let ids: Vec<MovieId> = strategy
        .apply(entries)
        .iter()
        .take(limit)
        .filter_map(RecEntry::bare_id)
        .collect();

    Some(movies.get_many(&ids))
}

/// Resolves a user's precomputed recommendations
///
/// Falls back across list types per [`UserRecs::list_for`]. The candidate
/// list is truncated to `limit` before ID coercion. Scores are attached by an
/// ID-keyed join, and only when every requested ID resolved and at least one
/// entry in the underlying list carries a score. `None` means the user has no
/// recommendation record.
///
/// [`UserRecs::list_for`]: crate::models::UserRecs::list_for
pub fn for_user(
    movies: &MovieStore,
    recs: &RecStore,
    user_id: UserId,
    requested: RecKind,
    limit: usize,
) -> Option<UserOutcome> {
    let user = recs.user_recs(user_id)?;
    let entries = user.list_for(requested);

    let candidates: Vec<&RecEntry> = entries.iter().take(limit).collect();
    let ids: Vec<MovieId> = candidates.iter().filter_map(|entry| entry.movie_id()).collect();
    let resolved = movies.get_many(&ids);

    let attach_scores =
        resolved.len() == ids.len() && entries.iter().any(|entry| entry.score().is_some());
    let scores: HashMap<MovieId, f64> = if attach_scores {
        candidates
            .iter()
            .filter_map(|entry| Some((entry.movie_id()?, entry.score()?)))
            .collect()
    } else {
        HashMap::new()
    };

    let movies = resolved
        .into_iter()
        .map(|movie| RecommendedMovie {
            score: movie.id.and_then(|id| scores.get(&id).copied()),
            movie: movie.clone(),
        })
        .collect();

    Some(UserOutcome {
        movies,
        available: user.available_kinds(),
    })
}
