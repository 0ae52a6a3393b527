use crate::models::Movie;
use crate::store::MovieStore;

/// One page of catalog listing results
pub struct Page<'a> {
    pub movies: Vec<&'a Movie>,
    pub total: usize,
    pub has_more: bool,
}

/// Search results before response assembly
pub struct SearchResults<'a> {
    pub movies: Vec<&'a Movie>,
    pub total_matches: usize,
}

/// Lists the catalog with optional text and genre filters, then paginates
///
/// `query` matches title or overview, `genre` matches any genre entry; both
/// are case-insensitive substring matches and are AND'd when both present.
/// `total` and `has_more` reflect the post-filter count.
pub fn list<'a>(
    store: &'a MovieStore,
    query: Option<&str>,
    genre: Option<&str>,
    limit: usize,
    offset: usize,
) -> Page<'a> {
    let query = normalize_filter(query);
    let genre = normalize_filter(genre);

    let filtered: Vec<&Movie> = store
        .all()
        .iter()
        .filter(|movie| {
            let matches_query = query
                .as_deref()
                .map_or(true, |q| text_matches(movie, q, false));
            let matches_genre = genre
                .as_deref()
                .map_or(true, |g| genre_matches(movie, g));
            matches_query && matches_genre
        })
        .collect();

    let total = filtered.len();
    let movies: Vec<&Movie> = filtered.into_iter().skip(offset).take(limit).collect();

    Page {
        movies,
        total,
        has_more: offset + limit < total,
    }
}

/// Searches title, overview and genre text, truncated to `limit`
pub fn search<'a>(store: &'a MovieStore, query: &str, limit: usize) -> SearchResults<'a> {
    let query = query.trim().to_lowercase();

    let matches: Vec<&Movie> = store
        .all()
        .iter()
        .filter(|movie| text_matches(movie, &query, true))
        .collect();

    let total_matches = matches.len();
    let movies = matches.into_iter().take(limit).collect();

    SearchResults {
        movies,
        total_matches,
    }
}

fn normalize_filter(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn text_matches(movie: &Movie, query: &str, include_genres: bool) -> bool {
    movie.title.to_lowercase().contains(query)
        || movie.overview.to_lowercase().contains(query)
        || (include_genres && genre_matches(movie, query))
}

fn genre_matches(movie: &Movie, genre: &str) -> bool {
    movie.genres.iter().any(|g| g.to_lowercase().contains(genre))
}
