use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier for a movie as used by the data artifacts
pub type MovieId = i64;

/// A movie record as served by the API
///
/// The upstream artifacts are tolerant about shape: the identifier may arrive
/// under `id` or `movieId` and as a number or a numeric string, and `genres`
/// may be a comma-joined string, an array of strings, or an array of objects
/// with a `name` field. Deserialization normalizes all of that; a record whose
/// identifier cannot be normalized stays listable but is never found by ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawMovie")]
pub struct Movie {
    pub id: Option<MovieId>,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_year: Option<i32>,
    pub vote_average: f64,
    pub vote_count: i64,
}

/// A movie joined with the score its recommendation entry carried, if any
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// On-disk shape of a movie entry, before normalization
#[derive(Debug, Deserialize)]
struct RawMovie {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<MovieId>,
    #[serde(default, rename = "movieId", deserialize_with = "lenient_id")]
    movie_id: Option<MovieId>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    overview: String,
    #[serde(default, deserialize_with = "lenient_genres")]
    genres: Vec<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    release_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    vote_average: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    vote_count: i64,
}

impl From<RawMovie> for Movie {
    fn from(raw: RawMovie) -> Self {
        Movie {
            // `id` wins over `movieId` when both are present
            id: raw.id.or(raw.movie_id),
            title: raw.title,
            overview: raw.overview,
            genres: raw.genres,
            poster_path: raw.poster_path,
            backdrop_path: raw.backdrop_path,
            release_year: raw.release_year,
            vote_average: raw.vote_average,
            vote_count: raw.vote_count,
        }
    }
}

/// Coerces a JSON value to an integer ID: accepts integers, whole floats and
/// numeric strings; anything else normalizes to `None`.
pub(crate) fn coerce_id(value: &Value) -> Option<MovieId> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<MovieId>().ok(),
        _ => None,
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MovieId>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_id(&value))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_id(&value).unwrap_or(0))
}

fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_id(&value).and_then(|y| i32::try_from(y).ok()))
}

fn lenient_genres<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_genres(&value))
}

fn normalize_genres(value: &Value) -> Vec<String> {
    match value {
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()).filter(|g| !g.is_empty()),
                Value::Object(obj) => obj
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .filter(|g| !g.is_empty()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
