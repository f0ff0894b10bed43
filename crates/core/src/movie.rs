//! The movie record, its create payload, and payload normalization.
//!
//! Clients (the "add movie" form in particular) submit loosely typed data:
//! genres as a comma-delimited string, numbers as strings, dates as either a
//! plain date or a full timestamp. [`CreateMovie`] accepts all of those shapes
//! and [`CreateMovie::normalize`] turns it into a validated [`NewMovie`] that
//! the store can persist without further checks.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{legacy_movie_id, MovieId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest stored rating.
pub const RATING_MIN: f64 = 0.0;

/// Highest stored rating. Ratings are stored on a 0–10 scale; any star
/// display converts at the presentation layer.
pub const RATING_MAX: f64 = 10.0;

/// Largest magnitude at which every whole `f64` is exact (2^53).
const MAX_EXACT_WHOLE_F64: f64 = 9_007_199_254_740_992.0;

/// Entity name used in `NotFound` errors.
pub const MOVIE_ENTITY: &str = "Movie";

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// A persisted movie record.
///
/// `id` and `created_at` are assigned by the store and never change.
/// Optional URLs are omitted from JSON when absent. Catalog files written
/// before UUID identifiers carry numeric millisecond ids; those load as the
/// UUID v7 for that instant (see [`legacy_movie_id`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(deserialize_with = "deserialize_movie_id")]
    pub id: MovieId,
    pub title: String,
    pub release_date: NaiveDate,
    pub genre: Vec<String>,
    #[serde(default)]
    pub runtime: i32,
    #[serde(default)]
    pub plot_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    pub created_at: Timestamp,
}

fn deserialize_movie_id<'de, D>(deserializer: D) -> Result<MovieId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredId {
        Uuid(MovieId),
        Millis(u64),
    }

    Ok(match StoredId::deserialize(deserializer)? {
        StoredId::Uuid(id) => id,
        StoredId::Millis(millis) => legacy_movie_id(millis),
    })
}

/// Sort movies newest first by `created_at`.
///
/// The sort is stable, so records sharing a timestamp keep insertion order.
pub fn sort_newest_first(movies: &mut [Movie]) {
    movies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// ---------------------------------------------------------------------------
// Normalized input
// ---------------------------------------------------------------------------

/// A validated movie ready to be stored. Lacks `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewMovie {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub release_date: NaiveDate,
    #[validate(length(min = 1, message = "at least one genre is required"))]
    pub genre: Vec<String>,
    #[validate(range(min = 0, message = "runtime must not be negative"))]
    pub runtime: i32,
    pub plot_summary: String,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    #[validate(range(min = RATING_MIN, max = RATING_MAX, message = "rating is out of range"))]
    pub rating: f64,
    #[validate(range(min = 0, message = "reviewCount must not be negative"))]
    pub review_count: i64,
}

impl NewMovie {
    /// Stamp the identity fields onto this movie.
    pub fn into_movie(self, id: MovieId, created_at: Timestamp) -> Movie {
        Movie {
            id,
            title: self.title,
            release_date: self.release_date,
            genre: self.genre,
            runtime: self.runtime,
            plot_summary: self.plot_summary,
            poster_url: self.poster_url,
            trailer_url: self.trailer_url,
            rating: self.rating,
            review_count: self.review_count,
            created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire payload
// ---------------------------------------------------------------------------

/// Genre tags as submitted: either a list or one comma-delimited string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenreInput {
    Tags(Vec<String>),
    Delimited(String),
}

impl GenreInput {
    fn into_tags(self) -> Vec<String> {
        match self {
            Self::Tags(tags) => tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Delimited(raw) => split_genres(&raw),
        }
    }
}

/// A numeric field as submitted: a JSON number or a numeric string.
///
/// `Integer` comes first so JSON integers that fit an `i64` never pass
/// through `f64`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Resolve to a finite number. Blank strings resolve to `None`.
    fn resolve(&self, field: &str) -> Result<Option<f64>, CoreError> {
        let value = match self {
            Self::Integer(n) => *n as f64,
            Self::Number(n) => *n,
            Self::Text(s) if s.trim().is_empty() => return Ok(None),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CoreError::Validation(format!("{field} must be a number")))?,
        };
        if !value.is_finite() {
            return Err(CoreError::Validation(format!("{field} must be a number")));
        }
        Ok(Some(value))
    }

    /// Resolve to an exact integer. Fractional values and magnitudes an `f64`
    /// cannot hold exactly are rejected rather than rounded.
    fn resolve_whole(&self, field: &str) -> Result<Option<i64>, CoreError> {
        match self {
            Self::Integer(n) => Ok(Some(*n)),
            Self::Number(n) => exact_whole(*n, field).map(Some),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => Ok(Some(n)),
                Err(_) => {
                    let value = s.trim().parse::<f64>().map_err(|_| {
                        CoreError::Validation(format!("{field} must be a number"))
                    })?;
                    exact_whole(value, field).map(Some)
                }
            },
        }
    }
}

/// Request payload for creating a movie.
///
/// Every field is optional at the wire level so that missing fields surface
/// as validation errors from [`normalize`](Self::normalize) rather than as
/// deserialization failures. Unknown fields, including any client-supplied
/// `id` or `createdAt`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovie {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<GenreInput>,
    pub runtime: Option<NumberInput>,
    pub plot_summary: Option<String>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub rating: Option<NumberInput>,
    pub review_count: Option<NumberInput>,
}

impl CreateMovie {
    /// Coerce and validate the payload.
    ///
    /// - `releaseDate` accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
    /// - `genre` strings are split on commas; tags are trimmed, blanks dropped.
    /// - `runtime`, `rating`, `reviewCount` accept numbers or numeric strings
    ///   and default to 0 when missing or blank.
    /// - Blank poster/trailer URLs become `None`.
    pub fn normalize(self) -> Result<NewMovie, CoreError> {
        let release_date = match self.release_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_release_date(raw)?,
            _ => return Err(CoreError::Validation("releaseDate is required".into())),
        };

        let runtime = whole_number(self.runtime.as_ref(), "runtime")?;
        let runtime = i32::try_from(runtime)
            .map_err(|_| CoreError::Validation("runtime is out of range".into()))?;

        let rating = match &self.rating {
            Some(input) => input.resolve("rating")?.unwrap_or(RATING_MIN),
            None => RATING_MIN,
        };

        let movie = NewMovie {
            title: self.title.as_deref().map(str::trim).unwrap_or_default().to_string(),
            release_date,
            genre: self.genre.map(GenreInput::into_tags).unwrap_or_default(),
            runtime,
            plot_summary: self.plot_summary.map(|s| s.trim().to_string()).unwrap_or_default(),
            poster_url: non_blank(self.poster_url),
            trailer_url: non_blank(self.trailer_url),
            rating,
            review_count: whole_number(self.review_count.as_ref(), "reviewCount")?,
        };

        movie
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        Ok(movie)
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Split a comma-delimited genre string into trimmed, non-empty tags.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a release date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| CoreError::Validation(format!("releaseDate '{raw}' is not a valid date")))
}

fn whole_number(input: Option<&NumberInput>, field: &str) -> Result<i64, CoreError> {
    Ok(input
        .map(|i| i.resolve_whole(field))
        .transpose()?
        .flatten()
        .unwrap_or(0))
}

fn exact_whole(value: f64, field: &str) -> Result<i64, CoreError> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_EXACT_WHOLE_F64 {
        return Err(CoreError::Validation(format!(
            "{field} must be a whole number"
        )));
    }
    Ok(value as i64)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
