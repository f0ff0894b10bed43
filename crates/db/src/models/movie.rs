//! Row mapping for the `movies` table.

use chrono::NaiveDate;
use cinedex_core::movie::Movie;
use cinedex_core::types::{MovieId, Timestamp};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRow {
    pub id: MovieId,
    pub title: String,
    pub release_date: NaiveDate,
    pub genre: Vec<String>,
    pub runtime: i32,
    pub plot_summary: String,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub rating: f64,
    pub review_count: i64,
    pub created_at: Timestamp,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            release_date: row.release_date,
            genre: row.genre,
            runtime: row.runtime,
            plot_summary: row.plot_summary,
            poster_url: row.poster_url,
            trailer_url: row.trailer_url,
            rating: row.rating,
            review_count: row.review_count,
            created_at: row.created_at,
        }
    }
}
