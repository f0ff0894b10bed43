//! Repository for the `movies` table.

use sqlx::PgPool;
use cinedex_core::movie::NewMovie;
use cinedex_core::types::{MovieId, Timestamp};

use crate::models::movie::MovieRow;

/// Column list for `movies` queries.
const COLUMNS: &str = "\
    id, title, release_date, genre, runtime, plot_summary, \
    poster_url, trailer_url, rating, review_count, created_at";

/// Provides data access for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// List all movies, newest first. Ties fall back to release date.
    pub async fn list(pool: &PgPool) -> Result<Vec<MovieRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies ORDER BY created_at DESC, release_date DESC"
        );
        sqlx::query_as::<_, MovieRow>(&query).fetch_all(pool).await
    }

    /// Find a movie by its ID.
    pub async fn find_by_id(pool: &PgPool, id: MovieId) -> Result<Option<MovieRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a movie with caller-assigned identity fields.
    ///
    /// Fails with a unique violation on `uq_movies_title` when the title
    /// already exists.
    pub async fn create(
        pool: &PgPool,
        id: MovieId,
        created_at: Timestamp,
        dto: &NewMovie,
    ) -> Result<MovieRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies \
                 (id, title, release_date, genre, runtime, plot_summary, \
                  poster_url, trailer_url, rating, review_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .bind(&dto.title)
            .bind(dto.release_date)
            .bind(&dto.genre)
            .bind(dto.runtime)
            .bind(&dto.plot_summary)
            .bind(&dto.poster_url)
            .bind(&dto.trailer_url)
            .bind(dto.rating)
            .bind(dto.review_count)
            .bind(created_at)
            .fetch_one(pool)
            .await
    }
}
