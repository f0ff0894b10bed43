//! PostgreSQL movie store.
//!
//! Atomicity of concurrent creates is delegated to the database; the title
//! uniqueness rule is enforced by the `uq_movies_title` constraint.

use async_trait::async_trait;
use chrono::Utc;
use cinedex_core::error::CoreError;
use cinedex_core::movie::{Movie, NewMovie};
use cinedex_core::types::{new_movie_id, MovieId};

use crate::repositories::MovieRepo;
use crate::store::{MovieStore, StoreBackend};
use crate::DbPool;

/// PostgreSQL unique violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Movie store backed by the `movies` table.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: DbPool,
}

impl PgMovieStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }

    async fn try_list(&self) -> Result<Vec<Movie>, CoreError> {
        let rows = MovieRepo::list(&self.pool).await.map_err(persistence_error)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn create(&self, movie: NewMovie) -> Result<Movie, CoreError> {
        let row = MovieRepo::create(&self.pool, new_movie_id(), Utc::now(), &movie)
            .await
            .map_err(persistence_error)?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CoreError> {
        let row = MovieRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence_error)?;
        Ok(row.map(Movie::from))
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(persistence_error)
    }
}

/// Map a sqlx error to [`CoreError::Persistence`], naming duplicate-title
/// rejections explicitly.
fn persistence_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Persistence(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    CoreError::Persistence(err.to_string())
}
