//! The movie store interface and backend selection.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use cinedex_core::error::CoreError;
use cinedex_core::movie::{Movie, NewMovie};
use cinedex_core::types::MovieId;
use serde::Serialize;

use crate::file_store::FileMovieStore;
use crate::pg_store::PgMovieStore;

/// Durable storage for movie records.
///
/// Implementations must tolerate concurrent `list` and `create` calls
/// without losing or duplicating records, and must not return from
/// `create` until the record is durably persisted.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> StoreBackend;

    /// Read every stored movie, newest first.
    async fn try_list(&self) -> Result<Vec<Movie>, CoreError>;

    /// Assign `id` and `createdAt`, persist, and return the stored record.
    async fn create(&self, movie: NewMovie) -> Result<Movie, CoreError>;

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CoreError>;

    /// Confirm the backing medium is readable.
    async fn health_check(&self) -> Result<(), CoreError>;

    /// Read every stored movie, newest first, falling back to an empty
    /// catalog when the backing medium cannot be read.
    async fn list(&self) -> Vec<Movie> {
        match self.try_list().await {
            Ok(movies) => movies,
            Err(err) => {
                tracing::warn!(
                    backend = self.backend().name(),
                    error = %err,
                    "Movie store read failed, serving empty catalog",
                );
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Postgres,
}

impl StoreBackend {
    /// Parse from the `MOVIE_STORE` configuration value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(CoreError::Validation(format!(
                "Unknown movie store '{other}'. Must be one of: file, postgres"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Postgres => "postgres",
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON document used by the file backend.
    pub movies_file: PathBuf,
    /// Connection string, required by the postgres backend.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

/// Errors raised while opening a store at startup.
#[derive(Debug, thiserror::Error)]
pub enum OpenStoreError {
    #[error("DATABASE_URL must be set when MOVIE_STORE=postgres")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Open the configured backend.
///
/// For postgres this connects, checks health and applies migrations before
/// returning.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn MovieStore>, OpenStoreError> {
    match config.backend {
        StoreBackend::File => {
            tracing::info!(path = %config.movies_file.display(), "Using file movie store");
            Ok(Arc::new(FileMovieStore::new(config.movies_file.clone())))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(OpenStoreError::MissingDatabaseUrl)?;

            let pool = crate::create_pool(url, config.max_connections).await?;
            tracing::info!("Database connection pool created");

            crate::health_check(&pool).await?;
            tracing::info!("Database health check passed");

            crate::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgMovieStore::new(pool)))
        }
    }
}
