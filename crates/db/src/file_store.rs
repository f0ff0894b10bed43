//! JSON file movie store.
//!
//! The whole catalog lives in one pretty-printed JSON array. Every create
//! rewrites the document in full: read all, push, write all, under a mutex so
//! two racing creates cannot lose each other's record. Writes go to a sibling
//! temp file that is fsynced and renamed over the target, so readers never see
//! a half-written document and a failed write leaves the previous one intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use cinedex_core::error::CoreError;
use cinedex_core::movie::{sort_newest_first, Movie, NewMovie};
use cinedex_core::types::{new_movie_id, MovieId};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::store::{MovieStore, StoreBackend};

/// Errors from reading or writing the catalog document.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<FileStoreError> for CoreError {
    fn from(err: FileStoreError) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

/// Movie store backed by a single JSON file.
pub struct FileMovieStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileMovieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the document in stored (insertion) order.
    ///
    /// A missing file is an empty catalog.
    async fn read_all(&self) -> Result<Vec<Movie>, FileStoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(FileStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| FileStoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the document with `movies`, durably.
    ///
    /// Once the rename has succeeded the new document is in place, so a failed
    /// flush of the parent directory is logged and the write still reports
    /// success.
    async fn write_all(&self, movies: &[Movie]) -> Result<(), FileStoreError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(io_error(parent))?;

        let json = serde_json::to_vec_pretty(movies).map_err(|source| FileStoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        if let Err(source) = replace_file(&tmp, &self.path, &json).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(FileStoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        flush_dir(parent).await;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FileStoreError {
    let path = path.to_path_buf();
    move |source| FileStoreError::Io { path, source }
}

/// Write `bytes` to `tmp`, fsync it, then rename it over `target`.
async fn replace_file(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(tmp, target).await
}

/// Flush the directory entry so the rename survives a crash.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

async fn flush_dir(dir: &Path) {
    if let Err(e) = sync_dir(dir).await {
        tracing::warn!(
            error = %e,
            dir = %dir.display(),
            "Catalog directory flush failed after rename",
        );
    }
}

#[async_trait]
impl MovieStore for FileMovieStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::File
    }

    async fn try_list(&self) -> Result<Vec<Movie>, CoreError> {
        let mut movies = self.read_all().await?;
        sort_newest_first(&mut movies);
        Ok(movies)
    }

    async fn create(&self, movie: NewMovie) -> Result<Movie, CoreError> {
        let _guard = self.write_lock.lock().await;

        let mut movies = self.read_all().await?;
        let movie = movie.into_movie(new_movie_id(), Utc::now());
        movies.push(movie.clone());
        self.write_all(&movies).await?;

        tracing::debug!(
            movie_id = %movie.id,
            total = movies.len(),
            path = %self.path.display(),
            "Movie appended to catalog file",
        );

        Ok(movie)
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, CoreError> {
        let movies = self.read_all().await?;
        Ok(movies.into_iter().find(|m| m.id == id))
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        self.read_all().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
