use crate::types::MovieId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: MovieId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The backing medium could not be read or rejected a write
    /// (I/O failure, unreachable database, duplicate title).
    #[error("Persistence error: {0}")]
    Persistence(String),
}
