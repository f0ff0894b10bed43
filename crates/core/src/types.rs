use uuid::Uuid;

/// Movie identifiers are UUID v7: collision-resistant and time-ordered.
pub type MovieId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh movie identifier.
pub fn new_movie_id() -> MovieId {
    Uuid::now_v7()
}

/// Map a legacy millisecond-timestamp id onto the UUID v7 for that instant.
///
/// The random bits are zero, so the mapping is stable across reloads.
pub fn legacy_movie_id(millis: u64) -> MovieId {
    uuid::Builder::from_unix_timestamp_millis(millis, &[0; 10]).into_uuid()
}
