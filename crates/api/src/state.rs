use std::sync::Arc;

use cinedex_db::store::MovieStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The configured movie store (file or postgres).
    pub store: Arc<dyn MovieStore>,
}
