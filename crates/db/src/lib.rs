//! Persistence for the movie catalog.
//!
//! [`store::MovieStore`] is the single interface the HTTP layer talks to.
//! Two backends implement it: a JSON file ([`file_store::FileMovieStore`])
//! and PostgreSQL ([`pg_store::PgMovieStore`]). [`store::open_store`] picks
//! one from configuration.

use sqlx::postgres::PgPoolOptions;

pub mod file_store;
pub mod models;
pub mod pg_store;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
