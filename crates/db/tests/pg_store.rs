//! Integration tests for the PostgreSQL movie store.
//!
//! These need a live database (`DATABASE_URL`); run with
//! `cargo test -p cinedex-db -- --ignored`.

use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use cinedex_core::error::CoreError;
use cinedex_core::movie::NewMovie;
use cinedex_db::pg_store::PgMovieStore;
use cinedex_db::store::MovieStore;
use sqlx::PgPool;

fn new_movie(title: &str) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        release_date: NaiveDate::from_ymd_opt(2021, 10, 22).unwrap(),
        genre: vec!["Sci-Fi".to_string(), "Adventure".to_string()],
        runtime: 155,
        plot_summary: "Spice must flow".to_string(),
        poster_url: Some("https://example.com/dune.jpg".to_string()),
        trailer_url: None,
        rating: 8.0,
        review_count: 900,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_then_list_round_trips(pool: PgPool) {
    let store = PgMovieStore::new(pool);

    let created = store.create(new_movie("Dune")).await.unwrap();
    assert_eq!(created.title, "Dune");
    assert_eq!(created.genre, vec!["Sci-Fi", "Adventure"]);
    assert!(created.trailer_url.is_none());

    let movies = store.list().await;
    assert_eq!(movies, vec![created.clone()]);

    let found = store.find_by_id(created.id).await.unwrap();
    assert_eq!(found, Some(created));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_title_is_a_persistence_error(pool: PgPool) {
    let store = PgMovieStore::new(pool);

    store.create(new_movie("Dune")).await.unwrap();
    assert_matches!(
        store.create(new_movie("Dune")).await,
        Err(CoreError::Persistence(msg)) if msg.contains("uq_movies_title")
    );
    assert_eq!(store.list().await.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_creates_get_distinct_ids(pool: PgPool) {
    let store = Arc::new(PgMovieStore::new(pool));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.create(new_movie(&format!("Movie {i}"))).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap().id);
    }
    assert_eq!(ids.len(), 50);
    assert_eq!(store.list().await.len(), 50);
}
