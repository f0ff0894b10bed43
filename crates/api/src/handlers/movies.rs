//! Handlers for the movie catalog.
//!
//! Each request is independent: handlers validate input, make one store
//! call and wrap the result in the response envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cinedex_core::error::CoreError;
use cinedex_core::filter::MovieFilter;
use cinedex_core::movie::{CreateMovie, MOVIE_ENTITY};
use cinedex_core::types::MovieId;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// GET /movies
///
/// List the catalog, newest first. Optional `?search=` and `?genre=`
/// narrow the result; `count` is the number returned. An unreadable store
/// yields an empty catalog, not an error.
pub async fn list_movies(
    State(state): State<AppState>,
    filter: Result<Query<MovieFilter>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(filter) = filter?;
    let movies = filter.apply(state.store.list().await);

    Ok(Json(ListResponse::new(movies)))
}

/// POST /movies
///
/// Normalize the payload and store it. Responds 201 with the stored record.
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<CreateMovie>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let new_movie = input.normalize()?;
    let movie = state.store.create(new_movie).await?;

    tracing::info!(
        movie_id = %movie.id,
        title = %movie.title,
        backend = state.store.backend().name(),
        "Movie created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(movie))))
}

/// GET /movies/{id}
///
/// Retrieve a single movie by ID.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id: MovieId = raw_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid movie id '{raw_id}'")))?;

    let movie = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: MOVIE_ENTITY,
            id,
        }))?;

    Ok(Json(DataResponse::new(movie)))
}
