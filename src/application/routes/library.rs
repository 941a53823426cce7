use axum::Json;
use axum::extract::State;

use crate::application::errors::ApiError;
use crate::application::routes::support::PathId;
use crate::application::state::AppState;
use crate::domain::author_profiles::AuthorProfile;
use crate::domain::books::Book;
use crate::domain::ids::{AuthorProfileId, BookId, ReaderId};
use crate::domain::readers::Reader;

#[tracing::instrument(skip(state))]
pub(crate) async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthorProfile>>, ApiError> {
    Ok(Json(state.author_profile_repo.list().await?))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    PathId(id): PathId<AuthorProfileId>,
) -> Result<Json<AuthorProfile>, ApiError> {
    Ok(Json(state.author_profile_repo.get(id).await?))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.book_repo.list().await?))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_book(
    State(state): State<AppState>,
    PathId(id): PathId<BookId>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.book_repo.get(id).await?))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_readers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Reader>>, ApiError> {
    Ok(Json(state.reader_repo.list().await?))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_reader(
    State(state): State<AppState>,
    PathId(id): PathId<ReaderId>,
) -> Result<Json<Reader>, ApiError> {
    Ok(Json(state.reader_repo.get(id).await?))
}
