use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::application::auth::AuthenticatedAccount;
use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::PathId;
use crate::application::state::AppState;
use crate::domain::account_profiles::{AccountProfile, PictureUpload};
use crate::domain::ids::AccountId;

const PICTURE_FIELD: &str = "profile_pic";

#[tracing::instrument(skip(state, _auth, multipart))]
pub(crate) async fn upload_profile_pic(
    State(state): State<AppState>,
    _auth: AuthenticatedAccount,
    PathId(id): PathId<AccountId>,
    multipart: Multipart,
) -> Result<Json<AccountProfile>, ApiError> {
    let upload = read_picture_field(multipart).await?;
    let profile = state.picture_service.upload(id, upload).await?;
    Ok(Json(profile))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn download_profile_pic(
    State(state): State<AppState>,
    PathId(id): PathId<AccountId>,
) -> Result<Response, ApiError> {
    let picture = state.picture_service.download(id).await?;

    let content_type = HeaderValue::from_str(&picture.content_type)
        .map_err(|err| AppError::unexpected(format!("invalid stored content type: {err}")))?;
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", picture.filename))
            .map_err(|err| AppError::unexpected(format!("invalid stored filename: {err}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(picture.data),
    )
        .into_response())
}

async fn read_picture_field(mut multipart: Multipart) -> Result<PictureUpload, AppError> {
    let invalid = |err: axum::extract::multipart::MultipartError| {
        warn!(error = %err, "failed to read multipart body");
        AppError::validation(format!("invalid multipart body: {}", err.body_text()))
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(invalid)?;
        return Ok(PictureUpload {
            filename,
            data: data.to_vec(),
        });
    }

    Err(AppError::validation(
        "profile_pic: no file was submitted",
    ))
}
