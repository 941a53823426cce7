use std::sync::Arc;

use image::ImageFormat;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::errors::AppError;
use crate::domain::account_profiles::{
    AccountProfile, PICTURE_DIRECTORY, PictureDownload, PictureRef, PictureUpload,
    sanitize_filename,
};
use crate::domain::ids::AccountId;
use crate::domain::repositories::{AccountProfileRepository, AccountRepository};
use crate::domain::storage::PictureStore;

/// Largest accepted picture upload.
pub const MAX_PICTURE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct PictureService {
    account_repo: Arc<dyn AccountRepository>,
    profile_repo: Arc<dyn AccountProfileRepository>,
    store: Arc<dyn PictureStore>,
}

impl PictureService {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        profile_repo: Arc<dyn AccountProfileRepository>,
        store: Arc<dyn PictureStore>,
    ) -> Self {
        Self {
            account_repo,
            profile_repo,
            store,
        }
    }

    /// Store a new picture for the account, replacing any previous one.
    #[tracing::instrument(skip(self, upload), fields(bytes = upload.data.len()))]
    pub async fn upload(
        &self,
        account_id: AccountId,
        upload: PictureUpload,
    ) -> Result<AccountProfile, AppError> {
        self.account_repo.get(account_id).await?;

        if upload.data.is_empty() {
            return Err(AppError::validation(
                "profile_pic: the submitted file is empty",
            ));
        }
        if upload.data.len() > MAX_PICTURE_BYTES {
            return Err(AppError::validation("profile_pic: the submitted file is too large"));
        }
        let content_type = sniff_content_type(&upload.data)?;

        let filename = sanitize_filename(upload.filename.as_deref());
        let key = format!("{PICTURE_DIRECTORY}/{}-{filename}", Uuid::new_v4().simple());
        self.store.save(&key, &upload.data).await?;

        let profile = match self.attach(account_id, &key, filename, content_type).await {
            Ok(profile) => profile,
            Err(err) => {
                self.discard(&key).await;
                return Err(err);
            }
        };

        info!(account.id = %account_id, path = %key, "profile picture stored");
        Ok(profile)
    }

    #[tracing::instrument(skip(self))]
    pub async fn download(&self, account_id: AccountId) -> Result<PictureDownload, AppError> {
        let profile = self.profile_repo.get_by_account(account_id).await?;
        let picture = profile.picture.ok_or(AppError::NotFound)?;
        let data = self.store.load(&picture.path).await?;

        Ok(PictureDownload {
            filename: picture.filename,
            content_type: picture.content_type,
            data,
        })
    }

    async fn attach(
        &self,
        account_id: AccountId,
        key: &str,
        filename: String,
        content_type: &str,
    ) -> Result<AccountProfile, AppError> {
        let existing = self.profile_repo.get_or_create(account_id).await?;
        let profile = self
            .profile_repo
            .set_picture(
                account_id,
                PictureRef {
                    path: key.to_string(),
                    filename,
                    content_type: content_type.to_string(),
                },
            )
            .await?;

        if let Some(previous) = existing.picture
            && previous.path != key
        {
            self.discard(&previous.path).await;
        }
        Ok(profile)
    }

    async fn discard(&self, key: &str) {
        if let Err(err) = self.store.remove(key).await {
            warn!(error = %err, path = %key, "failed to remove stored picture");
        }
    }
}

fn sniff_content_type(data: &[u8]) -> Result<&'static str, AppError> {
    let unsupported = || {
        AppError::validation(
            "profile_pic: upload a valid image. The file you uploaded was either not an image or a corrupted image",
        )
    };

    match image::guess_format(data).map_err(|_| unsupported())? {
        ImageFormat::Png => Ok("image/png"),
        ImageFormat::Jpeg => Ok("image/jpeg"),
        ImageFormat::Gif => Ok("image/gif"),
        ImageFormat::WebP => Ok("image/webp"),
        _ => Err(unsupported()),
    }
}
