mod accounts;
pub mod pictures;
pub mod seed;
pub mod sessions;

pub use accounts::AccountService;
pub use pictures::PictureService;
pub use seed::SeedService;
pub use sessions::SessionService;

use crate::application::errors::AppError;
use crate::infrastructure::auth::{hash_password, verify_password};

/// Hash a password on the blocking pool; bcrypt is deliberately slow.
pub(crate) async fn hash_in_background(password: String, cost: u32) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;
    Ok(hash)
}

pub(crate) async fn verify_in_background(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
    Ok(matches)
}
