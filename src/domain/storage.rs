use async_trait::async_trait;

use super::StorageError;

/// Path-addressable binary object storage for uploaded pictures.
///
/// Keys are relative, `/`-separated paths such as `profile_pics/abc-me.png`.
#[async_trait]
pub trait PictureStore: Send + Sync {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;
    async fn load(&self, key: &str) -> Result<Vec<u8>, StorageError>;
    /// Removing a missing object succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
