pub mod accounts;
pub mod errors;
pub mod ids;
pub mod library;
pub mod repositories;
pub mod storage;

// Re-exports
pub use accounts::{account_profiles, tokens, users};
pub use errors::{RepositoryError, StorageError};
pub use library::{author_profiles, books, readers};
