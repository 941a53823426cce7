pub mod auth;
pub mod library;

// Re-exports
pub use auth::{account_profiles, revoked_tokens, users};
pub use library::{author_profiles, books, readers};

pub use account_profiles::SqlAccountProfileRepository;
pub use author_profiles::SqlAuthorProfileRepository;
pub use books::SqlBookRepository;
pub use readers::SqlReaderRepository;
pub use revoked_tokens::SqlRevokedTokenRepository;
pub use users::SqlAccountRepository;

use crate::domain::RepositoryError;

/// Map a unique-constraint violation to `Conflict` (via `on_unique`) and
/// anything else to `Unexpected`.
pub(crate) fn map_write_error(
    err: sqlx::Error,
    on_unique: impl FnOnce(&str) -> RepositoryError,
) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return on_unique(db_err.message());
    }
    RepositoryError::unexpected(err.to_string())
}
