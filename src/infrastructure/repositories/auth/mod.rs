pub mod account_profiles;
pub mod revoked_tokens;
pub mod users;
