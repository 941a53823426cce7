pub mod account_profiles;
pub mod tokens;
pub mod users;
