pub mod auth;
pub mod client;
pub mod database;
pub mod repositories;
pub mod storage;
