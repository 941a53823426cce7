pub mod author_profiles;
pub mod books;
pub mod readers;
