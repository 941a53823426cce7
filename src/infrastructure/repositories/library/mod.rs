pub mod author_profiles;
pub mod books;
pub(crate) mod reader_books;
pub mod readers;
