use async_trait::async_trait;
use sqlx::query_as;

use super::author_profiles::AuthorProfileRecord;
use crate::domain::RepositoryError;
use crate::domain::books::{Book, NewBook};
use crate::domain::ids::BookId;
use crate::domain::repositories::BookRepository;
use crate::infrastructure::database::DatabasePool;

/// Books joined with their author profile and that profile's account, so a
/// listing is one round trip.
const BOOK_SELECT: &str = r"SELECT b.id, b.title,
          ap.id AS author_id, ap.bio, ap.website,
          a.id AS account_id, a.username, a.email
   FROM books b
   JOIN author_profiles ap ON ap.id = b.author_id
   JOIN accounts a ON a.id = ap.account_id";

#[derive(Clone)]
pub struct SqlBookRepository {
    pool: DatabasePool,
}

impl SqlBookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: BookRecord) -> Book {
        Book {
            id: BookId::from(record.id),
            title: record.title,
            author: record.author.into_domain(),
        }
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError> {
        let book = book.normalize();

        let (id,): (i64,) =
            query_as("INSERT INTO books (title, author_id) VALUES (?, ?) RETURNING id")
                .bind(&book.title)
                .bind(i64::from(book.author_id))
                .fetch_one(&self.pool)
                .await
                .map_err(|err| {
                    if let sqlx::Error::Database(db_err) = &err
                        && db_err.is_foreign_key_violation()
                    {
                        return RepositoryError::conflict("author profile does not exist");
                    }
                    RepositoryError::unexpected(err.to_string())
                })?;

        self.get(BookId::from(id)).await
    }

    async fn get(&self, id: BookId) -> Result<Book, RepositoryError> {
        let sql = format!("{BOOK_SELECT} WHERE b.id = ?");
        query_as::<_, BookRecord>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .map(Self::into_domain)
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_title(&self, title: &str) -> Result<Book, RepositoryError> {
        let sql = format!("{BOOK_SELECT} WHERE b.title = ? ORDER BY b.id ASC LIMIT 1");
        query_as::<_, BookRecord>(&sql)
            .bind(title.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .map(Self::into_domain)
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let sql = format!("{BOOK_SELECT} ORDER BY b.id ASC");
        let records = query_as::<_, BookRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records.into_iter().map(Self::into_domain).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookRecord {
    id: i64,
    title: String,
    #[sqlx(flatten)]
    author: AuthorProfileRecord,
}
