use async_trait::async_trait;
use sqlx::{Sqlite, query, query_as};

use super::reader_books::fetch_books_for_readers;
use crate::domain::RepositoryError;
use crate::domain::ids::ReaderId;
use crate::domain::readers::{NewReader, Reader};
use crate::domain::repositories::ReaderRepository;
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlReaderRepository {
    pool: DatabasePool,
}

impl SqlReaderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn attach_books(&self, records: Vec<ReaderRecord>) -> Result<Vec<Reader>, RepositoryError> {
        let reader_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let mut books = fetch_books_for_readers(&self.pool, &reader_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| Reader {
                id: ReaderId::from(record.id),
                books: books.remove(&record.id).unwrap_or_default(),
                name: record.name,
            })
            .collect())
    }
}

async fn link_book<'e, E>(executor: E, reader_id: i64, book_id: i64) -> Result<(), RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    query("INSERT INTO reader_books (reader_id, book_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
        .bind(reader_id)
        .bind(book_id)
        .execute(executor)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::conflict(format!("book {book_id} does not exist"));
            }
            RepositoryError::unexpected(err.to_string())
        })?;
    Ok(())
}

#[async_trait]
impl ReaderRepository for SqlReaderRepository {
    async fn insert(&self, reader: NewReader) -> Result<Reader, RepositoryError> {
        let reader = reader.normalize();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let (id,): (i64,) = query_as("INSERT INTO readers (name) VALUES (?) RETURNING id")
            .bind(&reader.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        for book_id in &reader.book_ids {
            link_book(&mut *tx, id, i64::from(*book_id)).await?;
        }

        tx.commit()
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        self.get(ReaderId::from(id)).await
    }

    async fn get(&self, id: ReaderId) -> Result<Reader, RepositoryError> {
        let record = query_as::<_, ReaderRecord>("SELECT id, name FROM readers WHERE id = ?")
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        let mut readers = self.attach_books(vec![record]).await?;
        readers.pop().ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Reader>, RepositoryError> {
        let records = query_as::<_, ReaderRecord>("SELECT id, name FROM readers ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        self.attach_books(records).await
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReaderRecord {
    id: i64,
    name: String,
}
