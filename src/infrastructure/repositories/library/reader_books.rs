use std::collections::HashMap;

use sqlx::QueryBuilder;

use crate::domain::RepositoryError;
use crate::domain::books::BookSummary;
use crate::domain::ids::BookId;
use crate::infrastructure::database::DatabasePool;

#[derive(sqlx::FromRow)]
pub(crate) struct ReaderBookRecord {
    pub reader_id: i64,
    pub book_id: i64,
    pub title: String,
}

/// Ids bound per query. SQLite caps a statement at 32766 variables.
const READER_ID_CHUNK: usize = 500;

/// Fetch every book for the given readers, one query per chunk of ids,
/// grouped by reader id.
pub(crate) async fn fetch_books_for_readers(
    pool: &DatabasePool,
    reader_ids: &[i64],
) -> Result<HashMap<i64, Vec<BookSummary>>, RepositoryError> {
    let mut grouped: HashMap<i64, Vec<BookSummary>> = HashMap::new();

    for chunk in reader_ids.chunks(READER_ID_CHUNK) {
        let mut qb = QueryBuilder::new(
            r"SELECT rb.reader_id, rb.book_id, b.title
              FROM reader_books rb
              JOIN books b ON b.id = rb.book_id
              WHERE rb.reader_id IN (",
        );

        let mut sep = qb.separated(", ");
        for id in chunk {
            sep.push_bind(*id);
        }
        sep.push_unseparated(") ORDER BY rb.reader_id, b.id");

        let records = qb
            .build_query_as::<ReaderBookRecord>()
            .fetch_all(pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        for record in records {
            grouped.entry(record.reader_id).or_default().push(BookSummary {
                id: BookId::from(record.book_id),
                title: record.title,
            });
        }
    }

    Ok(grouped)
}
