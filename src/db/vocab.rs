//! Vocabulary record database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::resolver::ResolvedDefinition;

/// Stored vocabulary record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VocabRecord {
    pub id: String,
    pub word: String,
    pub definition: String,
    pub source_tier: String,
    pub book_name: String,
    pub page_number: i64,
    pub learned: bool,
    pub times_reviewed: i64,
    pub last_checked: Option<String>,
    pub sentence: Option<String>,
    pub created_at: String,
}

/// Vocabulary repository
pub struct VocabRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VocabRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether a record already exists for the key
    pub async fn exists(&self, word: &str, book_name: &str, page_number: u32) -> Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM vocab
            WHERE word = ? AND book_name = ? AND page_number = ?
            LIMIT 1
            "#,
        )
        .bind(word)
        .bind(book_name)
        .bind(page_number as i64)
        .fetch_optional(self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Store a resolved definition unless its key is already present.
    ///
    /// Returns `true` when a new row was written.
    pub async fn insert_if_absent(&self, definition: &ResolvedDefinition) -> Result<bool> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO vocab (id, word, definition, source_tier, book_name, page_number, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(word, book_name, page_number) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(&definition.word)
        .bind(&definition.definition)
        .bind(definition.tier.as_str())
        .bind(&definition.book)
        .bind(definition.page as i64)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the record for a key
    pub async fn get(
        &self,
        word: &str,
        book_name: &str,
        page_number: u32,
    ) -> Result<Option<VocabRecord>> {
        let record = sqlx::query_as::<_, VocabRecord>(
            r#"
            SELECT id, word, definition, source_tier, book_name, page_number,
                   learned, times_reviewed, last_checked, sentence, created_at
            FROM vocab
            WHERE word = ? AND book_name = ? AND page_number = ?
            "#,
        )
        .bind(word)
        .bind(book_name)
        .bind(page_number as i64)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// All records of a book, by page then word
    pub async fn list_for_book(&self, book_name: &str) -> Result<Vec<VocabRecord>> {
        let records = sqlx::query_as::<_, VocabRecord>(
            r#"
            SELECT id, word, definition, source_tier, book_name, page_number,
                   learned, times_reviewed, last_checked, sentence, created_at
            FROM vocab
            WHERE book_name = ?
            ORDER BY page_number, word
            "#,
        )
        .bind(book_name)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    pub async fn count_for_book(&self, book_name: &str) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vocab WHERE book_name = ?")
            .bind(book_name)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Distinct book names with their record counts
    pub async fn books(&self) -> Result<Vec<(String, i64)>> {
        let books = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT book_name, COUNT(*) FROM vocab
            GROUP BY book_name
            ORDER BY book_name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(books)
    }

    /// Record a review of a word. Returns `false` if the record is missing.
    pub async fn mark_reviewed(&self, id: &str, learned: bool) -> Result<bool> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE vocab
            SET times_reviewed = times_reviewed + 1,
                learned = ?,
                last_checked = ?
            WHERE id = ?
            "#,
        )
        .bind(learned)
        .bind(&now)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach an example sentence to a record
    pub async fn set_sentence(&self, id: &str, sentence: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE vocab SET sentence = ? WHERE id = ?")
            .bind(sentence)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;
    use crate::resolver::SourceTier;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    fn definition(word: &str, book: &str, page: u32) -> ResolvedDefinition {
        ResolvedDefinition {
            word: word.to_string(),
            definition: format!("definition of {}", word),
            tier: SourceTier::RawTranslation,
            book: book.to_string(),
            page,
        }
    }

    #[tokio::test]
    async fn test_duplicate_key_is_skipped() {
        let pool = test_pool().await;
        let repo = VocabRepository::new(&pool);

        let first = definition("hund", "B", 3);
        assert!(repo.insert_if_absent(&first).await.unwrap());

        let mut second = first.clone();
        second.definition = "a different text".into();
        assert!(!repo.insert_if_absent(&second).await.unwrap());

        assert_eq!(repo.count_for_book("B").await.unwrap(), 1);
        let stored = repo.get("hund", "B", 3).await.unwrap().unwrap();
        assert_eq!(stored.definition, "definition of hund");
        assert_eq!(stored.source_tier, "raw_translation");
    }

    #[tokio::test]
    async fn test_same_word_on_other_page_is_kept() {
        let pool = test_pool().await;
        let repo = VocabRepository::new(&pool);

        assert!(repo.insert_if_absent(&definition("hund", "B", 3)).await.unwrap());
        assert!(repo.insert_if_absent(&definition("hund", "B", 4)).await.unwrap());
        assert!(repo.exists("hund", "B", 4).await.unwrap());
        assert!(!repo.exists("hund", "C", 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_orders_by_page_then_word() {
        let pool = test_pool().await;
        let repo = VocabRepository::new(&pool);

        for (word, page) in [("vej", 2), ("bog", 10), ("hus", 2), ("and", 1)] {
            repo.insert_if_absent(&definition(word, "B", page)).await.unwrap();
        }
        repo.insert_if_absent(&definition("kat", "A", 1)).await.unwrap();

        let words: Vec<_> = repo
            .list_for_book("B")
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.page_number, r.word))
            .collect();
        assert_eq!(
            words,
            vec![
                (1, "and".to_string()),
                (2, "hus".to_string()),
                (2, "vej".to_string()),
                (10, "bog".to_string()),
            ]
        );

        let books = repo.books().await.unwrap();
        assert_eq!(books, vec![("A".to_string(), 1), ("B".to_string(), 4)]);
    }

    #[tokio::test]
    async fn test_review_and_sentence_updates() {
        let pool = test_pool().await;
        let repo = VocabRepository::new(&pool);
        repo.insert_if_absent(&definition("hund", "B", 3)).await.unwrap();
        let id = repo.get("hund", "B", 3).await.unwrap().unwrap().id;

        assert!(repo.mark_reviewed(&id, false).await.unwrap());
        assert!(repo.mark_reviewed(&id, true).await.unwrap());
        assert!(repo.set_sentence(&id, "Hunden gøer.").await.unwrap());
        assert!(!repo.mark_reviewed("missing", true).await.unwrap());

        let record = repo.get("hund", "B", 3).await.unwrap().unwrap();
        assert_eq!(record.times_reviewed, 2);
        assert!(record.learned);
        assert!(record.last_checked.is_some());
        assert_eq!(record.sentence.as_deref(), Some("Hunden gøer."));
    }
}
