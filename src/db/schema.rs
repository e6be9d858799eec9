//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Vocabulary table (one row per word occurrence page)
CREATE TABLE IF NOT EXISTS vocab (
    id TEXT PRIMARY KEY,
    word TEXT NOT NULL,
    definition TEXT NOT NULL,
    source_tier TEXT NOT NULL,
    book_name TEXT NOT NULL,
    page_number INTEGER NOT NULL,
    learned INTEGER NOT NULL DEFAULT 0,
    times_reviewed INTEGER NOT NULL DEFAULT 0,
    last_checked TEXT,
    sentence TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),

    UNIQUE(word, book_name, page_number)
);

CREATE INDEX IF NOT EXISTS idx_vocab_book ON vocab(book_name, page_number);
CREATE INDEX IF NOT EXISTS idx_vocab_word ON vocab(word);
"#;
