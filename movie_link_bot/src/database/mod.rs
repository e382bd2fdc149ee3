use std::{collections::BTreeMap, str::FromStr};

use chrono::Utc;
pub use sqlx::Error;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Executor, Row, Sqlite,
};
use teloxide::types::{ChatId, MessageId};

use crate::types::{MovieItem, SourceRef};

type Pool = sqlx::Pool<Sqlite>;

pub struct Database {
    pool: Pool,
}

impl Database {
    /// Open the database at this SQLite URL, creating it if it doesn't exist.
    /// Without a URL, the data lives in memory and is gone on restart.
    pub async fn open(url: Option<&str>) -> Result<Database, Error> {
        match url {
            Some(url) => Self::new(url).await,
            None => Self::in_memory().await,
        }
    }

    pub async fn new(url: &str) -> Result<Database, Error> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            log::info!("Creating a new database at {url}");
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(32)
            .connect_with(
                SqliteConnectOptions::from_str(url)?
                    .pragma("cache_size", "-32768")
                    .busy_timeout(std::time::Duration::from_secs(600)),
            )
            .await?;

        Self::with_pool(pool).await
    }

    /// Every connection to `:memory:` is its own separate database,
    /// so this keeps exactly one connection around forever.
    pub async fn in_memory() -> Result<Database, Error> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: Pool) -> Result<Database, Error> {
        // MOVIE_ITEMS:
        // id (key, i64, grows with each insert so it doubles as insertion order)
        // code (string the item is saved under, not unique)
        // source_chat_id (i64)
        // source_message_id (i32 (because telegram bot api is just like that))
        // caption (string, may be NULL)
        // created_at (date+time in UTC)
        pool.execute(sqlx::query(
            "CREATE TABLE IF NOT EXISTS movie_items (
                id INTEGER PRIMARY KEY NOT NULL,
                code TEXT NOT NULL,
                source_chat_id INTEGER NOT NULL,
                source_message_id INTEGER NOT NULL,
                caption TEXT NULL,
                created_at TEXT NOT NULL
            ) STRICT;",
        ))
        .await?;

        pool.execute(sqlx::query(
            "CREATE INDEX IF NOT EXISTS movie_items_code ON movie_items(code);",
        ))
        .await?;

        Ok(Database { pool })
    }

    /// Save one more item under this code. Never replaces anything;
    /// saving the same message twice makes two items.
    pub async fn insert(
        &self,
        code: &str,
        source: SourceRef,
        caption: Option<&str>,
    ) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO movie_items(code, source_chat_id, source_message_id, caption, created_at)
            VALUES (?, ?, ?, ?, ?);",
        )
        .bind(code)
        .bind(source.chat_id.0)
        .bind(source.message_id.0)
        .bind(caption)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All items under this code, oldest first. Empty if there are none.
    pub async fn find_by_code(&self, code: &str) -> Result<Vec<MovieItem>, Error> {
        sqlx::query(
            "SELECT id, code, source_chat_id, source_message_id, caption, created_at
            FROM movie_items WHERE code=? ORDER BY id ASC;",
        )
        .bind(code)
        .map(|row: SqliteRow| MovieItem {
            id: row.get(0),
            code: row.get(1),
            source: SourceRef {
                chat_id: ChatId(row.get(2)),
                message_id: MessageId(row.get(3)),
            },
            caption: row.get(4),
            created_at: row.get(5),
        })
        .fetch_all(&self.pool)
        .await
    }

    /// Returns how many items were deleted.
    pub async fn delete_by_code(&self, code: &str) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM movie_items WHERE code=?;")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Every code there is, with how many items each has.
    #[allow(clippy::cast_sign_loss)]
    pub async fn counts_by_code(&self) -> Result<BTreeMap<String, u64>, Error> {
        let rows = sqlx::query("SELECT code, COUNT(*) FROM movie_items GROUP BY code;")
            .map(|row: SqliteRow| (row.get::<String, _>(0), row.get::<i64, _>(1) as u64))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }

    #[allow(clippy::cast_sign_loss)]
    pub async fn total_items(&self) -> Result<u64, Error> {
        sqlx::query("SELECT COUNT(*) FROM movie_items;")
            .map(|row: SqliteRow| row.get::<i64, _>(0) as u64)
            .fetch_one(&self.pool)
            .await
    }

    /// Shut the pool down, so every query after this fails.
    #[cfg(test)]
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
