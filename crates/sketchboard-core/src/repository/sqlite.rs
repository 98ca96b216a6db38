use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Row,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
        SqliteSynchronous,
    },
};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::{RepositoryError, SketchRepository};
use crate::sketch::{NewSketch, Sketch, SketchId};

const SELECT_COLUMNS: &str = "id, title, image_url, thumbnail_url, created_at";

pub struct SqliteSketchRepository {
    pool: SqlitePool,
}

impl SqliteSketchRepository {
    /// Opens (creating if needed) a database from a `sqlite:` connection string.
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| RepositoryError::connection(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        Self::open(options).await
    }

    pub async fn new(path: &Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::connection(format!("Failed to create directory: {e}"))
            })?;
        }

        Self::connect(&format!("sqlite://{}", path.display())).await
    }

    pub async fn new_in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| RepositoryError::connection(format!("Invalid SQLite path: {e}")))?;

        Self::open(options).await
    }

    async fn open(options: SqliteConnectOptions) -> Result<Self, RepositoryError> {
        // A single connection keeps `sqlite::memory:` pointing at one database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                RepositoryError::connection(format!("Failed to connect to SQLite: {e}"))
            })?;

        let repository = Self { pool };
        repository.run_migrations().await?;

        Ok(repository)
    }

    async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sketches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                image_url TEXT NOT NULL,
                thumbnail_url TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Migration {
            message: format!("Failed to create sketches table: {e}"),
        })?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_sketches_created_at
            ON sketches(created_at)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Migration {
            message: format!("Failed to create index: {e}"),
        })?;

        Ok(())
    }

    fn row_to_sketch(row: &SqliteRow) -> Result<Sketch, RepositoryError> {
        let created_at: String = row.get("created_at");
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| RepositoryError::corrupt(format!("Invalid created_at '{created_at}': {e}")))?
            .with_timezone(&Utc);

        Ok(Sketch {
            id: SketchId(row.get("id")),
            title: row.get("title"),
            image_url: row.get("image_url"),
            thumbnail_url: row.get("thumbnail_url"),
            created_at,
        })
    }
}

#[async_trait]
impl SketchRepository for SqliteSketchRepository {
    async fn insert(&self, sketch: NewSketch) -> Result<Sketch, RepositoryError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sketches (title, image_url, thumbnail_url)
            VALUES (?1, ?2, ?3)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&sketch.title)
        .bind(&sketch.image_url)
        .bind(&sketch.thumbnail_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::database(format!("Failed to insert sketch: {e}")))?;

        let inserted = Self::row_to_sketch(&row)?;
        debug!(id = %inserted.id, "Inserted sketch row");
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<Sketch>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM sketches ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::database(format!("Failed to list sketches: {e}")))?;

        rows.iter().map(Self::row_to_sketch).collect()
    }

    async fn find_by_id(&self, id: SketchId) -> Result<Option<Sketch>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM sketches WHERE id = ?1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::database(format!("Failed to load sketch: {e}")))?;

        row.as_ref().map(Self::row_to_sketch).transpose()
    }

    async fn delete(&self, id: SketchId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sketches WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete sketch: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
