//! SQLite-backed key-value store for user preferences.

use std::str::FromStr;

use annadata_core::{error::AnnadataError, shellexpand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Preference key holding the selected language code.
pub const LANGUAGE_KEY: &str = "language";

/// Persistent preferences backed by SQLite.
#[derive(Clone)]
pub struct PreferenceStore {
    pool: SqlitePool,
}

impl PreferenceStore {
    /// Open (or create) the database at `db_path`, running migrations.
    pub async fn open(db_path: &str) -> Result<Self, AnnadataError> {
        let db_path = shellexpand(db_path);

        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AnnadataError::Preferences(format!("failed to create data dir: {e}"))
            })?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AnnadataError::Preferences(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(opts)
            .await
            .map_err(|e| AnnadataError::Preferences(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;
        info!("Preference store initialized at {db_path}");
        Ok(Self { pool })
    }

    /// A private in-memory store (single connection, nothing persisted).
    pub async fn in_memory() -> Result<Self, AnnadataError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AnnadataError::Preferences(format!("invalid db path: {e}")))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| AnnadataError::Preferences(format!("failed to connect to sqlite: {e}")))?;
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), AnnadataError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| {
            AnnadataError::Preferences(format!("failed to create migrations table: {e}"))
        })?;

        let migrations: &[(&str, &str)] = &[(
            "001_preferences",
            include_str!("../migrations/001_preferences.sql"),
        )];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        AnnadataError::Preferences(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| AnnadataError::Preferences(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    AnnadataError::Preferences(format!("failed to record migration {name}: {e}"))
                })?;
        }
        Ok(())
    }

    /// Get a preference value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, AnnadataError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AnnadataError::Preferences(format!("query failed: {e}")))?;

        Ok(row.map(|(v,)| v))
    }

    /// Store a preference (upsert by key).
    pub async fn set(&self, key: &str, value: &str) -> Result<(), AnnadataError> {
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AnnadataError::Preferences(format!("upsert preference failed: {e}")))?;

        Ok(())
    }

    /// Delete a preference. Returns `true` if a row was deleted.
    pub async fn delete(&self, key: &str) -> Result<bool, AnnadataError> {
        let result = sqlx::query("DELETE FROM preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AnnadataError::Preferences(format!("delete failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = PreferenceStore::in_memory().await.unwrap();
        assert_eq!(store.get(LANGUAGE_KEY).await.unwrap(), None);

        store.set(LANGUAGE_KEY, "hi").await.unwrap();
        assert_eq!(store.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("hi"));

        store.set(LANGUAGE_KEY, "ta").await.unwrap();
        assert_eq!(store.get(LANGUAGE_KEY).await.unwrap().as_deref(), Some("ta"));

        assert!(store.delete(LANGUAGE_KEY).await.unwrap());
        assert!(!store.delete(LANGUAGE_KEY).await.unwrap());
        assert_eq!(store.get(LANGUAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/preferences.db");
        let path = path.to_str().unwrap();

        let store = PreferenceStore::open(path).await.unwrap();
        store.set(LANGUAGE_KEY, "mr").await.unwrap();
        store.pool.close().await;

        let reopened = PreferenceStore::open(path).await.unwrap();
        assert_eq!(
            reopened.get(LANGUAGE_KEY).await.unwrap().as_deref(),
            Some("mr")
        );
    }
}
