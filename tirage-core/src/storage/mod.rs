pub mod draw_store;

pub use draw_store::DrawStore;

use crate::error::{Result, TirageError};
use crate::types::{DrawConfig, DrawResult};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Persistence collaborator for finished draws.
///
/// The draw session hands results over opaquely; how they are stored is up
/// to the implementation.
#[async_trait]
pub trait DrawRepository: Send + Sync {
    /// Persist a draw and return the stored copy, with its `id` assigned.
    async fn save(&self, config: &DrawConfig, result: &DrawResult) -> Result<DrawResult>;

    /// All stored draws, newest first.
    async fn list(&self) -> Result<Vec<DrawResult>>;

    /// Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TirageError::internal(format!("Failed to create directory: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    pub async fn in_memory() -> Result<Self> {
        let storage = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };

        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS draws (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                draw_mode TEXT NOT NULL,
                total_participants INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                seed INTEGER NOT NULL,
                config TEXT NOT NULL,
                groups TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS draws_created_at ON draws (created_at)",
            [],
        )?;

        Ok(())
    }

    pub async fn get_connection(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}

#[async_trait]
impl DrawRepository for Storage {
    async fn save(&self, config: &DrawConfig, result: &DrawResult) -> Result<DrawResult> {
        let mut stored = result.clone();
        stored.config = config.clone();
        let id = *stored.id.get_or_insert_with(Uuid::new_v4);

        DrawStore::new(self).save_draw(&stored).await?;

        tracing::info!("Saved draw '{}' with ID: {}", stored.title, id);
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<DrawResult>> {
        DrawStore::new(self).list_draws().await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let store = DrawStore::new(self);
        if !store.draw_exists(id).await? {
            return Ok(false);
        }

        store.delete_draw(id).await?;
        tracing::info!("Deleted draw {}", id);
        Ok(true)
    }
}
