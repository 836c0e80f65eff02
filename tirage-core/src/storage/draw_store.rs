use crate::error::{Result, TirageError};
use crate::storage::Storage;
use crate::types::{DrawConfig, DrawMode, DrawResult, Group};
use chrono::DateTime;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

pub struct DrawStore<'a> {
    storage: &'a Storage,
}

/// Raw column values; decoded outside the rusqlite row callback so JSON and
/// UUID failures surface as `TirageError` instead of being squeezed into
/// `rusqlite::Error`.
struct DrawRow {
    id: String,
    title: String,
    draw_mode: String,
    total_participants: i64,
    created_at: i64,
    seed: i64,
    config: String,
    groups: String,
}

impl DrawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            draw_mode: row.get(2)?,
            total_participants: row.get(3)?,
            created_at: row.get(4)?,
            seed: row.get(5)?,
            config: row.get(6)?,
            groups: row.get(7)?,
        })
    }

    fn decode(self) -> Result<DrawResult> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| TirageError::corrupted(format!("draw id '{}': {}", self.id, e)))?;
        let draw_mode: DrawMode = self.draw_mode.parse()?;
        let config: DrawConfig = serde_json::from_str(&self.config)?;
        let groups: Vec<Group> = serde_json::from_str(&self.groups)?;

        Ok(DrawResult {
            id: Some(id),
            title: self.title,
            draw_mode,
            groups,
            total_participants: usize::try_from(self.total_participants).map_err(|_| {
                TirageError::corrupted(format!(
                    "negative participant count for draw {}",
                    self.id
                ))
            })?,
            created_at: DateTime::from_timestamp_millis(self.created_at).ok_or_else(|| {
                TirageError::corrupted(format!(
                    "timestamp {} out of range for draw {}",
                    self.created_at, self.id
                ))
            })?,
            config,
            seed: self.seed as u64,
        })
    }
}

const SELECT_DRAW: &str = "SELECT id, title, draw_mode, total_participants, created_at, seed, config, groups
     FROM draws";

impl<'a> DrawStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn save_draw(&self, draw: &DrawResult) -> Result<()> {
        let id = draw
            .id
            .ok_or_else(|| TirageError::internal("cannot store a draw without an id"))?;
        let config = serde_json::to_string(&draw.config)?;
        let groups = serde_json::to_string(&draw.groups)?;

        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO draws (id, title, draw_mode, total_participants, created_at, seed, config, groups)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.to_string(),
                draw.title,
                draw.draw_mode.to_string(),
                draw.total_participants as i64,
                draw.created_at.timestamp_millis(),
                // bit-preserving; decoded with `as u64`
                draw.seed as i64,
                config,
                groups,
            ],
        )?;

        Ok(())
    }

    pub async fn load_draw(&self, id: Uuid) -> Result<DrawResult> {
        let row = {
            let conn = self.storage.get_connection().await;
            let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_DRAW))?;
            let row = stmt
                .query_row(params![id.to_string()], DrawRow::from_row)
                .optional()?;
            row
        };

        row.ok_or_else(|| TirageError::draw_not_found(id))?.decode()
    }

    pub async fn list_draws(&self) -> Result<Vec<DrawResult>> {
        let rows = {
            let conn = self.storage.get_connection().await;
            let mut stmt = conn.prepare(&format!("{} ORDER BY created_at DESC", SELECT_DRAW))?;
            let row_iter = stmt.query_map([], DrawRow::from_row)?;

            let mut rows = Vec::new();
            for row in row_iter {
                rows.push(row?);
            }
            rows
        };

        rows.into_iter().map(DrawRow::decode).collect()
    }

    pub async fn delete_draw(&self, id: Uuid) -> Result<()> {
        let conn = self.storage.get_connection().await;
        conn.execute("DELETE FROM draws WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    pub async fn draw_exists(&self, id: Uuid) -> Result<bool> {
        let conn = self.storage.get_connection().await;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM draws WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
