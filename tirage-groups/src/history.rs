use crate::Result;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tirage_core::{DrawRepository, DrawResult};
use uuid::Uuid;

/// A finished draw as kept in the history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Stable key for the entry; equals the persisted id once saved.
    pub key: Uuid,
    pub result: DrawResult,
}

impl HistoryEntry {
    pub fn is_saved(&self) -> bool {
        self.result.is_saved()
    }
}

/// Draw history with an optional persistence collaborator.
///
/// Saving is best effort: when the repository is missing or fails, the
/// result is still kept as a local, unsaved entry. Computed groups are never
/// thrown away because of storage.
pub struct DrawHistory {
    repository: Option<Arc<dyn DrawRepository>>,
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl DrawHistory {
    /// History kept in memory only.
    pub fn local() -> Self {
        Self {
            repository: None,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_repository(repository: Arc<dyn DrawRepository>) -> Self {
        Self {
            repository: Some(repository),
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.repository.is_some()
    }

    /// Keep a finished draw, saving it first when a repository is attached.
    pub async fn record(&self, result: DrawResult) -> HistoryEntry {
        let result = match &self.repository {
            Some(repository) => {
                let saved = repository.save(&result.config, &result).await;
                match saved {
                    Ok(saved) => saved,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to save draw '{}', keeping it locally: {}",
                            result.title,
                            e
                        );
                        result
                    }
                }
            }
            None => result,
        };

        let entry = HistoryEntry {
            key: result.id.unwrap_or_else(Uuid::new_v4),
            result,
        };

        self.entries.write().insert(0, entry.clone());
        entry
    }

    /// Newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    pub fn get(&self, key: Uuid) -> Option<HistoryEntry> {
        self.entries.read().iter().find(|e| e.key == key).cloned()
    }

    /// Reload saved entries from the repository. Unsaved local entries are
    /// kept.
    pub async fn refresh(&self) -> Result<()> {
        let Some(repository) = &self.repository else {
            return Ok(());
        };

        let saved = repository.list().await?;

        let mut entries = self.entries.write();
        entries.retain(|e| !e.is_saved());
        entries.extend(saved.into_iter().map(|result| HistoryEntry {
            key: result.id.unwrap_or_else(Uuid::new_v4),
            result,
        }));
        entries.sort_by(|a, b| b.result.created_at.cmp(&a.result.created_at));
        Ok(())
    }

    /// Remove an entry, deleting it from the repository when it was saved.
    /// Returns `false` when nothing matched `key`.
    pub async fn delete(&self, key: Uuid) -> Result<bool> {
        let mut removed = false;

        // Saved entries, and keys not loaded yet, may live in the repository.
        if self.get(key).map_or(true, |entry| entry.is_saved()) {
            if let Some(repository) = &self.repository {
                removed = repository.delete(key).await?;
            }
        }

        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.key != key);
        Ok(removed || entries.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawEngine, DrawSession};
    use async_trait::async_trait;
    use tirage_core::{DrawConfig, Participant, Storage, TirageError};

    struct BrokenRepository;

    #[async_trait]
    impl DrawRepository for BrokenRepository {
        async fn save(
            &self,
            _config: &DrawConfig,
            _result: &DrawResult,
        ) -> tirage_core::Result<DrawResult> {
            Err(TirageError::internal("backend unavailable"))
        }

        async fn list(&self) -> tirage_core::Result<Vec<DrawResult>> {
            Err(TirageError::internal("backend unavailable"))
        }

        async fn delete(&self, _id: Uuid) -> tirage_core::Result<bool> {
            Ok(false)
        }
    }

    fn finished_draw(title: &str) -> DrawResult {
        let config = DrawConfig {
            participants: ["A", "B", "C", "D", "E"]
                .iter()
                .map(|n| Participant::new(*n))
                .collect(),
            number_of_groups: 2,
            participants_per_group: 3,
            ..DrawConfig::new(title)
        };
        DrawEngine::with_seed(9).draw(&config)
    }

    #[tokio::test]
    async fn test_local_history_keeps_unsaved_entries() {
        let history = DrawHistory::local();
        let entry = history.record(finished_draw("local")).await;

        assert!(!entry.is_saved());
        assert_eq!(history.entries().len(), 1);
        assert!(history.delete(entry.key).await.unwrap());
        assert!(history.entries().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_falls_back_to_local_entry() {
        let history = DrawHistory::with_repository(Arc::new(BrokenRepository));
        let draw = finished_draw("offline");
        let groups = draw.groups.clone();

        let entry = history.record(draw).await;

        assert!(!entry.is_saved());
        assert_eq!(entry.result.groups, groups);
        assert_eq!(history.entries().len(), 1);
        assert!(history.refresh().await.is_err());
        assert_eq!(history.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_saved_draws_round_trip_through_storage() {
        let storage = Arc::new(Storage::in_memory().await.unwrap());
        let history = DrawHistory::with_repository(storage.clone());

        let mut session = DrawSession::from_config(finished_draw("stored").config);
        session.next_step();
        session.next_step();
        let result = session.perform_draw().unwrap().clone();

        let entry = history.record(result).await;
        assert!(entry.is_saved());
        assert_eq!(Some(entry.key), entry.result.id);

        let reloaded = DrawHistory::with_repository(storage.clone());
        reloaded.refresh().await.unwrap();
        let entries = reloaded.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].result.groups, entry.result.groups);

        assert!(reloaded.delete(entry.key).await.unwrap());
        assert!(storage.list().await.unwrap().is_empty());
        assert!(!reloaded.delete(entry.key).await.unwrap());
    }
}
