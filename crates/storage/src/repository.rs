use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use tutor_core::weakness::WeaknessReport;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Longitudinal per-topic learning record.
///
/// Weak areas and strengths only ever grow through merges; removal is an
/// explicit external action, never automatic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub topic: String,
    pub weak_areas: Vec<String>,
    pub strengths: Vec<String>,
    pub last_score: u8,
    pub updated_at: DateTime<Utc>,
}

/// One scoring pass worth of progress data, ready to merge into the record
/// for its topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub topic: String,
    pub report: WeaknessReport,
    pub score: u8,
    pub updated_at: DateTime<Utc>,
}

/// Merges new tags into an existing list, keeping order and skipping exact
/// duplicates.
#[must_use]
pub fn union_merge(existing: Vec<String>, incoming: &[String]) -> Vec<String> {
    let mut merged = existing;
    for entry in incoming {
        if !merged.iter().any(|e| e == entry) {
            merged.push(entry.clone());
        }
    }
    merged
}

/// Repository contract for per-topic learning progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Union-merge one scoring pass into the topic's record, creating the
    /// record when the topic is new. `last_score` and `updated_at` are
    /// overwritten; the tag lists only grow.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn merge_progress(&self, update: ProgressUpdate) -> Result<(), StorageError>;

    /// Fetch the record for a topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures; a missing topic is `None`.
    async fn get_progress(&self, topic: &str) -> Result<Option<ProgressRecord>, StorageError>;

    /// List all tracked topics.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_topics(&self) -> Result<Vec<String>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressRepository {
    records: Arc<Mutex<HashMap<String, ProgressRecord>>>,
}

impl InMemoryProgressRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn merge_progress(&self, update: ProgressUpdate) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let record = match guard.remove(&update.topic) {
            Some(existing) => ProgressRecord {
                topic: existing.topic,
                weak_areas: union_merge(existing.weak_areas, &update.report.weak_areas),
                strengths: union_merge(existing.strengths, &update.report.strengths),
                last_score: update.score,
                updated_at: update.updated_at,
            },
            None => ProgressRecord {
                topic: update.topic.clone(),
                weak_areas: update.report.weak_areas.clone(),
                strengths: update.report.strengths.clone(),
                last_score: update.score,
                updated_at: update.updated_at,
            },
        };
        guard.insert(record.topic.clone(), record);
        Ok(())
    }

    async fn get_progress(&self, topic: &str) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(topic).cloned())
    }

    async fn list_topics(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut topics: Vec<String> = guard.keys().cloned().collect();
        topics.sort();
        Ok(topics)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            progress: Arc::new(InMemoryProgressRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::time::fixed_now;

    fn report(weak: &[&str], strong: &[&str]) -> WeaknessReport {
        WeaknessReport {
            weak_areas: weak.iter().map(|s| (*s).to_string()).collect(),
            strengths: strong.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn first_merge_creates_the_record() {
        let repo = InMemoryProgressRepository::new();
        repo.merge_progress(ProgressUpdate {
            topic: "rust".into(),
            report: report(&["lifetimes"], &["ownership"]),
            score: 60,
            updated_at: fixed_now(),
        })
        .await
        .unwrap();

        let record = repo.get_progress("rust").await.unwrap().unwrap();
        assert_eq!(record.weak_areas, vec!["lifetimes".to_string()]);
        assert_eq!(record.strengths, vec!["ownership".to_string()]);
        assert_eq!(record.last_score, 60);
    }

    #[tokio::test]
    async fn merge_unions_tags_and_overwrites_score() {
        let repo = InMemoryProgressRepository::new();
        repo.merge_progress(ProgressUpdate {
            topic: "rust".into(),
            report: report(&["lifetimes"], &["ownership"]),
            score: 40,
            updated_at: fixed_now(),
        })
        .await
        .unwrap();
        repo.merge_progress(ProgressUpdate {
            topic: "rust".into(),
            report: report(&["lifetimes", "traits"], &["borrowing"]),
            score: 80,
            updated_at: fixed_now(),
        })
        .await
        .unwrap();

        let record = repo.get_progress("rust").await.unwrap().unwrap();
        // Nothing is removed; new entries append after existing ones.
        assert_eq!(
            record.weak_areas,
            vec!["lifetimes".to_string(), "traits".to_string()]
        );
        assert_eq!(
            record.strengths,
            vec!["ownership".to_string(), "borrowing".to_string()]
        );
        assert_eq!(record.last_score, 80);
    }

    #[tokio::test]
    async fn unknown_topic_reads_as_none() {
        let repo = InMemoryProgressRepository::new();
        assert!(repo.get_progress("missing").await.unwrap().is_none());
        assert!(repo.list_topics().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn topics_list_is_sorted() {
        let repo = InMemoryProgressRepository::new();
        for topic in ["zig", "ada", "rust"] {
            repo.merge_progress(ProgressUpdate {
                topic: topic.into(),
                report: report(&[], &[]),
                score: 50,
                updated_at: fixed_now(),
            })
            .await
            .unwrap();
        }
        assert_eq!(
            repo.list_topics().await.unwrap(),
            vec!["ada".to_string(), "rust".to_string(), "zig".to_string()]
        );
    }
}
