use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AggregateScoreStore, ContentResolver, DataSourceId, ObjectId, ScoreRow};
use crate::{CaseLock, Confidence, Score, ScoreStoreError, ScoreWriteError, Significance};

// Rows are kept in the persisted shape: integer codes, not enum values,
// mirroring the significance/confidence columns of a SQL store.
#[derive(Clone, Debug)]
struct StoredRow {
    data_source_id: DataSourceId,
    significance: i64,
    confidence: i64,
    version: u64,
}

/// A materialized case object, as produced by [`MemoryScoreStore`]'s
/// content lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryContent {
    /// The object's id
    pub object_id: ObjectId,
    /// A human-readable label for the object
    pub name: String,
}

/// A trivial implementation of [`AggregateScoreStore`] - backed by a
/// [`HashMap`] - where all rows are kept in memory and never persisted.
///
/// Clones share the same underlying rows and case lock, so a cloned
/// store behaves like another connection to the same case.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    rows: Arc<RwLock<HashMap<ObjectId, StoredRow>>>,
    contents: Arc<RwLock<HashMap<ObjectId, MemoryContent>>>,
    lock: Arc<CaseLock>,
}

impl MemoryScoreStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a case object so that content lookups for its id
    /// resolve.
    pub async fn add_content(&self, object_id: ObjectId, name: impl Into<String>) {
        let mut contents = self.contents.write().await;
        contents.insert(
            object_id,
            MemoryContent {
                object_id,
                name: name.into(),
            },
        );
    }
}

#[async_trait]
impl AggregateScoreStore for MemoryScoreStore {
    async fn resolve(&self, object_id: ObjectId) -> Result<Option<ScoreRow>, ScoreStoreError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&object_id).map(|row| ScoreRow {
            data_source_id: row.data_source_id,
            score: Score::new(
                Significance::from_id(row.significance),
                Confidence::from_id(row.confidence),
            ),
            version: row.version,
        }))
    }

    async fn apply(
        &self,
        object_id: ObjectId,
        data_source_id: DataSourceId,
        score: Score,
        expected_version: u64,
    ) -> Result<(), ScoreWriteError> {
        let mut rows = self.rows.write().await;

        match rows.entry(object_id) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().version != expected_version {
                    return Err(ScoreWriteError::Conflict);
                }
                occupied.insert(StoredRow {
                    data_source_id,
                    significance: score.significance.id(),
                    confidence: score.confidence.id(),
                    version: expected_version + 1,
                });
            }
            Entry::Vacant(vacant) => {
                // The reader saw no row; if a version was read, the row
                // it belonged to is gone and the guard must fail.
                if expected_version != 0 {
                    return Err(ScoreWriteError::Conflict);
                }
                vacant.insert(StoredRow {
                    data_source_id,
                    significance: score.significance.id(),
                    confidence: score.confidence.id(),
                    version: 1,
                });
            }
        }

        Ok(())
    }

    async fn count_by_score(
        &self,
        data_source_id: DataSourceId,
        score: Score,
    ) -> Result<u64, ScoreStoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| {
                row.data_source_id == data_source_id
                    && row.significance == score.significance.id()
                    && row.confidence == score.confidence.id()
            })
            .count() as u64)
    }

    async fn objects_by_score(
        &self,
        data_source_id: DataSourceId,
        score: Score,
    ) -> Result<Vec<ObjectId>, ScoreStoreError> {
        let rows = self.rows.read().await;
        let mut object_ids = rows
            .iter()
            .filter(|(_, row)| {
                row.data_source_id == data_source_id
                    && row.significance == score.significance.id()
                    && row.confidence == score.confidence.id()
            })
            .map(|(object_id, _)| *object_id)
            .collect::<Vec<_>>();
        object_ids.sort_unstable();
        Ok(object_ids)
    }

    fn case_lock(&self) -> &CaseLock {
        &self.lock
    }
}

#[async_trait]
impl ContentResolver for MemoryScoreStore {
    type Content = MemoryContent;

    async fn content_by_id(
        &self,
        object_id: ObjectId,
    ) -> Result<Option<Self::Content>, ScoreStoreError> {
        let contents = self.contents.read().await;
        Ok(contents.get(&object_id).cloned())
    }
}
