use async_trait::async_trait;

use crate::{Score, ScoreStoreError, ScoreWriteError};

mod lock;
pub use lock::*;

mod memory;
pub use memory::*;

mod transaction;
pub use transaction::*;

/// The unique id of a scored object within the case store.
pub type ObjectId = i64;

/// The id of the data source an object belongs to.
pub type DataSourceId = i64;

/// One persisted aggregate score row, as surfaced by an
/// [`AggregateScoreStore`].
///
/// The version counter starts at 1 on the first committed write for an
/// object and increments by exactly one on every subsequent committed
/// write; an absent row reads as ([`Score::UNKNOWN`], version 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreRow {
    /// The data source owning the scored object
    pub data_source_id: DataSourceId,
    /// The current aggregate score
    pub score: Score,
    /// The optimistic-lock counter guarding writes to this row
    pub version: u64,
}

/// The persistence contract the scoring engine depends on: one row per
/// scored object, keyed by object id, carrying a monotonic version
/// counter.
///
/// Implementations must make [`AggregateScoreStore::apply`] an atomic
/// conditional upsert: the write commits only while the stored version
/// still equals `expected_version`, and a version mismatch is reported
/// as [`ScoreWriteError::Conflict`] rather than a hard failure. Readers
/// must never observe a partially-written row.
#[async_trait]
pub trait AggregateScoreStore: Send + Sync {
    /// Look up the stored aggregate score row for `object_id`, if any.
    async fn resolve(&self, object_id: ObjectId) -> Result<Option<ScoreRow>, ScoreStoreError>;

    /// Insert or update the row for `object_id`, guarded by
    /// `expected_version`.
    ///
    /// Inserting a fresh row requires `expected_version == 0` and commits
    /// version 1; updating requires the stored version to equal
    /// `expected_version` and commits `expected_version + 1`. Any other
    /// state is a [`ScoreWriteError::Conflict`].
    async fn apply(
        &self,
        object_id: ObjectId,
        data_source_id: DataSourceId,
        score: Score,
        expected_version: u64,
    ) -> Result<(), ScoreWriteError>;

    /// Count the objects within `data_source_id` whose stored score
    /// exactly equals `score`.
    async fn count_by_score(
        &self,
        data_source_id: DataSourceId,
        score: Score,
    ) -> Result<u64, ScoreStoreError>;

    /// List the objects within `data_source_id` whose stored score
    /// exactly equals `score`.
    async fn objects_by_score(
        &self,
        data_source_id: DataSourceId,
        score: Score,
    ) -> Result<Vec<ObjectId>, ScoreStoreError>;

    /// The case-wide lock gate serializing score operations against
    /// unrelated structural changes to the case store.
    fn case_lock(&self) -> &CaseLock;
}

/// The external content lookup collaborator: materializes case objects
/// from their ids.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// The materialized object type produced by this resolver
    type Content: Send;

    /// Look up the content with the given object id, if any.
    async fn content_by_id(
        &self,
        object_id: ObjectId,
    ) -> Result<Option<Self::Content>, ScoreStoreError>;
}
