use thiserror::Error;

use crate::{DataSourceId, ObjectId};

/// An infrastructural failure in the underlying case store.
///
/// These are never retried by the scoring engine; retry is reserved for
/// optimistic-lock conflicts specifically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreStoreError {
    /// A read or write against the store failed
    #[error("Case store access failed: {0}")]
    Access(String),

    /// A scored object id resolved to no content
    #[error("No content found for object id {object_id}")]
    MissingContent {
        /// The id that failed to resolve
        object_id: ObjectId,
    },
}

/// The outcome of a version-guarded score write that did not commit.
///
/// [`ScoreWriteError::Conflict`] means the guarded write affected zero
/// rows because the version changed under us; it signals "retry", not
/// "error", and never escapes the scoring manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreWriteError {
    /// The stored version no longer matches the version that was read
    #[error("Aggregate score version changed concurrently")]
    Conflict,

    /// The write failed for infrastructural reasons
    #[error(transparent)]
    Store(#[from] ScoreStoreError),
}

/// The common error type produced by scoring operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// The underlying case store failed
    #[error(transparent)]
    Store(#[from] ScoreStoreError),

    /// The optimistic update loop gave up after repeated conflicts
    #[error(
        "Failed to update aggregate score for object {object_id} (data source {data_source_id}) after {attempts} attempts"
    )]
    RetryExhausted {
        /// The object whose update was abandoned
        object_id: ObjectId,
        /// The data source owning the object
        data_source_id: DataSourceId,
        /// How many full read-compare-write cycles were attempted
        attempts: usize,
    },
}
