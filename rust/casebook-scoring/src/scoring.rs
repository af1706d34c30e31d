use tracing::{debug, warn};

use crate::{
    AggregateScoreStore, CaseTransaction, ContentResolver, DataSourceId, ObjectId, Score,
    ScoreChange, ScoreStoreError, ScoreWriteError, ScoringError,
};

/// How many full read-compare-write cycles [`ScoringManager::update_aggregate_score`]
/// attempts before giving up with [`ScoringError::RetryExhausted`].
pub const MAX_UPDATE_ATTEMPTS: usize = 10;

/// The scoring manager is responsible for updating and querying the
/// aggregate score of case objects.
///
/// Many analysis modules may submit result scores for the same object
/// concurrently. Updates use version-based optimistic locking: each
/// attempt reads the stored score and its version, decides whether the
/// submitted score supersedes it, and commits through a write guarded by
/// the version it read. A concurrent writer invalidates the guard and
/// the whole cycle retries, up to [`MAX_UPDATE_ATTEMPTS`] times.
///
/// The manager performs no scheduling of its own; every operation runs
/// synchronously on the calling task, inside the caller's transaction
/// where one is required.
#[derive(Clone, Debug)]
pub struct ScoringManager<Store> {
    store: Store,
}

impl<Store> ScoringManager<Store>
where
    Store: AggregateScoreStore,
{
    /// Construct a scoring manager over the given case store.
    pub fn new(store: Store) -> Self {
        ScoringManager { store }
    }

    /// The case store this manager operates on.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the aggregate score for the given object, or
    /// [`Score::UNKNOWN`] if no score has been recorded for it.
    pub async fn get_aggregate_score(&self, object_id: ObjectId) -> Result<Score, ScoringError> {
        let (score, _) = self
            .aggregate_score_and_version(object_id, &self.store)
            .await?;
        Ok(score)
    }

    /// Get the aggregate score for the given object along with the
    /// version counter needed to guard a subsequent write. An absent row
    /// reads as ([`Score::UNKNOWN`], 0).
    async fn aggregate_score_and_version(
        &self,
        object_id: ObjectId,
        connection: &Store,
    ) -> Result<(Score, u64), ScoringError> {
        let _read = connection.case_lock().read().await;

        match connection.resolve(object_id).await? {
            Some(row) => Ok((row.score, row.version)),
            None => Ok((Score::UNKNOWN, 0)),
        }
    }

    /// Update the aggregate score for the given object, if `result_score`
    /// supersedes the score the object already has, and return the
    /// resulting aggregate score either way.
    ///
    /// On an actual change a [`ScoreChange`] is registered against
    /// `transaction` for post-commit notification. When the stored score
    /// already dominates `result_score` the stored score is returned
    /// unchanged and nothing is written.
    ///
    /// Conflicting concurrent writers cause the full read-compare-write
    /// cycle to retry; after [`MAX_UPDATE_ATTEMPTS`] conflicts the update
    /// fails with [`ScoringError::RetryExhausted`] and the stored row is
    /// left as the last writer committed it. Infrastructural store errors
    /// are never retried.
    pub async fn update_aggregate_score(
        &self,
        object_id: ObjectId,
        data_source_id: DataSourceId,
        result_score: Score,
        transaction: &CaseTransaction<'_, Store>,
    ) -> Result<Score, ScoringError> {
        let connection = transaction.connection();

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let (current_score, current_version) = self
                .aggregate_score_and_version(object_id, connection)
                .await?;

            if !result_score.supersedes(&current_score) {
                return Ok(current_score);
            }

            // The gate covers the single guarded write, not the loop, so
            // retrying writers cannot starve readers.
            let outcome = {
                let _write = connection.case_lock().write().await;
                connection
                    .apply(object_id, data_source_id, result_score, current_version)
                    .await
            };

            match outcome {
                Ok(()) => {
                    transaction.register_score_change(ScoreChange::new(
                        object_id,
                        data_source_id,
                        current_score,
                        result_score,
                    ));
                    debug!(
                        object_id,
                        data_source_id,
                        score = %result_score,
                        "Committed aggregate score"
                    );
                    return Ok(result_score);
                }
                Err(ScoreWriteError::Conflict) => {
                    warn!(
                        object_id,
                        data_source_id,
                        attempt,
                        "Concurrent aggregate score update, retrying"
                    );
                }
                Err(ScoreWriteError::Store(error)) => return Err(error.into()),
            }
        }

        Err(ScoringError::RetryExhausted {
            object_id,
            data_source_id,
            attempts: MAX_UPDATE_ATTEMPTS,
        })
    }

    /// Get the count of objects within the specified data source whose
    /// aggregate score exactly equals `score`.
    pub async fn get_content_count(
        &self,
        data_source_id: DataSourceId,
        score: Score,
    ) -> Result<u64, ScoringError> {
        let _read = self.store.case_lock().read().await;

        Ok(self.store.count_by_score(data_source_id, score).await?)
    }

    /// Get the objects within the specified data source whose aggregate
    /// score exactly equals `score`, materialized through the store's
    /// content lookup.
    pub async fn get_content(
        &self,
        data_source_id: DataSourceId,
        score: Score,
    ) -> Result<Vec<Store::Content>, ScoringError>
    where
        Store: ContentResolver,
    {
        let _read = self.store.case_lock().read().await;

        let object_ids = self.store.objects_by_score(data_source_id, score).await?;
        let mut contents = Vec::with_capacity(object_ids.len());

        for object_id in object_ids {
            match self.store.content_by_id(object_id).await? {
                Some(content) => contents.push(content),
                None => {
                    return Err(ScoreStoreError::MissingContent { object_id }.into());
                }
            }
        }

        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Confidence, MemoryScoreStore, Significance};
    use anyhow::Result;

    #[tokio::test]
    async fn it_reads_unknown_for_an_unscored_object() -> Result<()> {
        let manager = ScoringManager::new(MemoryScoreStore::new());

        assert_eq!(manager.get_aggregate_score(42).await?, Score::UNKNOWN);

        Ok(())
    }

    #[tokio::test]
    async fn it_records_a_first_score_and_keeps_the_more_severe_one() -> Result<()> {
        let store = MemoryScoreStore::new();
        let manager = ScoringManager::new(store.clone());
        let transaction = CaseTransaction::new(manager.store());

        let high = Score::new(Significance::High, Confidence::Medium);
        let result = manager
            .update_aggregate_score(42, 1, high, &transaction)
            .await?;
        assert_eq!(result, high);

        // A lesser score leaves the aggregate untouched and emits no
        // change.
        let lesser = Score::new(Significance::Medium, Confidence::High);
        let result = manager
            .update_aggregate_score(42, 1, lesser, &transaction)
            .await?;
        assert_eq!(result, high);

        let row = store.resolve(42).await?.expect("row should exist");
        assert_eq!(row.version, 1);
        assert_eq!(row.score, high);

        assert_eq!(
            transaction.commit(),
            vec![ScoreChange::new(42, 1, Score::UNKNOWN, high)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn it_is_idempotent_for_repeated_submissions() -> Result<()> {
        let store = MemoryScoreStore::new();
        let manager = ScoringManager::new(store.clone());
        let transaction = CaseTransaction::new(manager.store());

        let score = Score::new(Significance::Low, Confidence::Medium);
        manager
            .update_aggregate_score(7, 1, score, &transaction)
            .await?;
        manager
            .update_aggregate_score(7, 1, score, &transaction)
            .await?;

        let row = store.resolve(7).await?.expect("row should exist");
        assert_eq!(row.version, 1);
        assert_eq!(transaction.commit().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn it_applies_the_unknown_exception_then_monotone_maximum() -> Result<()> {
        let store = MemoryScoreStore::new();
        let manager = ScoringManager::new(store.clone());
        let transaction = CaseTransaction::new(manager.store());

        // Establishing a "good" determination supersedes UNKNOWN.
        let good = Score::new(Significance::None, Confidence::None);
        assert_eq!(
            manager
                .update_aggregate_score(9, 2, good, &transaction)
                .await?,
            good
        );

        let low = Score::new(Significance::Low, Confidence::Low);
        assert_eq!(
            manager
                .update_aggregate_score(9, 2, low, &transaction)
                .await?,
            low
        );

        // A confident "good" never overrides a recorded suspicion.
        let confident_good = Score::new(Significance::None, Confidence::Highest);
        assert_eq!(
            manager
                .update_aggregate_score(9, 2, confident_good, &transaction)
                .await?,
            low
        );

        let row = store.resolve(9).await?.expect("row should exist");
        assert_eq!(row.score, low);
        assert_eq!(row.version, 2);
        assert_eq!(transaction.commit().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn it_counts_and_lists_content_by_exact_score() -> Result<()> {
        let store = MemoryScoreStore::new();
        let manager = ScoringManager::new(store.clone());
        let transaction = CaseTransaction::new(manager.store());

        let low = Score::new(Significance::Low, Confidence::Medium);
        let high = Score::new(Significance::High, Confidence::Medium);

        for (object_id, score) in [(1, low), (2, low), (3, high)] {
            store.add_content(object_id, format!("object-{object_id}")).await;
            manager
                .update_aggregate_score(object_id, 10, score, &transaction)
                .await?;
        }

        assert_eq!(manager.get_content_count(10, low).await?, 2);
        assert_eq!(manager.get_content_count(10, high).await?, 1);
        assert_eq!(manager.get_content_count(11, low).await?, 0);

        let contents = manager.get_content(10, low).await?;
        assert_eq!(
            contents.iter().map(|c| c.object_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(contents[0].name, "object-1");

        Ok(())
    }

    #[tokio::test]
    async fn it_fails_content_lookup_for_an_unresolvable_object() -> Result<()> {
        let store = MemoryScoreStore::new();
        let manager = ScoringManager::new(store.clone());
        let transaction = CaseTransaction::new(manager.store());

        let score = Score::new(Significance::Medium, Confidence::Low);
        manager
            .update_aggregate_score(5, 3, score, &transaction)
            .await?;

        let error = manager.get_content(3, score).await.unwrap_err();
        assert_eq!(
            error,
            ScoringError::Store(ScoreStoreError::MissingContent { object_id: 5 })
        );

        Ok(())
    }
}
