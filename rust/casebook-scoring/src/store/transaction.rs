use std::sync::Mutex;

use crate::ScoreChange;

/// A caller-supplied transaction handle: the store connection score
/// operations run against, plus the [`ScoreChange`]s recorded during the
/// transaction for post-commit notification.
///
/// The engine never opens transactions of its own; several score updates
/// may run within one transaction, and the recorded changes are handed
/// back to the caller on [`CaseTransaction::commit`].
#[derive(Debug)]
pub struct CaseTransaction<'store, Store> {
    connection: &'store Store,
    changes: Mutex<Vec<ScoreChange>>,
}

impl<'store, Store> CaseTransaction<'store, Store> {
    /// Begin a transaction over the given store connection.
    pub fn new(connection: &'store Store) -> Self {
        CaseTransaction {
            connection,
            changes: Mutex::new(Vec::new()),
        }
    }

    /// The store connection this transaction runs against.
    pub fn connection(&self) -> &'store Store {
        self.connection
    }

    /// Record a committed score transition for notification after the
    /// transaction commits.
    pub fn register_score_change(&self, change: ScoreChange) {
        self.changes.lock().unwrap().push(change);
    }

    /// Commit the transaction, yielding the score changes recorded
    /// during it in registration order.
    pub fn commit(self) -> Vec<ScoreChange> {
        self.changes.into_inner().unwrap()
    }
}
