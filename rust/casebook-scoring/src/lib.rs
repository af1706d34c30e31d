#![warn(missing_docs)]

//! This package maintains a continuously-updated aggregate [`Score`] for
//! every object in a forensic case store, summarizing the most severe
//! analysis result recorded against it. Many independent analysis
//! modules may submit result scores concurrently; the aggregate always
//! reflects the highest-severity finding seen so far, without losing
//! updates under concurrent writers.
//!
//! The [`ScoringManager`] performs read-compare-write cycles against an
//! [`AggregateScoreStore`] under version-based optimistic locking:
//!
//! ```ignore
//! use casebook_scoring::{
//!     CaseTransaction, Confidence, MemoryScoreStore, Score, ScoringManager, Significance,
//! };
//!
//! // Substitute with your case store of choice:
//! let store = MemoryScoreStore::new();
//! let manager = ScoringManager::new(store);
//!
//! let transaction = CaseTransaction::new(manager.store());
//! let result_score = Score::new(Significance::High, Confidence::Medium);
//!
//! let aggregate = manager
//!     .update_aggregate_score(object_id, data_source_id, result_score, &transaction)
//!     .await?;
//!
//! // Notify interested parties once the transaction commits:
//! for change in transaction.commit() {
//!     println!("{} -> {}", change.old_score, change.new_score);
//! }
//! ```

mod change;
pub use change::*;

mod error;
pub use error::*;

mod score;
pub use score::*;

mod scoring;
pub use scoring::*;

mod store;
pub use store::*;
