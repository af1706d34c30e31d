use serde::{Deserialize, Serialize};

use crate::{DataSourceId, ObjectId, Score};

/// A record of one committed aggregate score transition.
///
/// Produced by a successful update and registered against the surrounding
/// transaction so that interested parties can be notified after commit.
/// The engine never persists these itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    /// The object whose aggregate score changed
    pub object_id: ObjectId,
    /// The data source owning the object
    pub data_source_id: DataSourceId,
    /// The aggregate score before the update
    pub old_score: Score,
    /// The aggregate score after the update
    pub new_score: Score,
}

impl ScoreChange {
    /// Record a transition of `object_id` from `old_score` to `new_score`.
    pub fn new(
        object_id: ObjectId,
        data_source_id: DataSourceId,
        old_score: Score,
        new_score: Score,
    ) -> Self {
        ScoreChange {
            object_id,
            data_source_id,
            old_score,
            new_score,
        }
    }
}
