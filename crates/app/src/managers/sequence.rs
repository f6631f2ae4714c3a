//! Document numbering.

use sgbooks_db::{DbConn, SequenceRepository, db_error, entities::sequences};
use sgbooks_shared::AppResult;

use super::{begin, commit};

/// Hands out formatted document numbers such as `INV-000042`.
///
/// Managers that create documents draw their numbers inside their own
/// transaction; this type is for callers that need a number on its own.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    db: DbConn,
    sequences: SequenceRepository,
}

impl SequenceGenerator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new(db: DbConn) -> Self {
        Self {
            db,
            sequences: SequenceRepository::new(),
        }
    }

    /// Advances `sequence_name` and returns the formatted number.
    pub async fn next_number(&self, sequence_name: &str) -> AppResult<String> {
        let txn = begin(self.db.as_ref()).await?;
        let number = self.sequences.next_number(&txn, sequence_name).await?;
        commit(txn).await?;

        tracing::debug!(sequence = sequence_name, %number, "Sequence advanced");
        Ok(number)
    }

    /// Lists every sequence with its current counter.
    pub async fn list_sequences(&self) -> AppResult<Vec<sequences::Model>> {
        self.sequences.list(self.db.as_ref()).await.map_err(db_error)
    }
}
