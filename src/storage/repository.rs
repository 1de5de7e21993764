use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use crate::models::{TransactionRecord, TransactionStatus};
use crate::storage::{RepositoryError, TransactionRepository};
use crate::types::TransactionId;

/// In-memory transaction repository backed by a concurrent map.
///
/// `transition` performs the conditional status update under the entry
/// lock, standing in for the `UPDATE ... WHERE status = ?` a relational
/// store would issue.
pub struct InMemoryRepository {
    records: DashMap<TransactionId, TransactionRecord>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionRepository for InMemoryRepository {
    fn save(&self, mut record: TransactionRecord) -> Result<TransactionId, RepositoryError> {
        let now = Utc::now();

        let transaction_id = match record.id {
            Some(existing) => {
                if !self.records.contains_key(&existing) {
                    return Err(RepositoryError::NotFound { transaction_id: existing });
                }
                existing
            }
            None => {
                let assigned = self.next_id.fetch_add(1, Ordering::Relaxed);
                record.id = Some(assigned);
                record.created_at = Some(now);
                assigned
            }
        };

        record.updated_at = Some(now);
        self.records.insert(transaction_id, record);

        Ok(transaction_id)
    }

    fn find_by_id(&self, transaction_id: TransactionId) -> Result<TransactionRecord, RepositoryError> {
        self.records
            .get(&transaction_id)
            .map(|entry| entry.clone())
            .ok_or(RepositoryError::NotFound { transaction_id })
    }

    fn transition(
        &self,
        transaction_id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<TransactionRecord, RepositoryError> {
        let mut entry = self
            .records
            .get_mut(&transaction_id)
            .ok_or(RepositoryError::NotFound { transaction_id })?;

        if entry.status != from {
            return Err(RepositoryError::StatusConflict {
                transaction_id,
                expected: from,
                actual: entry.status,
            });
        }

        entry.status = to;
        entry.updated_at = Some(Utc::now());

        Ok(entry.clone())
    }
}
