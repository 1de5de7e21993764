use dashmap::DashMap;

use crate::storage::{BalanceError, BalanceStore};
use crate::types::{CurrencyId, Monetary, UserId};

/// In-memory balance store backed by a concurrent map.
///
/// The entry guard serializes the read-check-write of a single balance, so
/// each credit/debit is atomic per account the way a real store would be.
pub struct InMemoryBalanceStore {
    balances: DashMap<(UserId, CurrencyId), Monetary>,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }

    /// Current balance for a user in a currency; zero when never touched.
    pub fn balance_of(&self, user_id: UserId, currency_id: CurrencyId) -> Monetary {
        self.balances
            .get(&(user_id, currency_id))
            .map(|entry| *entry)
            .unwrap_or(Monetary::ZERO)
    }
}

impl Default for InMemoryBalanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn credit(&self, user_id: UserId, currency_id: CurrencyId, amount: Monetary) -> Result<(), BalanceError> {
        let mut entry = self.balances.entry((user_id, currency_id)).or_insert(Monetary::ZERO);

        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| BalanceError::Backend(format!("balance overflow for user [{user_id}]")))?;

        Ok(())
    }

    fn debit(&self, user_id: UserId, currency_id: CurrencyId, amount: Monetary) -> Result<(), BalanceError> {
        let mut entry = self.balances.entry((user_id, currency_id)).or_insert(Monetary::ZERO);

        if *entry < amount {
            return Err(BalanceError::InsufficientFunds {
                user_id,
                requested: amount,
                available: *entry,
            });
        }

        *entry = entry
            .checked_sub(amount)
            .ok_or_else(|| BalanceError::Backend(format!("balance overflow for user [{user_id}]")))?;

        Ok(())
    }
}
