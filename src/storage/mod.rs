mod balance_store;
mod repository;
#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::models::errors::TransactionError;
use crate::models::{TransactionRecord, TransactionStatus};
use crate::types::{CurrencyId, Monetary, TransactionId, UserId};

pub use balance_store::InMemoryBalanceStore;
pub use repository::InMemoryRepository;

/// Sole owner of balance state, keyed by user and currency.
///
/// The engine never touches balances directly; it only asks for credits and
/// debits. Each call is atomic with respect to the targeted balance, and the
/// debit side enforces sufficient funds.
pub trait BalanceStore: Send + Sync + 'static {
    fn credit(&self, user_id: UserId, currency_id: CurrencyId, amount: Monetary) -> Result<(), BalanceError>;

    fn debit(&self, user_id: UserId, currency_id: CurrencyId, amount: Monetary) -> Result<(), BalanceError>;
}

/// Durable home of transaction records.
pub trait TransactionRepository: Send + Sync + 'static {
    /// Persists the record, assigning an id and creation timestamp on first
    /// save.
    fn save(&self, record: TransactionRecord) -> Result<TransactionId, RepositoryError>;

    fn find_by_id(&self, transaction_id: TransactionId) -> Result<TransactionRecord, RepositoryError>;

    /// Conditionally advances a record's status. The comparison and the
    /// write are one atomic unit (`WHERE status = from`), so of any number
    /// of concurrent callers exactly one wins; the rest observe
    /// [`RepositoryError::StatusConflict`].
    fn transition(
        &self,
        transaction_id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<TransactionRecord, RepositoryError>;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BalanceError {
    #[error("Insufficient funds for user [{user_id}]: requested [{requested}], available [{available}]")]
    InsufficientFunds {
        user_id: UserId,
        requested: Monetary,
        available: Monetary,
    },
    #[error("Balance store error: {0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Transaction [{transaction_id}] was not found")]
    NotFound { transaction_id: TransactionId },
    #[error("Transaction [{transaction_id}] is [{actual:?}], expected [{expected:?}]")]
    StatusConflict {
        transaction_id: TransactionId,
        expected: TransactionStatus,
        actual: TransactionStatus,
    },
    #[error("Repository error: {0}")]
    Backend(String),
}

impl From<BalanceError> for TransactionError {
    fn from(error: BalanceError) -> Self {
        match error {
            BalanceError::InsufficientFunds { user_id, requested, available } => {
                TransactionError::InsufficientFunds { user_id, requested, available }
            }
            BalanceError::Backend(message) => TransactionError::Store(message),
        }
    }
}

impl From<RepositoryError> for TransactionError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { transaction_id } => TransactionError::NotFound { transaction_id },
            RepositoryError::StatusConflict { transaction_id, expected, actual } => TransactionError::InvalidState {
                transaction_id,
                required: expected,
                actual,
            },
            RepositoryError::Backend(message) => TransactionError::Store(message),
        }
    }
}
