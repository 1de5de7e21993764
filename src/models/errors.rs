use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{TransactionStatus, TransactionType};
use crate::types::{Monetary, MonetaryError, TransactionId, UserId};

/// Typed failure surface of the settlement engine and fee generator.
///
/// Every variant carries the identifiers a caller needs to act on the
/// failure; nothing is reported through strings alone.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransactionError {
    /// Settlement attempted outside `Waiting`. Losing a settlement race
    /// surfaces the same way, which is what makes settlement idempotent.
    #[error("Transaction [{transaction_id}] is [{actual:?}], settlement requires [{required:?}]")]
    InvalidState {
        transaction_id: TransactionId,
        required: TransactionStatus,
        actual: TransactionStatus,
    },

    /// Settlement attempted past the record's deadline.
    #[error("Transaction [{transaction_id}] expired at [{expired_time}]")]
    Expired {
        transaction_id: TransactionId,
        expired_time: DateTime<Utc>,
    },

    /// Debit exceeds the available balance; propagated from the balance
    /// store unchanged.
    #[error("Insufficient funds for user [{user_id}]: requested [{requested}], available [{available}]")]
    InsufficientFunds {
        user_id: UserId,
        requested: Monetary,
        available: Monetary,
    },

    /// Fee generation precondition violated: the parent record has the
    /// wrong type.
    #[error("Wrong transaction type [{actual:?}], need [{required:?}]")]
    InvalidTransactionType {
        required: TransactionType,
        actual: TransactionType,
    },

    /// Negative amount/percent or an otherwise unusable input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unrecognized action/type/status code or a record that cannot be
    /// routed to a balance operation.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The referenced transaction record does not exist.
    #[error("Transaction [{transaction_id}] was not found")]
    NotFound { transaction_id: TransactionId },

    /// Collaborator failure outside this crate's control.
    #[error("Store error: {0}")]
    Store(String),
}

impl TransactionError {
    pub fn invalid_state(transaction_id: TransactionId, actual: TransactionStatus) -> Self {
        Self::InvalidState {
            transaction_id,
            required: TransactionStatus::Waiting,
            actual,
        }
    }

    pub fn invalid_type(required: TransactionType, actual: TransactionType) -> Self {
        Self::InvalidTransactionType { required, actual }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

impl From<MonetaryError> for TransactionError {
    fn from(error: MonetaryError) -> Self {
        TransactionError::InvalidArgument(error.to_string())
    }
}
