mod builder;
pub mod errors;
mod transaction;

use serde::{Deserialize, Serialize};

use crate::models::errors::TransactionError;

pub use builder::TransactionBuilder;
pub use transaction::{EntityKind, EntityRef, TransactionRecord};

/// Direction of a settlement against a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    /// Credit the balance.
    Add,
    /// Debit the balance.
    Take,
}

impl TransactionAction {
    /// External storage code for this action.
    pub fn code(self) -> u8 {
        match self {
            TransactionAction::Add => 0,
            TransactionAction::Take => 1,
        }
    }

    /// Maps an external storage code, rejecting anything outside the table.
    pub fn from_code(code: u8) -> Result<Self, TransactionError> {
        match code {
            0 => Ok(TransactionAction::Add),
            1 => Ok(TransactionAction::Take),
            other => Err(TransactionError::invalid_configuration(format!("unknown action code [{other}]"))),
        }
    }
}

/// Business meaning of a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Payment,
    Withdrawal,
    /// Service fee expressed as a percentage; the percentage itself is
    /// stored in the record's amount column.
    ServicePercent,
    /// Concrete fee amount computed from a service-percent record.
    PercentAmount,
}

impl TransactionType {
    /// External storage code for this type. Code 2 is unassigned in the
    /// storage table and stays reserved.
    pub fn code(self) -> u8 {
        match self {
            TransactionType::Payment => 0,
            TransactionType::Withdrawal => 1,
            TransactionType::ServicePercent => 3,
            TransactionType::PercentAmount => 4,
        }
    }

    /// Maps an external storage code, rejecting anything outside the table.
    pub fn from_code(code: u8) -> Result<Self, TransactionError> {
        match code {
            0 => Ok(TransactionType::Payment),
            1 => Ok(TransactionType::Withdrawal),
            3 => Ok(TransactionType::ServicePercent),
            4 => Ok(TransactionType::PercentAmount),
            other => Err(TransactionError::invalid_configuration(format!("unknown type code [{other}]"))),
        }
    }
}

/// Lifecycle state of a transaction record.
///
/// Variant order mirrors the lifecycle, so ordering comparisons are
/// meaningful: `Draft < Waiting < Processing < Finished < Failed`.
/// Only the settlement engine advances a record past `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Draft,
    Waiting,
    /// Claimed by a settlement attempt; the balance write may be in flight.
    Processing,
    Finished,
    Failed,
}

impl TransactionStatus {
    /// External storage code for this status.
    pub fn code(self) -> u8 {
        match self {
            TransactionStatus::Draft => 0,
            TransactionStatus::Waiting => 1,
            TransactionStatus::Processing => 2,
            TransactionStatus::Finished => 4,
            TransactionStatus::Failed => 5,
        }
    }

    /// Maps an external storage code, rejecting anything outside the table.
    pub fn from_code(code: u8) -> Result<Self, TransactionError> {
        match code {
            0 => Ok(TransactionStatus::Draft),
            1 => Ok(TransactionStatus::Waiting),
            2 => Ok(TransactionStatus::Processing),
            4 => Ok(TransactionStatus::Finished),
            5 => Ok(TransactionStatus::Failed),
            other => Err(TransactionError::invalid_configuration(format!("unknown status code [{other}]"))),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Finished | TransactionStatus::Failed)
    }
}
