use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::errors::TransactionError;
use crate::models::{TransactionAction, TransactionStatus, TransactionType};
use crate::types::{BalanceId, CurrencyId, EntityId, Monetary, OrderId, TransactionId, UserId};

/// Kind tag of the business entity a transaction originates from.
///
/// A closed tag set replaces the persistence framework's class-name string;
/// unknown tags are rejected at the storage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Payment,
    WithdrawalOrder,
    Transaction,
}

impl EntityKind {
    /// Storage tag for this entity kind.
    pub fn tag(self) -> &'static str {
        match self {
            EntityKind::Payment => "payment",
            EntityKind::WithdrawalOrder => "withdrawal_order",
            EntityKind::Transaction => "transaction",
        }
    }

    /// Maps a storage tag, rejecting anything outside the table.
    pub fn from_tag(tag: &str) -> Result<Self, TransactionError> {
        match tag {
            "payment" => Ok(EntityKind::Payment),
            "withdrawal_order" => Ok(EntityKind::WithdrawalOrder),
            "transaction" => Ok(EntityKind::Transaction),
            other => Err(TransactionError::invalid_configuration(format!("unknown entity tag [{other}]"))),
        }
    }
}

/// Polymorphic reference to the originating business entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Reference to another transaction record; fee records point at their
    /// parent this way.
    pub fn transaction(id: TransactionId) -> Self {
        Self { kind: EntityKind::Transaction, id }
    }
}

/// A single ledger entry representing an intended or completed balance movement.
///
/// Records are created in `Draft` by the builder, queued as `Waiting`, and
/// moved to a terminal status exactly once by the settlement engine.
/// `related`, `amount`, `action` and `kind` are immutable once the record
/// leaves `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Assigned by the repository on first save.
    pub id: Option<TransactionId>,
    /// The originating business entity.
    pub related: EntityRef,
    /// The account the movement is charged against or credited to.
    pub user_id: Option<UserId>,
    /// Secondary account for fee records where payer and recipient differ.
    pub beneficiary_id: Option<UserId>,
    /// The specific balance record to mutate, when pinned by the caller.
    pub balance_id: Option<BalanceId>,
    /// External order correlation.
    pub order_id: Option<OrderId>,
    /// Non-negative quantity in minor units; direction lives in `action`.
    pub amount: Monetary,
    pub currency_id: Option<CurrencyId>,
    pub action: TransactionAction,
    pub kind: TransactionType,
    pub status: TransactionStatus,
    /// Line-item breakdown, opaque to settlement.
    pub items: Option<serde_json::Value>,
    /// Deadline after which the record must not be settled.
    pub expired_time: Option<DateTime<Utc>>,
    pub service_name: Option<String>,
    /// Repository-managed.
    pub created_at: Option<DateTime<Utc>>,
    /// Repository-managed.
    pub updated_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    /// Whether the record's settlement deadline has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expired_time.is_some_and(|deadline| deadline <= now)
    }
}
