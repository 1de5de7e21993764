use chrono::{DateTime, Duration, Utc};

use crate::models::errors::TransactionError;
use crate::models::{EntityRef, TransactionAction, TransactionRecord, TransactionStatus, TransactionType};
use crate::types::{BalanceId, Clock, CurrencyId, Monetary, OrderId, UserId};

/// Value builder for [`TransactionRecord`]s.
///
/// Every mutator consumes and returns the builder, so construction reads as
/// a fluent chain while staying a pure value transformation: no I/O happens
/// here, and persistence of the built record is the caller's job.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    record: TransactionRecord,
}

impl TransactionBuilder {
    /// Starts a draft record for the given originating entity and amount.
    ///
    /// Defaults: `status = Draft`, `action = Add`, `kind = Payment`.
    pub fn new(source: EntityRef, amount: Monetary) -> Self {
        Self {
            record: TransactionRecord {
                id: None,
                related: source,
                user_id: None,
                beneficiary_id: None,
                balance_id: None,
                order_id: None,
                amount,
                currency_id: None,
                action: TransactionAction::Add,
                kind: TransactionType::Payment,
                status: TransactionStatus::Draft,
                items: None,
                expired_time: None,
                service_name: None,
                created_at: None,
                updated_at: None,
            },
        }
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.record.user_id = Some(user_id);
        self
    }

    pub fn beneficiary(mut self, beneficiary_id: UserId) -> Self {
        self.record.beneficiary_id = Some(beneficiary_id);
        self
    }

    pub fn balance(mut self, balance_id: BalanceId) -> Self {
        self.record.balance_id = Some(balance_id);
        self
    }

    pub fn order(mut self, order_id: OrderId) -> Self {
        self.record.order_id = Some(order_id);
        self
    }

    pub fn currency(mut self, currency_id: CurrencyId) -> Self {
        self.record.currency_id = Some(currency_id);
        self
    }

    pub fn action(mut self, action: TransactionAction) -> Self {
        self.record.action = action;
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.record.kind = kind;
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn items(mut self, items: serde_json::Value) -> Self {
        self.record.items = Some(items);
        self
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.record.service_name = Some(name.into());
        self
    }

    /// Sets an absolute settlement deadline.
    pub fn expires_at(mut self, deadline: DateTime<Utc>) -> Self {
        self.record.expired_time = Some(deadline);
        self
    }

    /// Sets the settlement deadline `days` from now, read off the injected
    /// clock.
    pub fn expires_in_days(self, days: i64, clock: &impl Clock) -> Self {
        self.expires_at(clock.now() + Duration::days(days))
    }

    /// Finalizes the record.
    ///
    /// # Errors
    /// [`TransactionError::InvalidArgument`] when the amount is negative;
    /// direction belongs to the action, not the sign.
    pub fn build(self) -> Result<TransactionRecord, TransactionError> {
        if self.record.amount.is_negative() {
            return Err(TransactionError::invalid_argument("transaction amount must be non-negative"));
        }

        Ok(self.record)
    }
}
