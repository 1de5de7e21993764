use std::sync::Arc;

use tracing::debug;

use crate::models::errors::TransactionError;
use crate::models::{
    EntityKind, EntityRef, TransactionAction, TransactionBuilder, TransactionRecord,
    TransactionStatus, TransactionType,
};
use crate::storage::TransactionRepository;
use crate::types::{percent_of, Monetary, Percent, TransactionId};

/// Synthesizes derived fee transactions from a settled or settling parent.
///
/// Generated records come back in `Waiting`, related to their parent
/// transaction; persisting them and feeding them through the settlement
/// engine are separate, explicit steps for the caller.
pub struct FeeGenerator<R> {
    repository: Arc<R>,
    inherit_parties: bool,
}

impl<R: TransactionRepository> FeeGenerator<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            inherit_parties: false,
        }
    }

    /// Copies `user_id`/`beneficiary_id` from the parent onto
    /// service-percent fees. Off by default; the percent-amount path
    /// always copies the parties.
    pub fn with_inherited_parties(mut self) -> Self {
        self.inherit_parties = true;
        self
    }

    /// Builds the service-percentage fee record for a parent transaction.
    ///
    /// The fee is a debit of `fee_amount` in the parent's currency,
    /// related to the parent record.
    ///
    /// # Errors
    /// [`TransactionError::InvalidArgument`] when the parent was never
    /// persisted or `fee_amount` is negative.
    pub fn make_percent_fee(
        &self,
        parent: &TransactionRecord,
        fee_amount: Monetary,
    ) -> Result<TransactionRecord, TransactionError> {
        let parent_id = persisted_id(parent)?;

        let mut builder = TransactionBuilder::new(EntityRef::transaction(parent_id), fee_amount)
            .action(TransactionAction::Take)
            .kind(TransactionType::ServicePercent)
            .status(TransactionStatus::Waiting);

        if let Some(currency_id) = parent.currency_id {
            builder = builder.currency(currency_id);
        }

        if self.inherit_parties {
            builder = copy_parties(builder, parent);
        }

        let record = builder.build()?;
        debug!("Generated service-percent fee of [{fee_amount}] for transaction [{parent_id}]");

        Ok(record)
    }

    /// Builds the percentage-of-amount fee from a service-percent parent.
    ///
    /// The parent's `amount` field holds the percentage (two fixed
    /// decimals); it is applied to the amount of the payment transaction
    /// the parent is attached to, which is resolved through the
    /// repository. User and beneficiary carry over from the parent.
    ///
    /// # Errors
    /// - [`TransactionError::InvalidTransactionType`] when the parent is
    ///   not a service-percent record; nothing is resolved or built.
    /// - [`TransactionError::NotFound`] when the attached transaction does
    ///   not exist.
    pub fn make_percent_amount_fee(
        &self,
        parent: &TransactionRecord,
    ) -> Result<TransactionRecord, TransactionError> {
        if parent.kind != TransactionType::ServicePercent {
            return Err(TransactionError::invalid_type(TransactionType::ServicePercent, parent.kind));
        }

        let parent_id = persisted_id(parent)?;

        if parent.related.kind != EntityKind::Transaction {
            return Err(TransactionError::invalid_configuration(format!(
                "transaction [{parent_id}] is not attached to a transaction entity"
            )));
        }

        let payment = self.repository.find_by_id(parent.related.id)?;
        let amount = percent_of(payment.amount, Percent::from(parent.amount))?;

        let mut builder = TransactionBuilder::new(EntityRef::transaction(parent_id), amount)
            .action(TransactionAction::Take)
            .kind(TransactionType::PercentAmount)
            .status(TransactionStatus::Waiting);

        if let Some(currency_id) = parent.currency_id {
            builder = builder.currency(currency_id);
        }

        builder = copy_parties(builder, parent);

        let record = builder.build()?;
        debug!("Generated percent-amount fee of [{amount}] from transaction [{parent_id}]");

        Ok(record)
    }
}

fn persisted_id(parent: &TransactionRecord) -> Result<TransactionId, TransactionError> {
    parent
        .id
        .ok_or_else(|| TransactionError::invalid_argument("parent transaction has not been persisted"))
}

fn copy_parties(mut builder: TransactionBuilder, parent: &TransactionRecord) -> TransactionBuilder {
    if let Some(user_id) = parent.user_id {
        builder = builder.user(user_id);
    }

    if let Some(beneficiary_id) = parent.beneficiary_id {
        builder = builder.beneficiary(beneficiary_id);
    }

    builder
}
