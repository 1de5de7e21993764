use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::models::errors::TransactionError;
use crate::models::{TransactionAction, TransactionRecord, TransactionStatus};
use crate::storage::{BalanceStore, TransactionRepository};
use crate::types::{Clock, SystemClock, TransactionId};

/// Drives the one-shot `Waiting -> {Finished | Failed}` transition.
///
/// A settlement attempt first claims the record through the repository's
/// conditional status update (`Waiting -> Processing`). The claim is what
/// makes settlement idempotent: of any number of concurrent callers,
/// exactly one advances the record and applies the balance movement; the
/// rest observe [`TransactionError::InvalidState`].
pub struct SettlementEngine<B, R, C = SystemClock> {
    balances: Arc<B>,
    repository: Arc<R>,
    clock: C,
}

impl<B: BalanceStore, R: TransactionRepository> SettlementEngine<B, R> {
    pub fn new(balances: Arc<B>, repository: Arc<R>) -> Self {
        Self {
            balances,
            repository,
            clock: SystemClock,
        }
    }
}

impl<B: BalanceStore, R: TransactionRepository, C: Clock> SettlementEngine<B, R, C> {
    pub fn with_clock(balances: Arc<B>, repository: Arc<R>, clock: C) -> Self {
        Self { balances, repository, clock }
    }

    /// Settles one transaction against the balance store.
    ///
    /// `Add` routes to a credit, `Take` to a debit, always with the
    /// record's exact amount and currency. The balance is written before
    /// the terminal status: a crash in between is repaired by completing
    /// the status transition (see [`SettlementEngine::recover`]), never by
    /// re-applying the balance movement.
    ///
    /// # Errors
    /// - [`TransactionError::InvalidState`] outside `Waiting`, including a
    ///   repeated call on an already settled record.
    /// - [`TransactionError::Expired`] past the record's deadline; no
    ///   balance call is made and the record is marked `Failed`.
    /// - [`TransactionError::InvalidConfiguration`] when the record has no
    ///   user or currency to route against.
    /// - [`TransactionError::InsufficientFunds`] from the store, verbatim.
    ///
    /// Any failure after the claim leaves the record in `Failed`; the
    /// balance is never mutated without a matching terminal status.
    pub fn settle(&self, transaction_id: TransactionId) -> Result<TransactionRecord, TransactionError> {
        let claimed = self.claim(transaction_id)?;

        if let Some(deadline) = claimed.expired_time {
            if deadline <= self.clock.now() {
                self.mark_failed(transaction_id);
                warn!("Transaction [{transaction_id}] expired at [{deadline}] before settlement");
                return Err(TransactionError::Expired { transaction_id, expired_time: deadline });
            }
        }

        if let Err(settlement_error) = self.apply_to_balance(transaction_id, &claimed) {
            self.mark_failed(transaction_id);
            warn!("Settlement of transaction [{transaction_id}] failed: {settlement_error}");
            return Err(settlement_error);
        }

        let settled = self.repository.transition(
            transaction_id,
            TransactionStatus::Processing,
            TransactionStatus::Finished,
        )?;

        debug!("Transaction [{transaction_id}] settled");

        Ok(settled)
    }

    /// Completes the `Processing -> Finished` transition for a record whose
    /// balance write is known to have landed before a crash.
    ///
    /// Recovery tooling must establish that the balance movement was
    /// applied before calling this; the engine only finishes the status
    /// half of the compensating-write pair.
    pub fn recover(&self, transaction_id: TransactionId) -> Result<TransactionRecord, TransactionError> {
        let recovered = self.repository.transition(
            transaction_id,
            TransactionStatus::Processing,
            TransactionStatus::Finished,
        )?;

        debug!("Transaction [{transaction_id}] recovered to finished");

        Ok(recovered)
    }

    fn claim(&self, transaction_id: TransactionId) -> Result<TransactionRecord, TransactionError> {
        let claimed = self.repository.transition(
            transaction_id,
            TransactionStatus::Waiting,
            TransactionStatus::Processing,
        )?;

        Ok(claimed)
    }

    fn apply_to_balance(
        &self,
        transaction_id: TransactionId,
        record: &TransactionRecord,
    ) -> Result<(), TransactionError> {
        let user_id = record.user_id.ok_or_else(|| {
            TransactionError::invalid_configuration(format!("transaction [{transaction_id}] has no user to settle against"))
        })?;

        let currency_id = record.currency_id.ok_or_else(|| {
            TransactionError::invalid_configuration(format!("transaction [{transaction_id}] has no currency"))
        })?;

        match record.action {
            TransactionAction::Add => self.balances.credit(user_id, currency_id, record.amount)?,
            TransactionAction::Take => self.balances.debit(user_id, currency_id, record.amount)?,
        }

        Ok(())
    }

    fn mark_failed(&self, transaction_id: TransactionId) {
        let result = self.repository.transition(
            transaction_id,
            TransactionStatus::Processing,
            TransactionStatus::Failed,
        );

        if let Err(repository_error) = result {
            error!("Could not mark transaction [{transaction_id}] as failed: {repository_error}");
        }
    }
}
