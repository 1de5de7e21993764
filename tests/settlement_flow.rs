use std::sync::Arc;

use anyhow::Result;

use ledger_settlement::{
    BalanceStore, EntityKind, EntityRef, FeeGenerator, InMemoryBalanceStore, InMemoryRepository,
    Monetary, SettlementEngine, TransactionAction, TransactionBuilder, TransactionError,
    TransactionRepository, TransactionStatus, TransactionType,
};

/// Full lifecycle: a payment debit settles against a funded balance, a
/// service-percent fee settles on top of it, and a percent-amount fee is
/// derived from a 5.00% service-percent record attached to the payment.
#[test]
fn test_payment_fee_and_percent_amount_flow() -> Result<()> {
    let balances = Arc::new(InMemoryBalanceStore::new());
    let repository = Arc::new(InMemoryRepository::new());
    let engine = SettlementEngine::new(balances.clone(), repository.clone());
    let generator = FeeGenerator::new(repository.clone()).with_inherited_parties();

    balances.credit(7, 840, Monetary::from_minor_units(10_000))?;

    // A payment debit of 50.00 against the funded balance.
    let payment = TransactionBuilder::new(
        EntityRef::new(EntityKind::Payment, 1),
        Monetary::from_minor_units(5_000),
    )
    .user(7)
    .beneficiary(9)
    .currency(840)
    .action(TransactionAction::Take)
    .status(TransactionStatus::Waiting)
    .build()?;
    let payment_id = repository.save(payment)?;

    let settled_payment = engine.settle(payment_id)?;
    assert_eq!(settled_payment.status, TransactionStatus::Finished);
    assert_eq!(balances.balance_of(7, 840), Monetary::from_minor_units(5_000));

    // Service fee of 1.25, derived from the settled payment and settled in turn.
    let fee = generator.make_percent_fee(&settled_payment, Monetary::from_minor_units(125))?;
    assert_eq!(fee.status, TransactionStatus::Waiting);

    let fee_id = repository.save(fee)?;
    let settled_fee = engine.settle(fee_id)?;
    assert_eq!(settled_fee.status, TransactionStatus::Finished);
    assert_eq!(balances.balance_of(7, 840), Monetary::from_minor_units(4_875));

    // A 5.00% service-percent record attached to the payment yields a
    // percent-amount fee of 2.50 with the parties carried over.
    let percent = generator.make_percent_fee(&settled_payment, Monetary::from_minor_units(500))?;
    let percent_id = repository.save(percent)?;
    let percent = repository.find_by_id(percent_id)?;

    let percent_amount = generator.make_percent_amount_fee(&percent)?;
    assert_eq!(percent_amount.amount, Monetary::from_minor_units(250));
    assert_eq!(percent_amount.kind, TransactionType::PercentAmount);
    assert_eq!(percent_amount.status, TransactionStatus::Waiting);
    assert_eq!(percent_amount.user_id, Some(7));
    assert_eq!(percent_amount.beneficiary_id, Some(9));

    // The derived fee flows through the same settlement path.
    let percent_amount_id = repository.save(percent_amount)?;
    let settled_percent_amount = engine.settle(percent_amount_id)?;
    assert_eq!(settled_percent_amount.status, TransactionStatus::Finished);
    assert_eq!(balances.balance_of(7, 840), Monetary::from_minor_units(4_625));

    // Settlement stays one-shot across the whole flow.
    for transaction_id in [payment_id, fee_id, percent_amount_id] {
        assert!(matches!(
            engine.settle(transaction_id),
            Err(TransactionError::InvalidState { .. })
        ));
    }

    Ok(())
}

#[test]
fn test_fee_settlement_fails_when_the_balance_runs_dry() -> Result<()> {
    let balances = Arc::new(InMemoryBalanceStore::new());
    let repository = Arc::new(InMemoryRepository::new());
    let engine = SettlementEngine::new(balances.clone(), repository.clone());
    let generator = FeeGenerator::new(repository.clone()).with_inherited_parties();

    balances.credit(7, 840, Monetary::from_minor_units(5_000))?;

    let payment = TransactionBuilder::new(
        EntityRef::new(EntityKind::Payment, 1),
        Monetary::from_minor_units(5_000),
    )
    .user(7)
    .currency(840)
    .action(TransactionAction::Take)
    .status(TransactionStatus::Waiting)
    .build()?;
    let payment_id = repository.save(payment)?;
    let settled_payment = engine.settle(payment_id)?;

    // The balance is now empty; the fee debit must fail and terminate.
    let fee = generator.make_percent_fee(&settled_payment, Monetary::from_minor_units(125))?;
    let fee_id = repository.save(fee)?;

    let result = engine.settle(fee_id);
    assert!(matches!(result, Err(TransactionError::InsufficientFunds { user_id: 7, .. })));

    assert_eq!(repository.find_by_id(fee_id)?.status, TransactionStatus::Failed);
    assert_eq!(balances.balance_of(7, 840), Monetary::ZERO);

    Ok(())
}
