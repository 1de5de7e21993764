use super::{
    BalanceError, BalanceStore, InMemoryBalanceStore, InMemoryRepository, RepositoryError,
    TransactionRepository,
};

use std::thread;

use anyhow::Result;

use crate::models::{EntityKind, EntityRef, TransactionBuilder, TransactionRecord, TransactionStatus};
use crate::types::Monetary;

fn waiting_record() -> Result<TransactionRecord> {
    let record = TransactionBuilder::new(
        EntityRef::new(EntityKind::Payment, 1),
        Monetary::from_minor_units(5_000),
    )
    .user(7)
    .currency(840)
    .status(TransactionStatus::Waiting)
    .build()?;

    Ok(record)
}

#[test]
fn test_credit_and_debit_update_the_balance() -> Result<()> {
    let store = InMemoryBalanceStore::new();

    store.credit(7, 840, Monetary::from_minor_units(10_000))?;
    store.debit(7, 840, Monetary::from_minor_units(4_000))?;

    assert_eq!(store.balance_of(7, 840), Monetary::from_minor_units(6_000));

    Ok(())
}

#[test]
fn test_debit_rejects_insufficient_funds_and_leaves_the_balance_untouched() -> Result<()> {
    let store = InMemoryBalanceStore::new();
    store.credit(7, 840, Monetary::from_minor_units(100))?;

    let result = store.debit(7, 840, Monetary::from_minor_units(101));

    assert!(matches!(
        result,
        Err(BalanceError::InsufficientFunds { user_id: 7, .. })
    ));
    assert_eq!(store.balance_of(7, 840), Monetary::from_minor_units(100));

    Ok(())
}

#[test]
fn test_balances_are_isolated_by_user_and_currency() -> Result<()> {
    let store = InMemoryBalanceStore::new();

    store.credit(7, 840, Monetary::from_minor_units(100))?;
    store.credit(7, 978, Monetary::from_minor_units(200))?;
    store.credit(8, 840, Monetary::from_minor_units(300))?;

    assert_eq!(store.balance_of(7, 840), Monetary::from_minor_units(100));
    assert_eq!(store.balance_of(7, 978), Monetary::from_minor_units(200));
    assert_eq!(store.balance_of(8, 840), Monetary::from_minor_units(300));
    assert_eq!(store.balance_of(9, 840), Monetary::ZERO);

    Ok(())
}

#[test]
fn test_save_assigns_sequential_ids_and_timestamps() -> Result<()> {
    let repository = InMemoryRepository::new();

    let first = repository.save(waiting_record()?)?;
    let second = repository.save(waiting_record()?)?;

    assert_eq!(second, first + 1);

    let stored = repository.find_by_id(first)?;
    assert_eq!(stored.id, Some(first));
    assert!(stored.created_at.is_some());
    assert!(stored.updated_at.is_some());

    Ok(())
}

#[test]
fn test_resaving_a_record_keeps_its_id() -> Result<()> {
    let repository = InMemoryRepository::new();

    let transaction_id = repository.save(waiting_record()?)?;
    let mut stored = repository.find_by_id(transaction_id)?;
    stored.order_id = Some(99);

    let resaved_id = repository.save(stored)?;

    assert_eq!(resaved_id, transaction_id);
    assert_eq!(repository.find_by_id(transaction_id)?.order_id, Some(99));

    Ok(())
}

#[test]
fn test_resaving_an_unknown_id_is_rejected() -> Result<()> {
    let repository = InMemoryRepository::new();

    let mut record = waiting_record()?;
    record.id = Some(404);

    assert!(matches!(
        repository.save(record),
        Err(RepositoryError::NotFound { transaction_id: 404 })
    ));

    Ok(())
}

#[test]
fn test_find_by_id_reports_missing_records() {
    let repository = InMemoryRepository::new();

    assert!(matches!(
        repository.find_by_id(1),
        Err(RepositoryError::NotFound { transaction_id: 1 })
    ));
}

#[test]
fn test_transition_is_conditional_on_the_current_status() -> Result<()> {
    let repository = InMemoryRepository::new();
    let transaction_id = repository.save(waiting_record()?)?;

    let claimed = repository.transition(
        transaction_id,
        TransactionStatus::Waiting,
        TransactionStatus::Processing,
    )?;
    assert_eq!(claimed.status, TransactionStatus::Processing);

    let result = repository.transition(
        transaction_id,
        TransactionStatus::Waiting,
        TransactionStatus::Processing,
    );
    assert!(matches!(
        result,
        Err(RepositoryError::StatusConflict {
            actual: TransactionStatus::Processing,
            ..
        })
    ));

    assert_eq!(repository.find_by_id(transaction_id)?.status, TransactionStatus::Processing);

    Ok(())
}

#[test]
fn test_concurrent_transitions_have_a_single_winner() -> Result<()> {
    let repository = InMemoryRepository::new();
    let transaction_id = repository.save(waiting_record()?)?;

    let winners = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    repository
                        .transition(
                            transaction_id,
                            TransactionStatus::Waiting,
                            TransactionStatus::Processing,
                        )
                        .is_ok()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(false))
            .filter(|won| *won)
            .count()
    });

    assert_eq!(winners, 1);

    Ok(())
}
