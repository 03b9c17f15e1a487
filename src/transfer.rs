use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::account::AccountId;
use crate::store::{AccountStore, StoreError, StoreTransaction};

#[derive(Debug, Clone, Copy)]
pub struct TransferRequest {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Decimal,
    /// Demonstration toggle: apply both balance updates, report the pending
    /// values, then roll the whole unit of work back.
    pub force_rollback: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Source and destination accounts must differ, both are {id}")]
    SameAccount { id: AccountId },
    #[error("Transfer amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("Insufficient funds: balance is {balance:.2}, transfer amount is {amount:.2}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub committed: bool,
    pub message: String,
}

impl TransferRequest {
    /// Reject malformed requests before any storage access.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.from == self.to {
            return Err(RequestError::SameAccount { id: self.from });
        }
        if self.amount <= Decimal::ZERO {
            return Err(RequestError::NonPositiveAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// Move `request.amount` from one account to another as a single unit of work.
///
/// Both balance updates become durable together or not at all: every failure
/// (missing account, insufficient funds, write conflict at commit) drops the
/// unit of work, which rolls back whatever was staged, so a caller retrying a
/// failed transfer always starts from the pre-call balances. No other reader
/// ever observes the state between the two updates.
pub fn transfer<S: AccountStore>(
    store: &S,
    request: &TransferRequest,
) -> Result<TransferOutcome, TransferError> {
    request.validate()?;

    let mut tx = store.begin();

    let from_balance = tx.read_balance(request.from)?;
    if from_balance < request.amount {
        // nothing staged yet, dropping tx aborts the unit of work
        return Err(TransferError::InsufficientFunds {
            balance: from_balance,
            amount: request.amount,
        });
    }
    let to_balance = tx.read_balance(request.to)?;

    tx.update_balance(request.from, from_balance - request.amount)?;
    tx.update_balance(request.to, to_balance + request.amount)?;

    if request.force_rollback {
        // Re-read through the unit of work to show the pending, not-yet-durable
        // values before throwing them away.
        let pending_from = tx.read_balance(request.from)?;
        let pending_to = tx.read_balance(request.to)?;
        tx.rollback();
        debug!(
            from = request.from,
            to = request.to,
            "transfer rolled back on request"
        );
        return Ok(TransferOutcome {
            committed: false,
            message: format!(
                "Rolled back transaction: from was {pending_from:.2}, to was {pending_to:.2}"
            ),
        });
    }

    tx.commit()?;
    debug!(
        from = request.from,
        to = request.to,
        amount = %request.amount,
        "transfer committed"
    );
    Ok(TransferOutcome {
        committed: true,
        message: "Committed transaction".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rust_decimal::prelude::FromPrimitive;

    use crate::account::Account;
    use crate::store::in_memory_store::InMemoryAccountStore;

    use super::*;

    fn dec(value: u32) -> Decimal {
        Decimal::from_u32(value).unwrap()
    }

    fn store_ab(a: u32, b: u32) -> InMemoryAccountStore {
        let store = InMemoryAccountStore::default();
        store.insert(Account::new(1, "A", dec(a)));
        store.insert(Account::new(2, "B", dec(b)));
        store
    }

    fn request(from: AccountId, to: AccountId, amount: u32) -> TransferRequest {
        TransferRequest {
            from,
            to,
            amount: dec(amount),
            force_rollback: false,
        }
    }

    #[test]
    fn committed_transfer_moves_funds() {
        let store = store_ab(100, 50);
        let outcome = transfer(&store, &request(1, 2, 30)).unwrap();

        assert!(outcome.committed);
        assert_eq!(outcome.message, "Committed transaction");
        assert_eq!(store.read_balance(1).unwrap(), dec(70));
        assert_eq!(store.read_balance(2).unwrap(), dec(80));
    }

    #[test]
    fn committed_transfer_conserves_total() {
        let store = store_ab(100, 50);
        for amount in [1, 5, 30] {
            transfer(&store, &request(1, 2, amount)).unwrap();
            let total = store.read_balance(1).unwrap() + store.read_balance(2).unwrap();
            assert_eq!(total, dec(150));
        }
    }

    #[test]
    fn forced_rollback_restores_balances() {
        let store = store_ab(100, 50);
        let outcome = transfer(
            &store,
            &TransferRequest {
                force_rollback: true,
                ..request(1, 2, 30)
            },
        )
        .unwrap();

        assert!(!outcome.committed);
        assert_eq!(
            outcome.message,
            "Rolled back transaction: from was 70.00, to was 80.00"
        );
        assert_eq!(store.read_balance(1).unwrap(), dec(100));
        assert_eq!(store.read_balance(2).unwrap(), dec(50));
    }

    #[test]
    fn insufficient_funds_leaves_balances_untouched() {
        let store = store_ab(10, 50);
        let req = request(1, 2, 30);

        // a failed call is idempotent, retrying changes nothing
        for _ in 0..2 {
            let err = transfer(&store, &req).unwrap_err();
            assert!(matches!(
                err,
                TransferError::InsufficientFunds { balance, amount }
                    if balance == dec(10) && amount == dec(30)
            ));
            assert_eq!(store.read_balance(1).unwrap(), dec(10));
            assert_eq!(store.read_balance(2).unwrap(), dec(50));
        }
    }

    #[test]
    fn same_account_rejected_before_storage() {
        let store = store_ab(100, 50);
        let err = transfer(&store, &request(1, 1, 30)).unwrap_err();

        assert!(matches!(
            err,
            TransferError::Request(RequestError::SameAccount { id: 1 })
        ));
        assert_eq!(store.read_balance(1).unwrap(), dec(100));
    }

    #[test]
    fn non_positive_amount_rejected() {
        let store = store_ab(100, 50);
        for amount in [Decimal::ZERO, -dec(5)] {
            let err = transfer(
                &store,
                &TransferRequest {
                    from: 1,
                    to: 2,
                    amount,
                    force_rollback: false,
                },
            )
            .unwrap_err();
            assert!(matches!(
                err,
                TransferError::Request(RequestError::NonPositiveAmount { .. })
            ));
        }
        assert_eq!(store.read_balance(1).unwrap(), dec(100));
        assert_eq!(store.read_balance(2).unwrap(), dec(50));
    }

    #[test]
    fn missing_accounts_surface_not_found() {
        let store = store_ab(100, 50);

        let err = transfer(&store, &request(9, 2, 30)).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Store(StoreError::NotFound(9))
        ));

        let err = transfer(&store, &request(1, 9, 30)).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Store(StoreError::NotFound(9))
        ));
        assert_eq!(store.read_balance(1).unwrap(), dec(100));
        assert_eq!(store.read_balance(2).unwrap(), dec(50));
    }

    #[test]
    fn concurrent_transfers_never_lose_updates() {
        let store = Arc::new(store_ab(1000, 1000));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    // alternate direction per worker over the shared pair
                    let (from, to) = if worker % 2 == 0 { (1, 2) } else { (2, 1) };
                    for _ in 0..50 {
                        // conflicts are expected and are not retried
                        let _ = transfer(
                            &*store,
                            &TransferRequest {
                                from,
                                to,
                                amount: dec(1),
                                force_rollback: false,
                            },
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let a = store.read_balance(1).unwrap();
        let b = store.read_balance(2).unwrap();
        assert_eq!(a + b, dec(2000));
        assert!(a >= Decimal::ZERO);
        assert!(b >= Decimal::ZERO);
    }
}
