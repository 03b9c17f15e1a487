use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::{Account, AccountId};

pub mod in_memory_store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No account with id {0}")]
    NotFound(AccountId),
    #[error("Account {0} was modified by another transaction")]
    WriteConflict(AccountId),
}

/// Transactional account storage.
///
/// A store hands out units of work via [`AccountStore::begin`]; all balance
/// writes go through a unit of work and become durable only on
/// [`StoreTransaction::commit`]. The plain read methods never observe another
/// unit's uncommitted writes.
pub trait AccountStore {
    type Tx<'a>: StoreTransaction
    where
        Self: 'a;

    /// Open a unit of work against this store.
    fn begin(&self) -> Self::Tx<'_>;

    /// Point lookup, no side effects.
    fn find(&self, id: AccountId) -> Option<Account>;

    fn read_balance(&self, id: AccountId) -> Result<Decimal, StoreError>;
}

/// A group of balance writes that commits or rolls back as a whole.
///
/// Dropping an uncommitted unit of work rolls it back, so every early-return
/// error path in a caller aborts the unit without extra bookkeeping.
pub trait StoreTransaction {
    /// Read a balance as this unit of work sees it, staged writes included.
    fn read_balance(&mut self, id: AccountId) -> Result<Decimal, StoreError>;

    /// Stage exactly one record mutation. Fails with [`StoreError::NotFound`]
    /// if the account does not exist; nothing is made durable yet.
    fn update_balance(&mut self, id: AccountId, new_balance: Decimal) -> Result<(), StoreError>;

    /// Make all staged writes durable atomically. Fails with
    /// [`StoreError::WriteConflict`] if any record touched by this unit
    /// changed since it was first read, in which case nothing is applied.
    fn commit(self) -> Result<(), StoreError>;

    /// Discard all staged writes.
    fn rollback(self);
}
