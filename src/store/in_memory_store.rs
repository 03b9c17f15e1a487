use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rust_decimal::Decimal;
use tracing::debug;

use crate::account::{Account, AccountId};

use super::{AccountStore, StoreError, StoreTransaction};

#[derive(Debug, Clone)]
struct Record {
    name: String,
    balance: Decimal,
    version: u64,
}

/// Versioned in-memory account store.
///
/// Every record carries a version counter that is bumped on commit. A unit of
/// work remembers the version of each record it touches and validates those
/// versions under the store lock before applying its staged writes, so two
/// interleaved units sharing an account cannot lose an update; units touching
/// disjoint accounts never conflict.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    records: Mutex<HashMap<AccountId, Record>>,
}

impl InMemoryAccountStore {
    /// Seed an account. Seeding happens out of band, so this lives on the
    /// concrete store rather than on the [`AccountStore`] port.
    pub fn insert(&self, account: Account) {
        self.lock().insert(
            account.id,
            Record {
                name: account.name,
                balance: account.balance,
                version: 0,
            },
        );
    }

    /// All accounts currently in the store, in no particular order.
    pub fn accounts(&self) -> Vec<Account> {
        self.lock()
            .iter()
            .map(|(id, record)| Account::new(*id, record.name.clone(), record.balance))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<AccountId, Record>> {
        self.records.lock().expect("account store lock poisoned")
    }
}

impl AccountStore for InMemoryAccountStore {
    type Tx<'a>
        = InMemoryTransaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> InMemoryTransaction<'_> {
        InMemoryTransaction {
            store: self,
            observed: HashMap::new(),
            staged: HashMap::new(),
        }
    }

    fn find(&self, id: AccountId) -> Option<Account> {
        self.lock()
            .get(&id)
            .map(|record| Account::new(id, record.name.clone(), record.balance))
    }

    fn read_balance(&self, id: AccountId) -> Result<Decimal, StoreError> {
        self.lock()
            .get(&id)
            .map(|record| record.balance)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Unit of work over an [`InMemoryAccountStore`].
///
/// Writes are staged privately and only reach the shared map on commit, so no
/// other reader ever observes an intermediate state. Dropping the transaction
/// discards the staged writes, which is all a rollback takes here.
pub struct InMemoryTransaction<'a> {
    store: &'a InMemoryAccountStore,
    /// Record versions as first seen by this unit of work.
    observed: HashMap<AccountId, u64>,
    staged: HashMap<AccountId, Decimal>,
}

impl StoreTransaction for InMemoryTransaction<'_> {
    fn read_balance(&mut self, id: AccountId) -> Result<Decimal, StoreError> {
        if let Some(balance) = self.staged.get(&id) {
            return Ok(*balance);
        }
        let records = self.store.lock();
        let record = records.get(&id).ok_or(StoreError::NotFound(id))?;
        self.observed.entry(id).or_insert(record.version);
        Ok(record.balance)
    }

    fn update_balance(&mut self, id: AccountId, new_balance: Decimal) -> Result<(), StoreError> {
        {
            let records = self.store.lock();
            let record = records.get(&id).ok_or(StoreError::NotFound(id))?;
            self.observed.entry(id).or_insert(record.version);
        }
        self.staged.insert(id, new_balance);
        Ok(())
    }

    fn commit(self) -> Result<(), StoreError> {
        let mut records = self.store.lock();

        // Validate every touched record before applying anything, so a
        // conflicting commit leaves the store untouched.
        for (id, version) in &self.observed {
            match records.get(id) {
                None => return Err(StoreError::NotFound(*id)),
                Some(record) if record.version != *version => {
                    return Err(StoreError::WriteConflict(*id));
                }
                Some(_) => {}
            }
        }

        for (id, balance) in self.staged {
            // Staged ids are a subset of observed ids, validated above.
            let record = records.get_mut(&id).expect("staged record vanished");
            record.balance = balance;
            record.version += 1;
        }
        debug!("unit of work committed");
        Ok(())
    }

    fn rollback(self) {
        debug!(staged = self.staged.len(), "unit of work rolled back");
    }
}
