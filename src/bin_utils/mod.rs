//! This module could be a separate crate on its own, to bootstrap [`teller`](crate)
//! within the binary, but for simplicity purposes, I include this module directly.

use std::io::{Read, Write};

use anyhow::Result;
use tracing::info;

use crate::account::Account;
use crate::store::in_memory_store::InMemoryAccountStore;
use crate::transfer::{TransferError, TransferRequest, transfer};
use csv_parser::{AccountRow, CsvRowParser, TransferRow};
use csv_printer::print_accounts;

pub mod csv_parser;
pub mod csv_printer;

/// Seeds a store from an accounts CSV, replays a transfers CSV against it and
/// prints the final account table.
pub struct Service<'w, A, T, W: 'w> {
    pub accounts: A,
    pub transfers: T,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, TransferError)>,
}

impl<'w, A, T, W> Service<'w, A, T, W>
where
    A: Read,
    T: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let store = InMemoryAccountStore::default();

        for (_line, row) in CsvRowParser::<_, AccountRow>::new(self.accounts) {
            store.insert(Account::new(row.id, row.name, row.balance));
        }

        for (line, row) in CsvRowParser::<_, TransferRow>::new(self.transfers) {
            let request = TransferRequest {
                from: row.from,
                to: row.to,
                amount: row.amount,
                force_rollback: row.rollback,
            };
            match transfer(&store, &request) {
                Ok(outcome) => {
                    info!(line, committed = outcome.committed, message = %outcome.message)
                }
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let mut accounts = store.accounts();
        accounts.sort_by_key(|account| account.id);
        print_accounts(self.output, accounts.into_iter())
    }
}
