use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::account::AccountId;

/// Seed-account row: `id,name,balance`
#[derive(Debug, Deserialize)]
pub struct AccountRow {
    pub id: AccountId,
    pub name: String,
    pub balance: Decimal,
}

/// Transfer row: `from,to,amount,rollback`
#[derive(Debug, Deserialize)]
pub struct TransferRow {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Decimal,
    pub rollback: bool,
}

/// Parses CSV rows, carrying the source line number for error reporting
///
/// # Panics
///
/// If a row cannot be parsed
pub struct CsvRowParser<R, T> {
    iter: DeserializeRecordsIntoIter<R, T>,
}

impl<R, T> CsvRowParser<R, T>
where
    R: Read,
    T: DeserializeOwned,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R, T> Iterator for CsvRowParser<R, T>
where
    R: Read,
    T: DeserializeOwned,
{
    type Item = (u64, T);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row.unwrap()))
    }
}
