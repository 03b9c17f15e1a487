use std::fs::File;

use anyhow::{Context, Result};
use teller::bin_utils::Service;
use teller::transfer::TransferError;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let accounts_file = args
        .next()
        .context("Expected an accounts CSV file as the first argument")?;
    let transfers_file = args
        .next()
        .context("Expected a transfers CSV file as the second argument")?;

    let accounts = File::open(&accounts_file)
        .with_context(|| format!("Failed to open `{accounts_file}`"))?;
    let transfers = File::open(&transfers_file)
        .with_context(|| format!("Failed to open `{transfers_file}`"))?;

    let service = Service {
        accounts,
        transfers,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| {
            match err {
                TransferError::Request(err) => eprintln!("Error at line {line}: {err}"),
                TransferError::Store(err) => eprintln!("Error at line {line}: {err}"),
                TransferError::InsufficientFunds { .. } => {
                    // a rejected transfer is not a technical error, so we don't need to print it
                }
            }
        }),
    };
    service.run()
}
