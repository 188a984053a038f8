//! Bank statement loading: CSV rows into typed transactions.

use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::model::{StatementRow, Transaction};

/// Read transactions from CSV content.
///
/// Expects the columns `Session Number`, `Setup Date`, `Effective Date`,
/// `From`, `To`, `Amount`. Row order is preserved; the aggregator depends
/// on it for session and player ordering.
pub fn read_statement<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();

    for result in csv_reader.deserialize() {
        let row: StatementRow = result?;
        let transaction = Transaction::from_row(row)?;
        debug!(
            "session {} {} {} {:.2}",
            transaction.session,
            if transaction.is_buy_in() { "buy-in" } else { "payout" },
            transaction.from,
            transaction.amount
        );
        transactions.push(transaction);
    }

    Ok(transactions)
}

/// Read transactions from a statement file.
pub fn read_statement_file(path: &Path) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path)?;
    read_statement(file)
}
