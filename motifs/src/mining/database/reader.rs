//! Reader for the line-oriented `.dat` transaction format: one transaction
//! per line, items as whitespace-separated positive integers.

use std::fs;
use std::path::Path;

use log::info;

use super::{ItemId, TransactionDb};
use crate::mining::error::{MiningError, Result};

pub fn parse_dat(text: &str) -> Result<Vec<Vec<ItemId>>> {
    let mut transactions = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(|c| matches!(c, '#' | '%' | '@')) {
            continue;
        }

        let transaction = line
            .split_whitespace()
            .map(|token| parse_item(token, line_idx + 1))
            .collect::<Result<Vec<_>>>()?;
        transactions.push(transaction);
    }

    if transactions.is_empty() {
        return Err(MiningError::Database(
            "dataset contains no transactions".to_string(),
        ));
    }
    Ok(transactions)
}

fn parse_item(token: &str, line: usize) -> Result<ItemId> {
    match token.parse::<ItemId>() {
        Ok(item) if item > 0 => Ok(item),
        _ => Err(MiningError::Database(format!(
            "line {}: invalid item '{}', expected a positive integer",
            line, token
        ))),
    }
}

pub fn read_dat(path: impl AsRef<Path>) -> Result<TransactionDb> {
    let path = path.as_ref();
    info!("Reading transactional database from {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| MiningError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    TransactionDb::new(parse_dat(&text)?)
}
