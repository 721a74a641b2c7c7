use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use serde_json::Value;

use super::{normalize_accounts, normalize_values, FeedReport};

/// Either a bare transaction array or a link-exchange response. Records are
/// kept as raw JSON so one bad record can't reject the document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Transactions(Vec<Value>),
    Exchange {
        #[serde(default)]
        transactions: Vec<Value>,
        #[serde(default)]
        accounts: Vec<Value>,
    },
}

/// Parse a JSON feed document.
pub fn parse_json(data: &str, negate: bool) -> Result<FeedReport> {
    let doc: FeedDocument =
        serde_json::from_str(data).context("Feed is not a transaction array or exchange response")?;

    let (transactions, accounts) = match doc {
        FeedDocument::Transactions(transactions) => (transactions, Vec::new()),
        FeedDocument::Exchange {
            transactions,
            accounts,
        } => (transactions, accounts),
    };

    let mut report = normalize_values(transactions, negate);
    report.accounts = normalize_accounts(accounts);
    Ok(report)
}

pub fn load_json(path: &Path, negate: bool) -> Result<FeedReport> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed: {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = data.len(), "loaded JSON feed");
    parse_json(&data, negate).with_context(|| format!("Invalid feed: {}", path.display()))
}
