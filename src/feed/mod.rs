//! Ingestion boundary. Provider records are validated and normalized to the
//! expense-positive sign convention here, once, before anything aggregates
//! them.

mod csv_feed;
mod json_feed;

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Account, AccountType, Transaction, MAX_AMOUNT};

pub use csv_feed::{load_csv, parse_rows, CsvProfile};
pub use json_feed::{load_json, parse_json};

/// A transaction as the provider sent it. Every field may be missing or of
/// the wrong JSON type; `normalize` decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(default, alias = "id")]
    pub transaction_id: Option<serde_json::Value>,
    #[serde(default)]
    pub date: Option<serde_json::Value>,
    #[serde(default, alias = "description")]
    pub name: Option<serde_json::Value>,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(default)]
    pub category: Option<serde_json::Value>,
    #[serde(default)]
    pub account_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBalances {
    #[serde(default)]
    pub current: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAccount {
    #[serde(default, alias = "id")]
    pub account_id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub account_type: Option<serde_json::Value>,
    #[serde(default)]
    pub balances: Option<RawBalances>,
    /// Flat balance, for feeds that don't nest it under `balances`.
    #[serde(default)]
    pub balance: Option<serde_json::Value>,
}

/// A record left out of aggregation, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the incoming feed.
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedReport {
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<Account>,
    pub skipped: Vec<SkippedRecord>,
}

impl FeedReport {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Validate raw records, keeping feed order. Records without a usable
/// `amount` or `date` are skipped and reported rather than failing the feed.
/// `negate` flips every amount, for feeds where negative means expense.
pub fn normalize(raw: Vec<RawTransaction>, negate: bool) -> FeedReport {
    normalize_records(raw.into_iter().map(Ok), negate)
}

/// Like [`normalize`], for records that haven't been decoded yet. Anything
/// that isn't a JSON object is skipped.
pub fn normalize_values(raw: Vec<serde_json::Value>, negate: bool) -> FeedReport {
    let records = raw.into_iter().map(|value| {
        serde_json::from_value::<RawTransaction>(value)
            .map_err(|e| format!("not a transaction object: {e}"))
    });
    normalize_records(records, negate)
}

fn normalize_records<I>(records: I, negate: bool) -> FeedReport
where
    I: Iterator<Item = Result<RawTransaction, String>>,
{
    let mut report = FeedReport::default();

    for (index, record) in records.enumerate() {
        let result = record
            .map_err(|reason| SkippedRecord {
                index,
                id: None,
                reason,
            })
            .and_then(|record| normalize_one(index, record, negate));
        match result {
            Ok(txn) => report.transactions.push(txn),
            Err(skipped) => {
                tracing::warn!(
                    index = skipped.index,
                    id = skipped.id.as_deref().unwrap_or("-"),
                    reason = %skipped.reason,
                    "skipping malformed transaction"
                );
                report.skipped.push(skipped);
            }
        }
    }

    tracing::info!(
        kept = report.transactions.len(),
        skipped = report.skipped.len(),
        "normalized feed"
    );
    report
}

fn normalize_one(
    index: usize,
    record: RawTransaction,
    negate: bool,
) -> Result<Transaction, SkippedRecord> {
    let id = record
        .transaction_id
        .as_ref()
        .and_then(json_text)
        .filter(|id| !id.trim().is_empty());
    let skip = |reason: String| SkippedRecord {
        index,
        id: id.clone(),
        reason,
    };

    let amount = match record.amount.as_ref() {
        None | Some(serde_json::Value::Null) => return Err(skip("missing amount".into())),
        Some(value) => json_decimal(value)
            .ok_or_else(|| skip(format!("unparseable amount: {value}")))?,
    };
    if amount.abs() > MAX_AMOUNT {
        return Err(skip(format!("amount out of range: {amount}")));
    }

    let date = match record.date.as_ref() {
        None | Some(serde_json::Value::Null) => return Err(skip("missing date".into())),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => {
            return Err(skip("missing date".into()))
        }
        Some(serde_json::Value::String(s)) => parse_date(s.trim())
            .ok_or_else(|| skip(format!("unparseable date: {}", s.trim())))?,
        Some(other) => return Err(skip(format!("unparseable date: {other}"))),
    };

    let category = match record.category {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::String(s)) => vec![s],
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| json_text(item).ok_or_else(|| skip(format!("unparseable category: {item}"))))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => return Err(skip(format!("unparseable category: {other}"))),
    };
    let category = category
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    let name = match record.name.as_ref() {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(value) => json_text(value).ok_or_else(|| skip(format!("unparseable name: {value}")))?,
    };

    Ok(Transaction {
        id: id.clone().unwrap_or_else(|| format!("feed-{index}")),
        date,
        name: name.trim().to_string(),
        amount: if negate { -amount } else { amount },
        category,
        account_id: record.account_id.as_ref().and_then(json_text),
    })
}

/// Load a feed file: `.csv` as a CSV export, anything else as JSON.
pub fn load_feed(path: &Path, negate: bool) -> anyhow::Result<FeedReport> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv(path, None, negate)
    } else {
        load_json(path, negate)
    }
}

/// Accounts that aren't JSON objects are dropped with a warning.
pub(crate) fn normalize_accounts(raw: Vec<serde_json::Value>) -> Vec<Account> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawAccount>(value) {
            Ok(account) => Some((index, account)),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed account");
                None
            }
        })
        .map(|(index, a)| {
            let balance = a
                .balances
                .and_then(|b| b.current)
                .or(a.balance)
                .as_ref()
                .and_then(json_decimal)
                .filter(|b| b.abs() <= MAX_AMOUNT);
            Account {
                id: a
                    .account_id
                    .as_ref()
                    .and_then(json_text)
                    .unwrap_or_else(|| format!("account-{index}")),
                name: a.name.as_ref().and_then(json_text).unwrap_or_default(),
                account_type: AccountType::parse(
                    a.account_type.as_ref().and_then(json_text).as_deref().unwrap_or(""),
                ),
                balance,
            }
        })
        .collect()
}

/// Feed dates are ISO; a few exports use US style.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            // Timestamps: keep the calendar date only.
            s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
}

/// Strings as-is, numbers in their textual form. Anything else is `None`.
fn json_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept JSON numbers and numeric strings.
fn json_decimal(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .ok()
        }
        serde_json::Value::String(s) => csv_feed::parse_decimal(s).ok().flatten(),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
