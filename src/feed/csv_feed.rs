use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use serde_json::Value;
use std::str::FromStr;

use super::{normalize, FeedReport, RawTransaction};

/// Column layout of a CSV transaction export.
#[derive(Debug, Clone)]
pub struct CsvProfile {
    pub id_column: Option<usize>,
    pub date_column: usize,
    pub name_column: usize,
    pub amount_column: usize,
    pub category_column: Option<usize>,
    pub has_header: bool,
    /// Flip signs for exports where negative means money out.
    pub negate_amounts: bool,
}

impl Default for CsvProfile {
    fn default() -> Self {
        Self {
            id_column: None,
            date_column: 0,
            name_column: 1,
            amount_column: 2,
            category_column: Some(3),
            has_header: true,
            negate_amounts: false,
        }
    }
}

impl CsvProfile {
    /// Pick columns by header name where possible, falling back to the
    /// default positions.
    pub fn from_headers(headers: &[String]) -> Self {
        let h: Vec<String> = headers.iter().map(|s| s.trim().to_lowercase()).collect();
        let defaults = Self::default();
        Self {
            id_column: col_index(&h, &["id", "transaction_id", "transaction id"]),
            date_column: col_index(&h, &["date", "transaction date", "posted date"])
                .unwrap_or(defaults.date_column),
            name_column: col_index(&h, &["name", "description", "payee"])
                .unwrap_or(defaults.name_column),
            amount_column: col_index(&h, &["amount", "transaction amount"])
                .unwrap_or(defaults.amount_column),
            category_column: col_index(&h, &["category", "categories"]),
            has_header: true,
            negate_amounts: false,
        }
    }
}

fn col_index(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

/// Read a CSV export. With `profile == None` the columns are picked from
/// the header row.
pub fn load_csv(path: &Path, profile: Option<&CsvProfile>, negate: bool) -> Result<FeedReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    if rows.is_empty() {
        anyhow::bail!("CSV file is empty: {}", path.display());
    }

    let mut profile = match profile {
        Some(p) => p.clone(),
        None if looks_like_header(&rows[0]) => CsvProfile::from_headers(&rows[0]),
        None => CsvProfile {
            has_header: false,
            ..CsvProfile::default()
        },
    };
    profile.negate_amounts |= negate;

    let data = if profile.has_header { &rows[1..] } else { &rows[..] };
    tracing::info!(path = %path.display(), rows = data.len(), "loaded CSV feed");
    Ok(parse_rows(data, &profile))
}

/// Headers don't parse as dates or numbers.
fn looks_like_header(row: &[String]) -> bool {
    row.iter().all(|field| {
        let trimmed = field.trim();
        parse_decimal(trimmed).map(|d| d.is_none()).unwrap_or(true) && super::parse_date(trimmed).is_none()
    })
}

/// Turn CSV rows into a feed report using the given profile.
pub fn parse_rows(rows: &[Vec<String>], profile: &CsvProfile) -> FeedReport {
    let raw = rows
        .iter()
        .map(|row| {
            let cell = |col: usize| {
                row.get(col)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            };
            let text = |col: usize| cell(col).map(Value::String);
            RawTransaction {
                transaction_id: profile.id_column.and_then(text),
                date: text(profile.date_column),
                name: text(profile.name_column),
                amount: text(profile.amount_column),
                category: profile.category_column.and_then(cell).map(|c| {
                    Value::Array(split_category(&c).into_iter().map(Value::String).collect())
                }),
                account_id: None,
            }
        })
        .collect();

    normalize(raw, profile.negate_amounts)
}

/// `"Food and Drink > Restaurants"` or `"Food and Drink/Restaurants"`.
fn split_category(s: &str) -> Vec<String> {
    s.split(['>', '/', ';'])
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Parse a money cell. Blank cells are `None`; `(5.00)` is negative.
pub(crate) fn parse_decimal(s: &str) -> Result<Option<Decimal>> {
    let cleaned = s
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
        .with_context(|| format!("Failed to parse '{s}' as decimal"))
}

#[cfg(test)]
#[path = "csv_feed_tests.rs"]
mod tests;
