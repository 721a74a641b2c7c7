//! Search, filter and sort over the loaded feed, for the transaction list.

use std::collections::HashSet;

use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Newest first unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Case-insensitive substring of the name or primary category.
    pub search: Option<String>,
    /// Exact primary category, ignoring case.
    pub category: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl TransactionQuery {
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut matched: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| match &needle {
                Some(n) => {
                    t.name.to_lowercase().contains(n.as_str())
                        || t.primary_category().to_lowercase().contains(n.as_str())
                }
                None => true,
            })
            .filter(|t| category.map_or(true, |c| t.primary_category().eq_ignore_ascii_case(c)))
            .collect();

        match (self.sort, self.direction) {
            (SortKey::Date, SortDirection::Asc) => matched.sort_by(|a, b| a.date.cmp(&b.date)),
            (SortKey::Date, SortDirection::Desc) => matched.sort_by(|a, b| b.date.cmp(&a.date)),
            (SortKey::Amount, SortDirection::Asc) => matched.sort_by(|a, b| a.amount.cmp(&b.amount)),
            (SortKey::Amount, SortDirection::Desc) => {
                matched.sort_by(|a, b| b.amount.cmp(&a.amount))
            }
        }

        tracing::debug!(total = transactions.len(), matched = matched.len(), "filtered transactions");
        matched
    }
}

/// Distinct primary categories in first-seen order.
pub fn primary_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .map(Transaction::primary_category)
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// The `n` newest transactions.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut sorted = TransactionQuery::default().apply(transactions);
    sorted.truncate(n);
    sorted
}
