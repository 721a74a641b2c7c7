use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::OTHER_CATEGORY;

/// One ledger entry from the bank feed.
///
/// Sign convention: a positive `amount` is money leaving the account (an
/// expense), a negative `amount` is money coming in (income). Feeds with the
/// opposite convention are flipped once in `feed`, never per view.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub amount: Decimal,
    /// Most general label first, e.g. `["Food and Drink", "Restaurants"]`.
    pub category: Vec<String>,
    pub account_id: Option<String>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: NaiveDate, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            date,
            name: name.into(),
            amount,
            category: Vec::new(),
            account_id: None,
        }
    }

    pub fn with_category<I, S>(mut self, category: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category = category.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_expense(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_income(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// The spent amount, or zero for income.
    pub fn expense_amount(&self) -> Decimal {
        if self.is_expense() {
            self.amount
        } else {
            Decimal::ZERO
        }
    }

    /// The received amount as a positive value, or zero for expenses.
    pub fn income_amount(&self) -> Decimal {
        if self.is_income() {
            self.amount.abs()
        } else {
            Decimal::ZERO
        }
    }

    /// First category label, or `"Other"` when the feed left it empty.
    pub fn primary_category(&self) -> &str {
        self.category
            .first()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .unwrap_or(OTHER_CATEGORY)
    }
}
