use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Transaction, MAX_AMOUNT};
use crate::error::FinError;

/// A manually entered expense, kept in the local store.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub description: String,
    /// Positive amount spent.
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(description: String, amount: Decimal, category: String, date: NaiveDate) -> Self {
        Self {
            id: None,
            description,
            amount,
            category,
            date,
        }
    }

    /// Entered today, in local time.
    pub fn today(description: String, amount: Decimal, category: String) -> Self {
        Self::new(
            description,
            amount,
            category,
            chrono::Local::now().date_naive(),
        )
    }

    pub fn validate(&self) -> Result<(), FinError> {
        if self.description.trim().is_empty() {
            return Err(FinError::InvalidExpense("description is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(FinError::InvalidExpense("category is required".into()));
        }
        if self.amount == Decimal::ZERO {
            return Err(FinError::InvalidExpense("amount must be non-zero".into()));
        }
        if self.amount.abs() > MAX_AMOUNT {
            return Err(FinError::InvalidExpense("amount is out of range".into()));
        }
        Ok(())
    }

    /// View this expense as a feed record so it aggregates with bank data.
    pub fn to_transaction(&self) -> Transaction {
        let id = match self.id {
            Some(id) => format!("expense-{id}"),
            None => "expense".to_string(),
        };
        Transaction::new(id, self.date, self.description.clone(), self.amount)
            .with_category([self.category.clone()])
    }
}
