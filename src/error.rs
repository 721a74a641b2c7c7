use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinError {
    #[error("Budget limit for '{category}' must be positive, got {limit}")]
    InvalidLimit { category: String, limit: Decimal },
    #[error("Budget limit for '{category}' is not a number: '{input}'")]
    NonNumericLimit { category: String, input: String },
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}
