use rust_decimal::Decimal;

mod account;
mod budget;
mod expense;
mod transaction;

pub use account::{Account, AccountType};
pub use budget::{BudgetLimits, DEFAULT_LIMIT};
pub use expense::Expense;
pub use transaction::Transaction;

/// Largest magnitude accepted for an amount or limit (one quadrillion).
/// Sums of bounded values stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Label used when a record has no category, and the default budget bucket.
pub const OTHER_CATEGORY: &str = "Other";
