//! Folds a transaction feed into the dashboard's derived views: monthly
//! trend buckets, spending per category, and the overview scalars.
//!
//! Everything here is a pure function of its inputs. Sums are accumulated
//! exactly in `Decimal` and only rounded when a result is handed out.

mod month;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Account, Transaction};
use crate::view::{percent_of, round_display};

pub use month::YearMonth;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub spending: Decimal,
    pub income: Decimal,
    pub transaction_count: usize,
}

impl MonthlyBucket {
    fn new(month: YearMonth) -> Self {
        Self {
            month,
            spending: Decimal::ZERO,
            income: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    pub fn net(&self) -> Decimal {
        self.income - self.spending
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub value: Decimal,
    pub count: usize,
    pub percentage_of_total: Decimal,
}

/// Where [`Summary::total_balance`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSource {
    /// Sum of the linked accounts' current balances.
    Accounts,
    /// Sum of all transaction amounts. Under the expense-positive sign
    /// convention this is expenses minus income, not a ledger balance.
    TransactionProxy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_spending: Decimal,
    pub total_income: Decimal,
    /// Zero when there are no expenses.
    pub average_transaction: Decimal,
    /// Records of either sign.
    pub transaction_count: usize,
    pub expense_count: usize,
    pub month: YearMonth,
    pub monthly_spending: Decimal,
    pub monthly_income: Decimal,
    /// Income minus spending for `month`; negative when overspent.
    pub monthly_savings: Decimal,
    pub total_balance: Decimal,
    pub balance_source: BalanceSource,
}

/// Group by calendar month, oldest first.
pub fn aggregate_monthly(transactions: &[Transaction]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<YearMonth, MonthlyBucket> = BTreeMap::new();

    for txn in transactions {
        let month = YearMonth::from_date(txn.date);
        let bucket = buckets
            .entry(month)
            .or_insert_with(|| MonthlyBucket::new(month));
        bucket.spending = bucket.spending.saturating_add(txn.expense_amount());
        bucket.income = bucket.income.saturating_add(txn.income_amount());
        bucket.transaction_count += 1;
    }

    tracing::debug!(
        transactions = transactions.len(),
        months = buckets.len(),
        "aggregated monthly"
    );

    buckets
        .into_values()
        .map(|mut b| {
            b.spending = round_display(b.spending);
            b.income = round_display(b.income);
            b
        })
        .collect()
}

/// Spending per primary category, largest first. Income is left out.
/// Equal totals keep the order in which their category first appeared.
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, Decimal, usize)> = Vec::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let category = txn.primary_category();
        let slot = *index.entry(category).or_insert_with(|| {
            totals.push((category.to_string(), Decimal::ZERO, 0));
            totals.len() - 1
        });
        totals[slot].1 = totals[slot].1.saturating_add(txn.amount);
        totals[slot].2 += 1;
    }

    let grand_total = saturating_sum(totals.iter().map(|(_, value, _)| *value));

    // Stable sort keeps first-seen order for ties.
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    tracing::debug!(categories = totals.len(), %grand_total, "aggregated by category");

    totals
        .into_iter()
        .map(|(category, value, count)| CategoryTotal {
            category,
            percentage_of_total: round_display(percent_of(value, grand_total)),
            value: round_display(value),
            count,
        })
        .collect()
}

/// Records dated within `month`.
pub fn in_month(transactions: &[Transaction], month: YearMonth) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| month.contains(t.date))
        .cloned()
        .collect()
}

/// Overview scalars. `today` picks the month for the monthly figures.
/// `accounts` feeds `total_balance` when any account reports a balance.
pub fn summarize(
    transactions: &[Transaction],
    accounts: Option<&[Account]>,
    today: NaiveDate,
) -> Summary {
    let month = YearMonth::from_date(today);

    let mut total_spending = Decimal::ZERO;
    let mut total_income = Decimal::ZERO;
    let mut expense_count = 0;
    let mut monthly_spending = Decimal::ZERO;
    let mut monthly_income = Decimal::ZERO;
    let mut amount_sum = Decimal::ZERO;

    for txn in transactions {
        amount_sum = amount_sum.saturating_add(txn.amount);
        total_spending = total_spending.saturating_add(txn.expense_amount());
        total_income = total_income.saturating_add(txn.income_amount());
        if txn.is_expense() {
            expense_count += 1;
        }
        if month.contains(txn.date) {
            monthly_spending = monthly_spending.saturating_add(txn.expense_amount());
            monthly_income = monthly_income.saturating_add(txn.income_amount());
        }
    }

    // No expenses means no average; report zero rather than dividing.
    let average_transaction = if expense_count == 0 {
        Decimal::ZERO
    } else {
        total_spending / Decimal::from(expense_count)
    };

    let (total_balance, balance_source) = account_balance(accounts)
        .map(|sum| (sum, BalanceSource::Accounts))
        .unwrap_or((amount_sum, BalanceSource::TransactionProxy));

    Summary {
        total_spending: round_display(total_spending),
        total_income: round_display(total_income),
        average_transaction: round_display(average_transaction),
        transaction_count: transactions.len(),
        expense_count,
        month,
        monthly_spending: round_display(monthly_spending),
        monthly_income: round_display(monthly_income),
        monthly_savings: round_display(monthly_income - monthly_spending),
        total_balance: round_display(total_balance),
        balance_source,
    }
}

/// Sum that clamps at the `Decimal` range instead of panicking.
pub(crate) fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

fn account_balance(accounts: Option<&[Account]>) -> Option<Decimal> {
    let balances: Vec<Decimal> = accounts?.iter().filter_map(|a| a.balance).collect();
    if balances.is_empty() {
        None
    } else {
        Some(saturating_sum(balances))
    }
}
