//! One connected feed plus the budget table that outlives it.

use chrono::NaiveDate;

use crate::aggregate::{self, CategoryTotal, MonthlyBucket, Summary};
use crate::budget::{self, BudgetStatus};
use crate::categorize::BucketTable;
use crate::error::FinError;
use crate::feed::{FeedReport, SkippedRecord};
use crate::models::{Account, BudgetLimits, Expense, Transaction};

/// Holds the loaded feed and the user's budget table. The feed is read-only
/// between `connect` and `reset`; limits change only through
/// [`Session::update_limit`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    transactions: Vec<Transaction>,
    accounts: Vec<Account>,
    skipped: Vec<SkippedRecord>,
    limits: BudgetLimits,
    buckets: BucketTable,
    connected: bool,
}

impl Session {
    pub fn new(limits: BudgetLimits, buckets: BucketTable) -> Self {
        Self {
            limits,
            buckets,
            ..Self::default()
        }
    }

    /// Replace whatever feed was loaded with `report`.
    pub fn connect(&mut self, report: FeedReport) {
        tracing::info!(
            transactions = report.transactions.len(),
            accounts = report.accounts.len(),
            skipped = report.skipped.len(),
            "session connected"
        );
        self.transactions = report.transactions;
        self.accounts = report.accounts;
        self.skipped = report.skipped;
        self.connected = true;
    }

    /// True once a feed was connected, even one where every record was skipped.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Drop the feed. Budget limits survive a disconnect.
    pub fn reset(&mut self) {
        self.transactions.clear();
        self.accounts.clear();
        self.skipped.clear();
        self.connected = false;
        tracing::debug!("session reset");
    }

    pub fn update_limit(&mut self, category: &str, limit: rust_decimal::Decimal) -> Result<(), FinError> {
        self.limits.update_limit(category, limit)
    }

    pub fn update_limit_str(&mut self, category: &str, input: &str) -> Result<(), FinError> {
        self.limits.update_limit_str(category, input)
    }

    /// Append locally stored expenses to the feed.
    pub fn merge_expenses(&mut self, expenses: &[Expense]) {
        self.transactions
            .extend(expenses.iter().map(Expense::to_transaction));
        tracing::debug!(count = expenses.len(), "merged manual expenses");
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn limits(&self) -> &BudgetLimits {
        &self.limits
    }

    pub fn buckets(&self) -> &BucketTable {
        &self.buckets
    }

    // ── Reports ───────────────────────────────────────────────

    pub fn monthly(&self) -> Vec<MonthlyBucket> {
        aggregate::aggregate_monthly(&self.transactions)
    }

    pub fn by_category(&self) -> Vec<CategoryTotal> {
        aggregate::aggregate_by_category(&self.transactions)
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        let accounts = (!self.accounts.is_empty()).then_some(self.accounts.as_slice());
        aggregate::summarize(&self.transactions, accounts, today)
    }

    /// Budget rows per spending category.
    pub fn budgets(&self) -> Vec<BudgetStatus> {
        budget::evaluate_budgets(&self.by_category(), &self.limits)
    }

    /// Budget rows per configured bucket.
    pub fn bucket_budgets(&self) -> Vec<BudgetStatus> {
        budget::evaluate_buckets(&self.transactions, &self.buckets, &self.limits)
    }
}
