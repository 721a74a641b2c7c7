//! Budget progress: spending per category or bucket measured against the
//! session's limits.

use rust_decimal::Decimal;

use crate::aggregate::{saturating_sum, CategoryTotal};
use crate::categorize::BucketTable;
use crate::models::{BudgetLimits, Transaction};
use crate::view::{format_amount, percent_of, round_display};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const NEAR_LIMIT_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    Ok,
    NearLimit,
    Exceeded,
}

impl BudgetLevel {
    /// Exceeded at or above the limit, near it from 80% up.
    pub fn classify(spent: Decimal, limit: Decimal) -> Self {
        if limit <= Decimal::ZERO {
            return if spent > Decimal::ZERO {
                Self::Exceeded
            } else {
                Self::Ok
            };
        }
        if spent >= limit {
            Self::Exceeded
        } else if spent.saturating_mul(HUNDRED) >= limit.saturating_mul(NEAR_LIMIT_PERCENT) {
            Self::NearLimit
        } else {
            Self::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NearLimit => "near-limit",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    /// Utilization capped at 100, for progress display.
    pub percentage: Decimal,
    /// Uncapped utilization percent.
    pub utilization: Decimal,
    /// Limit minus spent; negative once exceeded.
    pub remaining: Decimal,
    pub level: BudgetLevel,
}

impl BudgetStatus {
    pub fn new(category: &str, spent: Decimal, limit: Decimal) -> Self {
        let utilization = percent_of(spent, limit);
        Self {
            category: category.to_string(),
            spent: round_display(spent),
            limit,
            percentage: round_display(utilization.min(HUNDRED)),
            utilization: round_display(utilization),
            remaining: round_display(limit.saturating_sub(spent)),
            level: BudgetLevel::classify(spent, limit),
        }
    }

    /// Warning line for categories at or near their limit.
    pub fn warning(&self) -> Option<String> {
        match self.level {
            BudgetLevel::Ok => None,
            BudgetLevel::NearLimit => Some(format!(
                "{} is near its limit: {} of {} left",
                self.category,
                format_amount(self.remaining),
                format_amount(self.limit)
            )),
            BudgetLevel::Exceeded => Some(format!(
                "{} is over budget by {}",
                self.category,
                format_amount(-self.remaining)
            )),
        }
    }
}

/// Totals across a set of budget rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    /// Zero when the total limit is zero.
    pub utilization: Decimal,
    pub ok: usize,
    pub near_limit: usize,
    pub exceeded: usize,
}

/// One row per spending category, highest spend first.
pub fn evaluate_budgets(totals: &[CategoryTotal], limits: &BudgetLimits) -> Vec<BudgetStatus> {
    let rows = totals
        .iter()
        .map(|t| BudgetStatus::new(&t.category, t.value, limits.limit_for(&t.category)))
        .collect();
    sort_by_spent(rows)
}

/// One row per configured bucket (and the default bucket), highest spend
/// first. Buckets with no spending still get a row.
pub fn evaluate_buckets(
    transactions: &[Transaction],
    table: &BucketTable,
    limits: &BudgetLimits,
) -> Vec<BudgetStatus> {
    let labels = table.labels();
    let mut spent = vec![Decimal::ZERO; labels.len()];

    for (label, txn) in table.resolve_batch(transactions) {
        if !txn.is_expense() {
            continue;
        }
        if let Some(slot) = labels.iter().position(|l| *l == label) {
            spent[slot] = spent[slot].saturating_add(txn.amount);
        }
    }

    let rows = labels
        .iter()
        .zip(spent)
        .map(|(label, spent)| BudgetStatus::new(label, spent, limits.limit_for(label)))
        .collect();
    sort_by_spent(rows)
}

pub fn budget_overview(rows: &[BudgetStatus]) -> BudgetOverview {
    let total_limit = saturating_sum(rows.iter().map(|r| r.limit));
    let total_spent = saturating_sum(rows.iter().map(|r| r.spent));
    let count = |level: BudgetLevel| rows.iter().filter(|r| r.level == level).count();

    BudgetOverview {
        total_limit,
        total_spent,
        utilization: round_display(percent_of(total_spent, total_limit)),
        ok: count(BudgetLevel::Ok),
        near_limit: count(BudgetLevel::NearLimit),
        exceeded: count(BudgetLevel::Exceeded),
    }
}

fn sort_by_spent(mut rows: Vec<BudgetStatus>) -> Vec<BudgetStatus> {
    rows.sort_by(|a, b| b.spent.cmp(&a.spent));
    for row in rows.iter().filter(|r| r.level == BudgetLevel::Exceeded) {
        tracing::debug!(category = %row.category, spent = %row.spent, limit = %row.limit, "budget exceeded");
    }
    rows
}
