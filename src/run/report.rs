//! Plain-text rendering of the derived views for the CLI.

use fintrack::aggregate::{BalanceSource, CategoryTotal, MonthlyBucket, Summary};
use fintrack::budget::{budget_overview, BudgetStatus};
use fintrack::feed::SkippedRecord;
use fintrack::models::{Account, Expense, Transaction};
use fintrack::view::{format_amount, format_percent, progress_bar, truncate};

const RULE_WIDTH: usize = 60;
const BAR_WIDTH: usize = 20;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

pub(crate) fn summary(summary: &Summary) -> String {
    let balance_note = match summary.balance_source {
        BalanceSource::Accounts => "",
        BalanceSource::TransactionProxy => " (estimated from transactions)",
    };

    [
        format!("Overview: {}", summary.month),
        rule(),
        format!("  Total spending:   {}", format_amount(summary.total_spending)),
        format!("  Total income:     {}", format_amount(summary.total_income)),
        format!("  Avg. expense:     {}", format_amount(summary.average_transaction)),
        format!("  Transactions:     {}", summary.transaction_count),
        format!("  Month spending:   {}", format_amount(summary.monthly_spending)),
        format!("  Month income:     {}", format_amount(summary.monthly_income)),
        format!("  Month savings:    {}", format_amount(summary.monthly_savings)),
        format!(
            "  Total balance:    {}{balance_note}",
            format_amount(summary.total_balance)
        ),
    ]
    .join("\n")
}

/// Linked accounts. Credit and loan balances are amounts owed.
pub(crate) fn accounts(accounts: &[Account]) -> String {
    let mut lines = vec![
        format!("{:<28} {:<12} {:>14}", "Account", "Type", "Balance"),
        rule(),
    ];
    lines.extend(accounts.iter().map(|a| {
        let balance = match a.balance {
            Some(b) if a.account_type.is_credit() => format!("{} owed", format_amount(b)),
            Some(b) => format_amount(b),
            None => "n/a".into(),
        };
        format!("{:<28} {:<12} {:>14}", truncate(&a.name, 28), a.account_type.as_str(), balance)
    }));
    lines.join("\n")
}

pub(crate) fn monthly(buckets: &[MonthlyBucket]) -> String {
    if buckets.is_empty() {
        return "No transactions".into();
    }
    let mut lines = vec![
        format!("{:<10} {:>14} {:>14} {:>14} {:>6}", "Month", "Spending", "Income", "Net", "Txns"),
        rule(),
    ];
    lines.extend(buckets.iter().map(|b| {
        format!(
            "{:<10} {:>14} {:>14} {:>14} {:>6}",
            b.month.to_string(),
            format_amount(b.spending),
            format_amount(b.income),
            format_amount(b.net()),
            b.transaction_count
        )
    }));
    lines.join("\n")
}

pub(crate) fn categories(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return "No spending".into();
    }
    let mut lines = vec![
        format!("{:<24} {:>14} {:>8} {:>6}", "Category", "Spent", "Share", "Txns"),
        rule(),
    ];
    lines.extend(totals.iter().map(|t| {
        format!(
            "{:<24} {:>14} {:>8} {:>6}",
            truncate(&t.category, 24),
            format_amount(t.value),
            format_percent(t.percentage_of_total),
            t.count
        )
    }));
    lines.join("\n")
}

/// Budget table, overall totals, then a warning per category at or over
/// its limit.
pub(crate) fn budgets(rows: &[BudgetStatus]) -> String {
    if rows.is_empty() {
        return "No budgets to show".into();
    }
    let mut lines = vec![
        format!(
            "{:<20} {:>12} {:>12} {:<22} {:>8}",
            "Budget", "Spent", "Limit", "Progress", "Used"
        ),
        rule(),
    ];
    lines.extend(rows.iter().map(|r| {
        format!(
            "{:<20} {:>12} {:>12} {:<22} {:>8}",
            truncate(&r.category, 20),
            format_amount(r.spent),
            format_amount(r.limit),
            progress_bar(r.percentage, BAR_WIDTH),
            format_percent(r.utilization)
        )
    }));

    let overview = budget_overview(rows);
    lines.push(rule());
    lines.push(format!(
        "Total: {} of {} ({}), {} ok, {} near limit, {} exceeded",
        format_amount(overview.total_spent),
        format_amount(overview.total_limit),
        format_percent(overview.utilization),
        overview.ok,
        overview.near_limit,
        overview.exceeded
    ));

    let warnings: Vec<String> = rows.iter().filter_map(BudgetStatus::warning).collect();
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.extend(warnings.into_iter().map(|w| format!("! {w}")));
    }
    lines.join("\n")
}

pub(crate) fn transactions(txns: &[&Transaction]) -> String {
    if txns.is_empty() {
        return "No matching transactions".into();
    }
    let mut lines = vec![
        format!("{:<10}  {:<28} {:<20} {:>12}", "Date", "Name", "Category", "Amount"),
        rule(),
    ];
    lines.extend(txns.iter().map(|t| {
        format!(
            "{:<10}  {:<28} {:<20} {:>12}",
            t.date.format("%Y-%m-%d").to_string(),
            truncate(&t.name, 28),
            truncate(t.primary_category(), 20),
            format_amount(t.amount)
        )
    }));
    lines.join("\n")
}

pub(crate) fn expenses(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses".into();
    }
    let mut lines = vec![
        format!("{:<5} {:<10}  {:<28} {:<18} {:>12}", "ID", "Date", "Description", "Category", "Amount"),
        rule(),
    ];
    lines.extend(expenses.iter().map(|e| {
        format!(
            "{:<5} {:<10}  {:<28} {:<18} {:>12}",
            e.id.unwrap_or(0),
            e.date.format("%Y-%m-%d").to_string(),
            truncate(&e.description, 28),
            truncate(&e.category, 18),
            format_amount(e.amount)
        )
    }));
    lines.join("\n")
}

pub(crate) fn skipped(records: &[SkippedRecord]) -> String {
    let mut lines = vec![format!("Skipped {} malformed record(s):", records.len())];
    lines.extend(records.iter().map(|r| {
        format!(
            "  #{} {}: {}",
            r.index,
            r.id.as_deref().unwrap_or("(no id)"),
            r.reason
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
