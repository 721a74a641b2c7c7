use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use fintrack::aggregate::{aggregate_by_category, in_month, YearMonth};
use fintrack::browse::{recent, SortDirection, SortKey, TransactionQuery};
use fintrack::config::{self, Config};
use fintrack::db::Database;
use fintrack::feed;
use fintrack::models::Expense;
use fintrack::session::Session;

use super::report;

const RECENT_COUNT: usize = 5;

pub(crate) fn as_cli(args: &[String]) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..]),
        "monthly" | "m" => cli_monthly(&args[2..]),
        "categories" | "c" => cli_categories(&args[2..]),
        "budgets" | "b" => cli_budgets(&args[2..]),
        "transactions" | "t" => cli_transactions(&args[2..]),
        "expense" | "e" => cli_expense(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("fintrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("fintrack - spending, trends and budgets from a bank transaction feed");
    println!();
    println!("Usage: fintrack <command> [args]");
    println!();
    println!("Feed commands (<feed> is a JSON export, or .csv):");
    println!("  summary <feed>                Overview figures for the current month");
    println!("  monthly <feed>                Spending and income per month");
    println!("  categories <feed>             Spending per category");
    println!("    --month <YYYY-MM>           Only this month");
    println!("  budgets <feed>                Budget progress per category");
    println!("    --buckets                   Group categories into budget buckets");
    println!("    --limit <Category=Amount>   Override a limit (repeatable)");
    println!("  transactions <feed>           List transactions, newest first");
    println!("    --search <text>             Match name or category");
    println!("    --category <name>           Only this primary category");
    println!("    --sort <date|amount>        Sort key (default: date)");
    println!("    --asc, --desc               Sort direction (default: desc)");
    println!("    --limit <n>                 Show at most n rows");
    println!("  Common flags:");
    println!("    --negate                    Flip signs (feeds where negative = expense)");
    println!("    --with-expenses             Include manually entered expenses");
    println!();
    println!("Expense commands:");
    println!("  expense add <description> <amount> <category> [--date YYYY-MM-DD]");
    println!("  expense list");
    println!("  expense delete <id>");
    println!();
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Config: ${} or the platform config dir. Logs: RUST_LOG.", config::CONFIG_ENV);
}

// ── Feed commands ────────────────────────────────────────────

fn cli_summary(args: &[String]) -> Result<()> {
    let session = load_session(args)?;
    let today = chrono::Local::now().date_naive();
    println!("{}", report::summary(&session.summary(today)));

    if !session.accounts().is_empty() {
        println!();
        println!("{}", report::accounts(session.accounts()));
    }

    let latest = recent(session.transactions(), RECENT_COUNT);
    if !latest.is_empty() {
        println!();
        println!("Recent transactions:");
        println!("{}", report::transactions(&latest));
    }
    Ok(())
}

fn cli_monthly(args: &[String]) -> Result<()> {
    let session = load_session(args)?;
    println!("{}", report::monthly(&session.monthly()));
    Ok(())
}

fn cli_categories(args: &[String]) -> Result<()> {
    let session = load_session(args)?;
    let totals = match flag_value(args, "--month") {
        Some(m) => {
            let month = YearMonth::from_str(m)?;
            println!("Spending for {month}");
            aggregate_by_category(&in_month(session.transactions(), month))
        }
        None => session.by_category(),
    };
    println!("{}", report::categories(&totals));
    Ok(())
}

fn cli_budgets(args: &[String]) -> Result<()> {
    let mut session = load_session(args)?;

    for spec in flag_values(args, "--limit") {
        let (category, amount) = spec
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected --limit <Category=Amount>, got '{spec}'"))?;
        session.update_limit_str(category.trim(), amount)?;
    }

    let rows = if has_flag(args, "--buckets") {
        session.bucket_budgets()
    } else {
        session.budgets()
    };
    println!("{}", report::budgets(&rows));
    Ok(())
}

fn cli_transactions(args: &[String]) -> Result<()> {
    let session = load_session(args)?;

    let sort = match flag_value(args, "--sort") {
        Some(s) => SortKey::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown sort key '{s}', expected date or amount"))?,
        None => SortKey::default(),
    };
    let direction = if has_flag(args, "--asc") {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };
    let limit = flag_value(args, "--limit")
        .map(|n| n.parse::<usize>().with_context(|| format!("Invalid --limit '{n}'")))
        .transpose()?;

    let query = TransactionQuery {
        search: flag_value(args, "--search").map(str::to_string),
        category: flag_value(args, "--category").map(str::to_string),
        sort,
        direction,
    };

    let mut rows = query.apply(session.transactions());
    if let Some(n) = limit {
        rows.truncate(n);
    }
    println!("{}", report::transactions(&rows));
    Ok(())
}

/// Build a session from the feed named by the first argument, with the
/// configured budget table.
fn load_session(args: &[String]) -> Result<Session> {
    let feed_arg = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| anyhow::anyhow!("Missing feed file argument"))?;
    let path = PathBuf::from(shellexpand(feed_arg));
    if !path.exists() {
        anyhow::bail!("File not found: {feed_arg}");
    }

    let config = Config::load(&Config::path()?)?;
    let mut session = Session::new(config.to_budget_limits(), config.bucket_table());

    let report = feed::load_feed(&path, has_flag(args, "--negate"))?;
    if !report.skipped.is_empty() {
        eprintln!("{}", report::skipped(&report.skipped));
    }
    session.connect(report);

    if has_flag(args, "--with-expenses") {
        let db = open_db()?;
        session.merge_expenses(&db.get_expenses()?);
    }
    Ok(session)
}

// ── Expense commands ─────────────────────────────────────────

fn cli_expense(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("add") => cli_expense_add(&args[1..]),
        Some("list" | "ls") => {
            let db = open_db()?;
            println!("{}", report::expenses(&db.get_expenses()?));
            Ok(())
        }
        Some("delete" | "rm") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Usage: fintrack expense delete <id>"))?;
            let id: i64 = id.parse().with_context(|| format!("Invalid expense id '{id}'"))?;
            let db = open_db()?;
            if !db.delete_expense(id)? {
                anyhow::bail!("No expense with id {id}");
            }
            println!("Deleted expense #{id}");
            Ok(())
        }
        _ => anyhow::bail!("Usage: fintrack expense <add|list|delete> ..."),
    }
}

fn cli_expense_add(args: &[String]) -> Result<()> {
    let positional = positional_args(args, &["--date"]);
    let &[description, amount, category] = positional.as_slice() else {
        anyhow::bail!("Usage: fintrack expense add <description> <amount> <category> [--date YYYY-MM-DD]");
    };

    let amount = parse_amount(amount)?;
    let expense = match flag_value(args, "--date") {
        Some(d) => {
            let date = NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{d}', expected YYYY-MM-DD"))?;
            Expense::new(description.into(), amount, category.into(), date)
        }
        None => Expense::today(description.into(), amount, category.into()),
    };

    let db = open_db()?;
    let id = db.insert_expense(&expense)?;
    println!(
        "Saved expense #{id}: {} {} ({})",
        expense.description.trim(),
        fintrack::view::format_amount(expense.amount),
        expense.category.trim()
    );
    Ok(())
}

fn open_db() -> Result<Database> {
    Database::open(&config::db_path()?)
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn flag_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor the values of `value_flags`.
fn positional_args<'a>(args: &'a [String], value_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if value_flags.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().replace(['$', ','], "");
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount '{s}'"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
