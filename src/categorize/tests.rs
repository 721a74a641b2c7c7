#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::Transaction;

fn make_txn(category: &[&str]) -> Transaction {
    Transaction::new(
        "t",
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        "Test",
        dec!(10.00),
    )
    .with_category(category.iter().copied())
}

fn table(buckets: Vec<BudgetBucket>) -> BucketTable {
    BucketTable::new(&buckets, "Other")
}

// ── resolve ───────────────────────────────────────────────────

#[test]
fn test_resolve_substring_match() {
    let t = table(vec![
        BudgetBucket::new("Food and Drink", ["food"]),
        BudgetBucket::new("Travel", ["travel", "taxi"]),
    ]);
    assert_eq!(t.resolve(&make_txn(&["Food and Drink", "Restaurants"])), "Food and Drink");
    assert_eq!(t.resolve(&make_txn(&["Travel", "Taxi"])), "Travel");
}

#[test]
fn test_resolve_case_insensitive() {
    let t = table(vec![BudgetBucket::new("Food", ["FOOD"])]);
    assert_eq!(t.resolve(&make_txn(&["fast food"])), "Food");
    assert_eq!(t.resolve(&make_txn(&["SEAFOOD"])), "Food");
}

#[test]
fn test_resolve_matches_any_category_entry() {
    let t = table(vec![BudgetBucket::new("Travel", ["taxi"])]);
    assert_eq!(t.resolve(&make_txn(&["Service", "Taxi"])), "Travel");
}

#[test]
fn test_resolve_first_bucket_wins() {
    let t = table(vec![
        BudgetBucket::new("Shops", ["shop"]),
        BudgetBucket::new("Coffee", ["coffee shop"]),
    ]);
    // "shop" comes first in the table, even though "coffee shop" is more specific
    assert_eq!(t.resolve(&make_txn(&["Coffee Shop"])), "Shops");
}

#[test]
fn test_resolve_no_match_uses_default() {
    let t = table(vec![BudgetBucket::new("Travel", ["travel"])]);
    assert_eq!(t.resolve(&make_txn(&["Healthcare"])), "Other");
}

#[test]
fn test_resolve_missing_category_uses_default() {
    let t = BucketTable::default();
    assert_eq!(t.resolve(&make_txn(&[])), "Other");
}

#[test]
fn test_empty_keywords_never_match() {
    let t = table(vec![BudgetBucket::new("Everything", ["", "  "])]);
    assert_eq!(t.resolve(&make_txn(&["Shops"])), "Other");
}

#[test]
fn test_empty_table() {
    let t = table(vec![]);
    assert_eq!(t.resolve(&make_txn(&["Food"])), "Other");
    assert_eq!(t.labels(), vec!["Other"]);
}

#[test]
fn test_blank_default_label_falls_back_to_other() {
    let t = BucketTable::new(&[], " ");
    assert_eq!(t.default_label(), "Other");
}

// ── default table ─────────────────────────────────────────────

#[test]
fn test_default_table_buckets() {
    let t = BucketTable::default();
    assert_eq!(
        t.labels(),
        vec!["Payment", "Transfer", "Food and Drink", "Travel", "Other"]
    );
    assert_eq!(t.resolve(&make_txn(&["Payment", "Credit Card"])), "Payment");
    assert_eq!(t.resolve(&make_txn(&["Transfer", "Debit"])), "Transfer");
    assert_eq!(t.resolve(&make_txn(&["Food and Drink", "Restaurants"])), "Food and Drink");
    assert_eq!(t.resolve(&make_txn(&["Travel", "Airlines and Aviation Services"])), "Travel");
    assert_eq!(t.resolve(&make_txn(&["Recreation", "Gyms"])), "Other");
}

#[test]
fn test_labels_do_not_duplicate_default() {
    let t = BucketTable::new(&[BudgetBucket::new("Other", ["misc"])], "Other");
    assert_eq!(t.labels(), vec!["Other"]);
}

// ── resolve_batch ─────────────────────────────────────────────

#[test]
fn test_resolve_batch_keeps_order() {
    let t = BucketTable::default();
    let txns = vec![make_txn(&["Travel"]), make_txn(&[]), make_txn(&["Food and Drink"])];
    let labels: Vec<&str> = t.resolve_batch(&txns).into_iter().map(|(l, _)| l).collect();
    assert_eq!(labels, vec!["Travel", "Other", "Food and Drink"]);
}
