#![allow(clippy::unwrap_used)]

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::AccountType;

fn raw(id: &str, date: Option<&str>, amount: Option<serde_json::Value>) -> RawTransaction {
    RawTransaction {
        transaction_id: Some(serde_json::json!(id)),
        date: date.map(|d| serde_json::json!(d)),
        name: Some(serde_json::json!(format!("txn {id}"))),
        amount,
        category: None,
        account_id: None,
    }
}

// ── normalize ─────────────────────────────────────────────────

#[test]
fn test_normalize_keeps_valid_records_in_order() {
    let report = normalize(
        vec![
            raw("a", Some("2024-01-15"), Some(serde_json::json!(50))),
            raw("b", Some("2024-01-20"), Some(serde_json::json!(-30.25))),
        ],
        false,
    );
    assert!(report.skipped.is_empty());
    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.transactions[0].id, "a");
    assert_eq!(report.transactions[0].amount, dec!(50));
    assert_eq!(report.transactions[1].amount, dec!(-30.25));
    assert_eq!(
        report.transactions[1].date,
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    );
}

#[test]
fn test_normalize_skips_missing_amount_and_date() {
    let report = normalize(
        vec![
            raw("ok", Some("2024-01-15"), Some(serde_json::json!(10))),
            raw("no-amount", Some("2024-01-15"), None),
            raw("null-amount", Some("2024-01-15"), Some(serde_json::Value::Null)),
            raw("no-date", None, Some(serde_json::json!(10))),
            raw("bad-date", Some("someday"), Some(serde_json::json!(10))),
            raw("bad-amount", Some("2024-01-15"), Some(serde_json::json!("ten"))),
        ],
        false,
    );
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.skipped.len(), 5);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].id.as_deref(), Some("no-amount"));
    assert_eq!(report.skipped[0].reason, "missing amount");
    assert_eq!(report.skipped[2].reason, "missing date");
}

#[test]
fn test_normalize_skips_wrong_typed_fields() {
    let mut numeric_date = raw("n", None, Some(serde_json::json!(5)));
    numeric_date.date = Some(serde_json::json!(20240116));
    let mut object_category = raw("o", Some("2024-01-16"), Some(serde_json::json!(5)));
    object_category.category = Some(serde_json::json!({"name": "Travel"}));

    let report = normalize(
        vec![
            raw("ok", Some("2024-01-15"), Some(serde_json::json!(10))),
            numeric_date,
            object_category,
        ],
        false,
    );
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.skipped[0].reason, "unparseable date: 20240116");
    assert_eq!(report.skipped[0].id.as_deref(), Some("n"));
    assert!(report.skipped[1].reason.starts_with("unparseable category"));
}

#[test]
fn test_normalize_wraps_single_category_string() {
    let mut record = raw("s", Some("2024-01-16"), Some(serde_json::json!(5)));
    record.category = Some(serde_json::json!("Travel"));
    let report = normalize(vec![record], false);
    assert_eq!(report.transactions[0].category, vec!["Travel"]);
}

#[test]
fn test_normalize_rejects_out_of_range_amount() {
    let report = normalize(
        vec![
            raw("big", Some("2024-01-15"), Some(serde_json::json!("79228162514264337593543950335"))),
            raw("ok", Some("2024-01-15"), Some(serde_json::json!(1))),
        ],
        false,
    );
    assert_eq!(report.transactions.len(), 1);
    assert!(report.skipped[0].reason.starts_with("amount out of range"));
}

#[test]
fn test_normalize_negate_flips_sign() {
    let report = normalize(
        vec![raw("a", Some("2024-01-15"), Some(serde_json::json!(-12.5)))],
        true,
    );
    assert_eq!(report.transactions[0].amount, dec!(12.5));
    assert!(report.transactions[0].is_expense());
}

#[test]
fn test_normalize_string_amount_and_positional_id() {
    let mut record = raw("", Some("01/15/2024"), Some(serde_json::json!("$1,200.00")));
    record.category = Some(serde_json::json!([" Travel ", "", "Taxi"]));
    let report = normalize(vec![record], false);
    let txn = &report.transactions[0];
    assert_eq!(txn.id, "feed-0");
    assert_eq!(txn.amount, dec!(1200));
    assert_eq!(txn.category, vec!["Travel", "Taxi"]);
}

#[test]
fn test_parse_date_accepts_timestamps() {
    assert_eq!(
        parse_date("2024-03-01T12:30:00Z"),
        NaiveDate::from_ymd_opt(2024, 3, 1)
    );
    assert_eq!(parse_date("nope"), None);
}

// ── JSON feed ─────────────────────────────────────────────────

#[test]
fn test_parse_json_bare_array() {
    let data = r#"[
        {"transaction_id": "t1", "date": "2024-01-15", "name": "Cafe", "amount": 4.33, "category": ["Food and Drink", "Coffee Shop"]},
        {"transaction_id": "t2", "date": "2024-01-16", "name": "Payroll", "amount": -2500}
    ]"#;
    let report = parse_json(data, false).unwrap();
    assert_eq!(report.transactions.len(), 2);
    assert!(report.accounts.is_empty());
    assert_eq!(report.transactions[0].amount, dec!(4.33));
    assert_eq!(report.transactions[0].primary_category(), "Food and Drink");
    assert_eq!(report.transactions[1].primary_category(), "Other");
}

#[test]
fn test_parse_json_exchange_response_with_accounts() {
    let data = r#"{
        "success": true,
        "transactions": [
            {"transaction_id": "t1", "account_id": "acc1", "date": "2024-01-15", "name": "Uber", "amount": 6.33, "category": ["Travel", "Taxi"]},
            {"transaction_id": "t2", "date": "2024-01-16", "name": "Broken"}
        ],
        "accounts": [
            {"account_id": "acc1", "name": "Plaid Checking", "type": "depository", "balances": {"current": 110}},
            {"account_id": "acc2", "name": "Plaid Credit Card", "type": "credit", "balances": {"current": null}}
        ]
    }"#;
    let report = parse_json(data, false).unwrap();
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.transactions[0].account_id.as_deref(), Some("acc1"));

    assert_eq!(report.accounts.len(), 2);
    assert_eq!(report.accounts[0].account_type, AccountType::Depository);
    assert_eq!(report.accounts[0].balance, Some(dec!(110)));
    assert_eq!(report.accounts[1].account_type, AccountType::Credit);
    assert_eq!(report.accounts[1].balance, None);
}

#[test]
fn test_parse_json_keeps_good_records_beside_bad_ones() {
    let data = r#"[
        {"transaction_id": "t1", "date": "2024-01-15", "name": "Coffee", "amount": 4.5, "category": ["Food and Drink"]},
        {"transaction_id": "t2", "date": 20240116, "name": "Taxi", "amount": 12},
        {"transaction_id": "t3", "date": "2024-01-17", "name": "Flight", "amount": 300, "category": "Travel"},
        42
    ]"#;
    let report = parse_json(data, false).unwrap();
    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.transactions[1].primary_category(), "Travel");
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].reason, "unparseable date: 20240116");
    assert_eq!(report.skipped[1].index, 3);
    assert!(report.skipped[1].reason.starts_with("not a transaction object"));
}

#[test]
fn test_parse_json_drops_malformed_account_only() {
    let data = r#"{
        "transactions": [{"transaction_id": "t1", "date": "2024-01-15", "amount": 5}],
        "accounts": [
            {"account_id": "acc1", "name": "Checking", "type": "depository", "balances": {"current": 110}},
            "not an account"
        ]
    }"#;
    let report = parse_json(data, false).unwrap();
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.accounts.len(), 1);
    assert_eq!(report.accounts[0].id, "acc1");
}

#[test]
fn test_parse_json_rejects_garbage() {
    assert!(parse_json("not json", false).is_err());
    assert!(parse_json("42", false).is_err());
}

#[test]
fn test_load_feed_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("feed.json");
    std::fs::write(
        &json_path,
        r#"[{"transaction_id": "t1", "date": "2024-01-15", "amount": 5}]"#,
    )
    .unwrap();
    assert_eq!(load_feed(&json_path, false).unwrap().transactions.len(), 1);

    let csv_path = dir.path().join("feed.CSV");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "Date,Name,Amount,Category").unwrap();
    writeln!(file, "2024-01-15,Cafe,4.50,Food and Drink").unwrap();
    drop(file);
    let report = load_feed(&csv_path, false).unwrap();
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.transactions[0].amount, dec!(4.50));
}

#[test]
fn test_load_json_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_json(&dir.path().join("missing.json"), false).is_err());
}
