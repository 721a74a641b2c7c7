#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::FinError;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(desc: &str, amount: Decimal, category: &str, on: NaiveDate) -> Expense {
    Expense::new(desc.into(), amount, category.into(), on)
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_store_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_expenses().unwrap().is_empty());
}

#[test]
fn test_reopen_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("fintrack.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_expense(&expense("Lunch", dec!(12.50), "Food and Drink", date(2024, 1, 5)))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    let all = db.get_expenses().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].amount, dec!(12.50));
}

#[test]
fn test_newer_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fintrack.db");
    Database::open(&path).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute("UPDATE schema_version SET version = 99", []).unwrap();
    drop(conn);

    let err = Database::open(&path).err().unwrap();
    assert!(format!("{err:#}").contains("newer than supported"));
}

// ── Expense CRUD ──────────────────────────────────────────────

#[test]
fn test_insert_and_list_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let a = db
        .insert_expense(&expense("Taxi", dec!(18), "Travel", date(2024, 1, 10)))
        .unwrap();
    let b = db
        .insert_expense(&expense("Coffee", dec!(4.25), "Food and Drink", date(2024, 2, 1)))
        .unwrap();
    let c = db
        .insert_expense(&expense("Snack", dec!(2), "Food and Drink", date(2024, 2, 1)))
        .unwrap();

    let all = db.get_expenses().unwrap();
    let ids: Vec<i64> = all.iter().map(|e| e.id.unwrap()).collect();
    assert_eq!(ids, vec![c, b, a]);
    assert_eq!(all[1].description, "Coffee");
    assert_eq!(all[1].date, date(2024, 2, 1));
}

#[test]
fn test_insert_rejects_invalid() {
    let db = Database::open_in_memory().unwrap();
    let err = db
        .insert_expense(&expense("  ", dec!(5), "Travel", date(2024, 1, 1)))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FinError>(),
        Some(FinError::InvalidExpense(_))
    ));
    assert!(db
        .insert_expense(&expense("Taxi", Decimal::ZERO, "Travel", date(2024, 1, 1)))
        .is_err());
    assert!(db.get_expenses().unwrap().is_empty());
}

#[test]
fn test_amount_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    db.insert_expense(&expense("Fuel", dec!(41.379), "Travel", date(2024, 3, 3)))
        .unwrap();
    assert_eq!(db.get_expenses().unwrap()[0].amount, dec!(41.379));
}

#[test]
fn test_delete_expense() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&expense("Taxi", dec!(18), "Travel", date(2024, 1, 10)))
        .unwrap();
    assert!(db.delete_expense(id).unwrap());
    assert!(!db.delete_expense(id).unwrap());
    assert!(db.get_expenses().unwrap().is_empty());
}
