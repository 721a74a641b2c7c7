//! Local store for manually entered expenses.

mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::Expense;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let db = Self { conn };
        db.migrate().context("Failed to prepare database schema")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Create the schema on a fresh file. A store written by a newer
    /// version is refused rather than guessed at.
    fn migrate(&self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created expense store");
            return Ok(());
        }

        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Expense store has no schema version")?;
        if version > schema::CURRENT_VERSION {
            anyhow::bail!(
                "Expense store schema v{version} is newer than supported v{}",
                schema::CURRENT_VERSION
            );
        }
        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Validate and store an expense, returning its new id.
    pub fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        expense.validate()?;
        self.conn.execute(
            "INSERT INTO expenses (description, amount, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.description.trim(),
                expense.amount.to_string(),
                expense.category.trim(),
                expense.date.format(DATE_FORMAT).to_string(),
                chrono::Local::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, category = %expense.category, amount = %expense.amount, "saved expense");
        Ok(id)
    }

    /// All stored expenses, newest first.
    pub fn get_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, amount, category, date
             FROM expenses ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            let amount_str: String = row.get(2)?;
            let date_str: String = row.get(4)?;
            let amount = Decimal::from_str(&amount_str).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?;
            let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
            })?;
            Ok(Expense {
                id: Some(row.get(0)?),
                description: row.get(1)?,
                amount,
                category: row.get(3)?,
                date,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read expenses")
    }

    /// Returns `false` when no expense had that id.
    pub fn delete_expense(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if deleted == 0 {
            tracing::warn!(id, "no expense to delete");
        }
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests;
