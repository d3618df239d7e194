//! Transaction operations

use rusqlite::{params, types::Type};

use super::Database;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{Category, NewTransaction, Transaction};

impl Database {
    /// Insert a single transaction, returning its new id
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO transactions (date, amount, type, description) VALUES (?, ?, ?, ?)",
            params![
                tx.date.format("%Y-%m-%d").to_string(),
                tx.amount,
                tx.category.as_str(),
                tx.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert many transactions in one SQLite transaction
    ///
    /// Either every row lands or none do.
    pub fn insert_transactions(&self, txs: &[NewTransaction]) -> Result<usize> {
        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;

        {
            let mut stmt = db_tx.prepare(
                "INSERT INTO transactions (date, amount, type, description) VALUES (?, ?, ?, ?)",
            )?;
            for tx in txs {
                stmt.execute(params![
                    tx.date.format("%Y-%m-%d").to_string(),
                    tx.amount,
                    tx.category.as_str(),
                    tx.description,
                ])?;
            }
        }

        db_tx.commit()?;
        Ok(txs.len())
    }

    /// List every transaction, ordered by id
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, date, amount, type, description FROM transactions ORDER BY id")?;

        let transactions = stmt
            .query_map([], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Load the full ledger for a session
    pub fn load_ledger(&self) -> Result<Ledger> {
        Ok(Ledger::new(self.list_transactions()?))
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to Transaction
    /// Column order: id, date, amount, type, description
    ///
    /// Unparseable dates and unknown categories are conversion failures, not defaults.
    /// A NULL amount loads as 0.0, which counts as neither income nor expense.
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(1)?;
        let category_str: String = row.get(3)?;
        let amount: Option<f64> = row.get(2)?;
        let description: Option<String> = row.get(4)?;

        let date = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
        let category: Category = category_str
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;

        Ok(Transaction {
            id: row.get(0)?,
            date,
            amount: amount.unwrap_or(0.0),
            category,
            description: description.unwrap_or_default(),
        })
    }
}
