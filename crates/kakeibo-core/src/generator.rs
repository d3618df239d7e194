//! Synthetic ledger generator
//!
//! Produces one record per day for a window ending today: a salary credit on
//! the first of the month, a random expense on every other day.

use std::ops::RangeInclusive;
use std::path::Path;

use chrono::{Datelike, Days, Local, NaiveDate};
use rand::Rng;
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Category, NewTransaction};

/// Number of days generated by default
pub const DEFAULT_DAYS: u32 = 30;

/// Salary credit range (inclusive)
pub const SALARY_RANGE: RangeInclusive<i64> = 250_000..=300_000;

/// Daily expense magnitude range (inclusive)
pub const EXPENSE_RANGE: RangeInclusive<i64> = 500..=10_000;

/// Generate `days` records ending at `today`, most recent first
pub fn generate_ledger<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    days: u32,
) -> Vec<NewTransaction> {
    let mut txs = Vec::with_capacity(days as usize);

    for offset in 0..days {
        let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };

        let tx = if date.day() == 1 {
            NewTransaction {
                date,
                amount: rng.gen_range(SALARY_RANGE) as f64,
                category: Category::Salary,
                description: Category::Salary.description().to_string(),
            }
        } else {
            let category = Category::EXPENSES[rng.gen_range(0..Category::EXPENSES.len())];
            NewTransaction {
                date,
                amount: -(rng.gen_range(EXPENSE_RANGE) as f64),
                category,
                description: category.description().to_string(),
            }
        };
        txs.push(tx);
    }

    txs
}

/// Drop and rebuild the database at `path` with a fresh synthetic ledger
///
/// Returns the number of rows written.
pub fn seed_database(path: impl AsRef<Path>, passphrase: Option<&str>, days: u32) -> Result<usize> {
    if days == 0 {
        return Err(Error::InvalidData("days must be at least 1".into()));
    }

    let today = Local::now().date_naive();
    let txs = generate_ledger(&mut rand::thread_rng(), today, days);

    let db = Database::create(path, passphrase)?;
    let written = db.insert_transactions(&txs)?;

    info!(rows = written, days, until = %today, "Seeded synthetic ledger");
    Ok(written)
}
