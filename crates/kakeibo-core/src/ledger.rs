//! In-memory ledger and the income/expense summary derived from it

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Category, Transaction};

/// The full set of transactions loaded for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Reduce the ledger to totals and a per-category expense breakdown
    pub fn summarize(&self) -> LedgerSummary {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut by_category: HashMap<Category, f64> = HashMap::new();

        for tx in &self.transactions {
            if tx.is_income() {
                total_income += tx.amount;
            } else if tx.is_expense() {
                let magnitude = -tx.amount;
                total_expense += magnitude;
                *by_category.entry(tx.category).or_insert(0.0) += magnitude;
            }
        }

        let mut breakdown: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();
        // Largest spend first; label breaks ties so the order never depends on hashing
        breakdown.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.label().cmp(b.category.label()))
        });

        LedgerSummary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
            breakdown,
        }
    }
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    /// Absolute value of the category's expenses
    pub amount: f64,
}

/// Aggregate figures embedded in the advice prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    /// Sum of positive amounts
    pub total_income: f64,
    /// Sum of absolute values of negative amounts
    pub total_expense: f64,
    pub balance: f64,
    /// Categories with no expense are omitted
    pub breakdown: Vec<CategoryTotal>,
}

/// Truncate a money figure toward zero for display
pub fn whole_amount(amount: f64) -> i64 {
    amount.trunc() as i64
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn tx(id: i64, amount: f64, category: Category) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Days::new(id as u64),
            amount,
            category,
            description: category.description().to_string(),
        }
    }

    #[test]
    fn test_income_and_single_expense() {
        let ledger = Ledger::new(vec![
            tx(1, 280000.0, Category::Salary),
            tx(2, -3000.0, Category::Food),
        ]);

        let summary = ledger.summarize();
        assert_eq!(summary.total_income, 280000.0);
        assert_eq!(summary.total_expense, 3000.0);
        assert_eq!(summary.balance, 277000.0);
        assert_eq!(
            summary.breakdown,
            vec![CategoryTotal {
                category: Category::Food,
                amount: 3000.0
            }]
        );
    }

    #[test]
    fn test_empty_ledger() {
        let summary = Ledger::default().summarize();
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn test_balance_equals_signed_sum_and_breakdown_sums_to_expense() {
        let ledger = Ledger::new(vec![
            tx(1, 260000.0, Category::Salary),
            tx(2, -4500.0, Category::Food),
            tx(3, -1200.0, Category::Transport),
            tx(4, -800.0, Category::Food),
            tx(5, -9999.0, Category::Insurance),
            tx(6, 1500.0, Category::Salary),
            tx(7, -3000.0, Category::Phone),
        ]);

        // Exact equality holds only for integral amounts; f64 sums of fractions drift
        let summary = ledger.summarize();
        let signed_sum: f64 = ledger.transactions().iter().map(|t| t.amount).sum();
        assert_eq!(summary.balance, signed_sum);

        let breakdown_sum: f64 = summary.breakdown.iter().map(|c| c.amount).sum();
        assert_eq!(breakdown_sum, summary.total_expense);
        assert_eq!(summary.total_expense, 19499.0);
    }

    #[test]
    fn test_fractional_amounts_balance_within_tolerance() {
        let ledger = Ledger::new(vec![
            tx(1, 0.3, Category::Salary),
            tx(2, -0.1, Category::Food),
            tx(3, 0.1, Category::Salary),
            tx(4, -0.1, Category::Transport),
        ]);

        let summary = ledger.summarize();
        let signed_sum: f64 = ledger.transactions().iter().map(|t| t.amount).sum();
        assert!((summary.balance - signed_sum).abs() < 1e-9);
        assert_eq!(whole_amount(summary.balance), 0);
    }

    #[test]
    fn test_breakdown_sorted_by_amount_then_label() {
        let ledger = Ledger::new(vec![
            tx(1, -1000.0, Category::Transport),
            tx(2, -5000.0, Category::Utilities),
            tx(3, -1000.0, Category::Entertainment),
            tx(4, -2000.0, Category::Food),
        ]);

        let order: Vec<Category> = ledger
            .summarize()
            .breakdown
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(
            order,
            vec![
                Category::Utilities,
                Category::Food,
                Category::Entertainment,
                Category::Transport,
            ]
        );
    }

    #[test]
    fn test_zero_amount_is_neither_income_nor_expense() {
        let ledger = Ledger::new(vec![tx(1, 0.0, Category::Food)]);
        let summary = ledger.summarize();
        assert_eq!(summary.total_expense, 0.0);
        assert!(summary.breakdown.is_empty());
    }

    #[test]
    fn test_whole_amount_truncates_toward_zero() {
        assert_eq!(whole_amount(1234.99), 1234);
        assert_eq!(whole_amount(-1234.99), -1234);
        assert_eq!(whole_amount(0.0), 0);
    }
}
