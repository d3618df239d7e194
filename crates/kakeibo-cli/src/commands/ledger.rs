//! Ledger command implementations (transactions, summary)

use anyhow::{Context, Result};
use kakeibo_core::ledger::whole_amount;
use kakeibo_core::{db::Database, Advisor};

use super::truncate;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Colour an amount red for expenses and green for income
fn colored_amount(amount: f64, width: usize) -> String {
    let color = if amount < 0.0 { RED } else { GREEN };
    format!("{}{:>width$}{}", color, whole_amount(amount), RESET, width = width)
}

pub fn cmd_transactions(db: &Database) -> Result<()> {
    let transactions = db.list_transactions().context("Failed to load transactions")?;

    if transactions.is_empty() {
        println!("No transactions found. Run `kakeibo seed` to generate some.");
        return Ok(());
    }

    println!(
        "{:<10}  {:<16}  {:<40}  {:>10}",
        "DATE", "CATEGORY", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "─".repeat(82));

    for tx in &transactions {
        println!(
            "{:<10}  {:<16}  {:<40}  {}",
            tx.date.format("%Y-%m-%d"),
            tx.category.label(),
            truncate(&tx.description, 40),
            colored_amount(tx.amount, 10),
        );
    }

    println!("{}", "─".repeat(82));
    println!("{} transactions", transactions.len());

    Ok(())
}

pub fn cmd_summary(
    db: &Database,
    advisor: &Advisor,
    question: Option<&str>,
    show_prompt: bool,
    json: bool,
) -> Result<()> {
    let ledger = db.load_ledger().context("Failed to load ledger")?;
    let summary = ledger.summarize();
    let prompt = if show_prompt {
        Some(advisor.prompt(&ledger, question)?)
    } else {
        None
    };

    if json {
        let mut value = serde_json::to_value(&summary)?;
        if let (Some(prompt), Some(obj)) = (&prompt, value.as_object_mut()) {
            obj.insert("prompt".into(), serde_json::to_value(prompt)?);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("📊 Ledger summary ({} transactions)", ledger.len());
    println!("{}", "─".repeat(40));
    println!("   Income:   {} yen", colored_amount(summary.total_income, 10));
    println!("   Expense:  {} yen", colored_amount(-summary.total_expense, 10));
    println!("   Balance:  {} yen", colored_amount(summary.balance, 10));
    println!();

    if summary.breakdown.is_empty() {
        println!("   No expenses recorded.");
    } else {
        println!("   Expense breakdown:");
        for item in &summary.breakdown {
            println!(
                "   {:<16} {:>10} yen",
                item.category.label(),
                whole_amount(item.amount)
            );
        }
    }

    if let Some(prompt) = prompt {
        println!();
        println!("📝 Advice prompt");
        println!("{}", "─".repeat(40));
        println!("[system]");
        println!("{}", prompt.system);
        println!();
        println!("[user]");
        println!("{}", prompt.user);
    }

    Ok(())
}
