//! Advise command implementation

use anyhow::{Context, Result};
use kakeibo_core::{db::Database, AIBackend, Advisor};

pub async fn cmd_advise(db: &Database, advisor: &Advisor, question: Option<&str>) -> Result<()> {
    let ledger = db.load_ledger().context("Failed to load ledger")?;
    let question = question.filter(|q| !q.trim().is_empty());

    println!(
        "🤖 Asking {} at {}...",
        advisor.ai().model(),
        advisor.ai().host()
    );
    if let Some(q) = question {
        println!("   Question: {}", q);
    }
    println!();

    let reply = advisor
        .advise(&ledger, question)
        .await
        .context("Advice request failed")?;

    println!("{}", reply);

    Ok(())
}
