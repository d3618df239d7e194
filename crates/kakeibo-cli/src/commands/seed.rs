//! Seed command implementation

use std::path::Path;

use anyhow::{Context, Result};
use kakeibo_core::{db::Database, seed_database};

pub fn cmd_seed(db_path: &Path, days: u32) -> Result<()> {
    println!("🔧 Seeding database at {}...", db_path.display());

    let passphrase = Database::passphrase_from_env();
    let written = seed_database(db_path, passphrase.as_deref(), days)
        .context("Failed to seed database")?;

    println!("   Generated {} transactions over {} days", written, days);
    if passphrase.is_some() {
        println!("   🔒 Encryption: ENABLED");
    } else {
        println!("   ⚠️  Encryption: DISABLED (set KAKEIBO_DB_KEY to enable)");
    }

    println!("✅ Database seeded successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Review the numbers: kakeibo summary");
    println!("  2. Start web UI: kakeibo serve");

    Ok(())
}
