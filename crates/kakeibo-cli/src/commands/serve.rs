//! Server command implementation

use std::path::Path;

use anyhow::Result;
use kakeibo_core::AIBackend;

use super::{build_advisor, open_db};

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16) -> Result<()> {
    let db = open_db(db_path)?;
    let advisor = build_advisor();

    println!("🚀 Starting Kakeibo web server...");
    println!("   Database: {}", db.path().display());
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Advice model: {} ({})",
        advisor.ai().model(),
        advisor.ai().host()
    );
    if host != "127.0.0.1" && host != "localhost" {
        println!();
        println!("   ⚠️  No authentication - do not expose to an untrusted network!");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    kakeibo_server::serve(db, advisor, host, port).await?;

    Ok(())
}
