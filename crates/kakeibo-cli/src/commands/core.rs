//! Shared utilities for commands that read the ledger or call the advisor

use std::path::Path;

use anyhow::{Context, Result};
use kakeibo_core::{db::Database, AIClient, Advisor, AdvisorConfig, BackendKind};

/// Open an existing database, using `KAKEIBO_DB_KEY` as the passphrase if set
pub fn open_db(db_path: &Path) -> Result<Database> {
    let passphrase = Database::passphrase_from_env();
    Database::open(db_path, passphrase.as_deref()).with_context(|| {
        format!(
            "Failed to open database at {} (run `kakeibo seed` first)",
            db_path.display()
        )
    })
}

/// Build an advisor from the environment (`AI_BACKEND`, `OPENAI_*`)
pub fn build_advisor() -> Advisor {
    let config = AdvisorConfig::from_env();
    if config.backend == BackendKind::OpenAICompatible && config.api_key.is_none() {
        tracing::warn!("No OPENAI_COMPATIBLE_API_KEY or OPENAI_API_KEY set; advice requests will likely be rejected");
    }
    Advisor::new(AIClient::from_config(&config))
}
