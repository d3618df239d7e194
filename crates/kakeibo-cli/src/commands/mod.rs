//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db, build_advisor)
//! - `seed` - Rebuild the database with a synthetic ledger
//! - `ledger` - Transaction listing and summary output
//! - `advise` - One-shot advice in the terminal
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod advise;
pub mod core;
pub mod ledger;
pub mod prompts;
pub mod seed;
pub mod serve;

// Re-export command functions for main.rs
pub use advise::*;
pub use core::*;
pub use ledger::*;
pub use prompts::*;
pub use seed::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
