//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kakeibo_core::db::DEFAULT_DB_PATH;

/// Kakeibo - AI budgeting advisor over a synthetic household ledger
#[derive(Parser)]
#[command(name = "kakeibo")]
#[command(about = "Household ledger with AI budgeting advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    ///
    /// Set KAKEIBO_DB_KEY to encrypt the database with SQLCipher.
    #[arg(long, default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop and rebuild the database with synthetic transactions
    Seed {
        /// Number of days to generate, ending today
        #[arg(short, long, default_value = "30")]
        days: u32,
    },

    /// Print every transaction in the ledger
    Transactions,

    /// Print income, expense, balance and the expense breakdown
    Summary {
        /// Question to append when printing the prompt
        #[arg(short, long)]
        question: Option<String>,

        /// Also print the advice prompt that would be sent
        #[arg(long)]
        prompt: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the advice endpoint once and print the reply
    Advise {
        /// Follow-up question to ask instead of general advice
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Manage the advice prompt template
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web page and JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List prompts and their override status
    List,

    /// Show a prompt's content
    Show {
        /// Prompt ID (e.g., budget_advice)
        id: String,
    },

    /// Print the override directory
    Path,
}
