//! Kakeibo CLI - AI budgeting advisor
//!
//! Usage:
//!   kakeibo seed                 Rebuild the database with synthetic data
//!   kakeibo summary --prompt     Show totals and the advice prompt
//!   kakeibo advise -q "..."      Ask for advice in the terminal
//!   kakeibo serve --port 8501    Start the web page

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    match cli.command {
        Commands::Seed { days } => commands::cmd_seed(&cli.db, days),
        Commands::Transactions => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_transactions(&db)
        }
        Commands::Summary {
            question,
            prompt,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            let advisor = commands::build_advisor();
            commands::cmd_summary(&db, &advisor, question.as_deref(), prompt, json)
        }
        Commands::Advise { question } => {
            let db = commands::open_db(&cli.db)?;
            let advisor = commands::build_advisor();
            commands::cmd_advise(&db, &advisor, question.as_deref()).await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, &host, port).await,
    }
}
