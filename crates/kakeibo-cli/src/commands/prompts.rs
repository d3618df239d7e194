//! Prompt template commands (list, show, path)

use anyhow::Result;
use kakeibo_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

fn override_dir_display() -> String {
    default_prompts_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not available)".to_string())
}

pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();

    println!("📝 Prompt templates\n");
    println!("{:<20} {:>7}  {}", "ID", "VERSION", "SOURCE");
    println!("{}", "─".repeat(50));

    for info in library.list() {
        let source = match info.override_path {
            Some(ref path) => format!("✓ Override ({})", path.display()),
            None => "Embedded".to_string(),
        };
        println!("{:<20} {:>7}  {}", info.id, info.version, source);
    }

    println!();
    println!("Override directory: {}", override_dir_display());
    println!("Copy `kakeibo prompts show budget_advice` output there as budget_advice.md");
    println!("and keep its {{{{placeholders}}}}; the server picks it up on restart.");

    Ok(())
}

/// Print a template with its metadata
///
/// Unknown ids print the available list instead of failing.
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let Ok(id) = prompt_id.parse::<PromptId>() else {
        eprintln!("⚠️  Unknown prompt ID: {}", prompt_id);
        eprintln!();
        eprintln!("Available prompts:");
        for id in PromptId::all() {
            eprintln!("  - {}", id.as_str());
        }
        return Ok(());
    };

    let mut library = PromptLibrary::new();
    let prompt = library.get(id)?;

    println!("Prompt:  {} (version {})", prompt.metadata.id, prompt.metadata.version);
    match prompt.override_path() {
        Some(path) => println!("Source:  override at {}", path.display()),
        None => println!("Source:  embedded default"),
    }
    println!("Fills:   {}", id.placeholders().join(", "));

    let missing = prompt.missing_placeholders(id.placeholders());
    if !missing.is_empty() {
        println!("⚠️  Missing placeholders: {}", missing.join(", "));
    }

    println!("{}", "─".repeat(50));
    println!("{}", prompt.content);

    Ok(())
}

pub fn cmd_prompts_path() -> Result<()> {
    let Some(path) = default_prompts_dir() else {
        eprintln!("Could not determine the prompt override directory on this system.");
        return Ok(());
    };

    println!("{}", path.display());
    if !path.exists() {
        eprintln!();
        eprintln!("Note: the directory does not exist yet; create it to add overrides.");
    }

    Ok(())
}
