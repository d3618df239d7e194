//! Prompt templates for the advice endpoint
//!
//! A template is a markdown file with YAML frontmatter and two top-level
//! sections, `# System` and `# User`. The embedded default can be replaced by
//! dropping a file with the same id into the override directory
//! (~/.local/share/kakeibo/prompts/overrides/ on Linux).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const BUDGET_ADVICE: &str = include_str!("../../../prompts/budget_advice.md");

const SYSTEM_HEADER: &str = "System";
const USER_HEADER: &str = "User";

/// Known prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Budgeting advice from the ledger summary
    BudgetAdvice,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAdvice => "budget_advice",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::BudgetAdvice]
    }

    /// Placeholders the renderer fills in for this template
    pub fn placeholders(&self) -> &'static [&'static str] {
        match self {
            Self::BudgetAdvice => &["total_income", "total_expense", "balance", "breakdown"],
        }
    }

    fn embedded(&self) -> &'static str {
        match self {
            Self::BudgetAdvice => BUDGET_ADVICE,
        }
    }

    fn file_name(&self) -> String {
        format!("{}.md", self.as_str())
    }
}

impl std::str::FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PromptId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown prompt: {}", s))
    }
}

/// Template frontmatter
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Bumped whenever the wording changes
    pub version: u32,
}

/// Where a loaded template came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    Embedded,
    Override(PathBuf),
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// Everything after the frontmatter
    pub content: String,
    pub source: PromptSource,
    system: Option<String>,
    user: Option<String>,
}

impl Prompt {
    fn parse(text: &str, source: PromptSource) -> Result<Self> {
        let (frontmatter, body) = split_frontmatter(text)?;
        let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
            .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

        let mut sections = sections(body);
        Ok(Self {
            metadata,
            content: body.to_string(),
            source,
            system: sections.remove(SYSTEM_HEADER),
            user: sections.remove(USER_HEADER),
        })
    }

    pub fn system_section(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn user_section(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_override(&self) -> bool {
        matches!(self.source, PromptSource::Override(_))
    }

    pub fn override_path(&self) -> Option<&Path> {
        match &self.source {
            PromptSource::Override(path) => Some(path),
            PromptSource::Embedded => None,
        }
    }

    /// Fill `{{name}}` placeholders in the user section
    ///
    /// Templates without a `# User` section are rendered whole. Substituted
    /// values are never rescanned, and unknown placeholders are left as-is.
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        render(self.user_section().unwrap_or(&self.content), vars)
    }

    /// Placeholders from `expected` that the user template never mentions
    pub fn missing_placeholders<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        let template = self.user_section().unwrap_or(&self.content);
        expected
            .iter()
            .copied()
            .filter(|name| !template.contains(&format!("{{{{{}}}}}", name)))
            .collect()
    }
}

/// Loads templates on first use and caches them
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Library that honours overrides in [`default_prompts_dir`]
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Library that ignores overrides entirely
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let prompt = load(self.override_dir.as_deref(), id)?;
                Ok(entry.insert(prompt))
            }
        }
    }

    /// Every known template with its version and override state
    ///
    /// A template that fails to load is listed with version 0.
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let override_path = self.existing_override(id);
                let version = match self.get(id) {
                    Ok(prompt) => prompt.metadata.version,
                    Err(e) => {
                        warn!(prompt = id.as_str(), error = %e, "Prompt failed to load");
                        0
                    }
                };
                PromptInfo {
                    id: id.as_str().to_string(),
                    version,
                    has_override: override_path.is_some(),
                    override_path,
                }
            })
            .collect()
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.existing_override(id).is_some()
    }

    fn existing_override(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|dir| dir.join(id.file_name()))
            .filter(|path| path.is_file())
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Row for `kakeibo prompts list`
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: String,
    pub version: u32,
    pub has_override: bool,
    pub override_path: Option<PathBuf>,
}

/// Directory searched for template overrides
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kakeibo").join("prompts").join("overrides"))
}

fn load(override_dir: Option<&Path>, id: PromptId) -> Result<Prompt> {
    let path = override_dir
        .map(|dir| dir.join(id.file_name()))
        .filter(|path| path.is_file());

    let Some(path) = path else {
        return Prompt::parse(id.embedded(), PromptSource::Embedded);
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        Error::InvalidData(format!("Failed to read prompt override {}: {}", path.display(), e))
    })?;
    let prompt = Prompt::parse(&text, PromptSource::Override(path.clone()))?;

    if prompt.metadata.id != id.as_str() {
        return Err(Error::InvalidData(format!(
            "Prompt override {} declares id '{}', expected '{}'",
            path.display(),
            prompt.metadata.id,
            id.as_str()
        )));
    }

    let missing = prompt.missing_placeholders(id.placeholders());
    if !missing.is_empty() {
        warn!(path = %path.display(), ?missing, "Prompt override omits placeholders");
    }
    debug!(path = %path.display(), version = prompt.metadata.version, "Using prompt override");

    Ok(prompt)
}

/// Split `---`-delimited YAML frontmatter from the body
fn split_frontmatter(text: &str) -> Result<(&str, &str)> {
    let rest = text
        .trim_start()
        .strip_prefix("---")
        .ok_or_else(|| Error::InvalidData("Prompt must start with YAML frontmatter (---)".into()))?;

    let (frontmatter, body) = rest
        .split_once("\n---")
        .ok_or_else(|| Error::InvalidData("Prompt frontmatter is not closed".into()))?;

    Ok((frontmatter.trim(), body.trim()))
}

/// Map each `# Header` to the trimmed text beneath it
fn sections(body: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some(header) = line.strip_prefix("# ") {
            if let Some((name, lines)) = current.take() {
                out.insert(name.to_string(), lines.join("\n").trim().to_string());
            }
            current = Some((header.trim(), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((name, lines)) = current {
        out.insert(name.to_string(), lines.join("\n").trim().to_string());
    }

    out
}

fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match vars.get(name.trim()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}
