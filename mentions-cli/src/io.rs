//! File I/O for native CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use mentions_core::{AttributeSet, MentionConfig};

/// Settings read from ~/.mentions/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub engine: MentionConfig,
    /// Names offered by the picker
    pub candidates: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let mention = AttributeSet::new()
            .with("foreground", "lightblue")
            .with("weight", "bold");
        let default = AttributeSet::new().with("foreground", "reset");
        Self {
            engine: MentionConfig::new(mention, default)
                .with_triggers(['@', '#'])
                .with_add_mention_after_return_key(true),
            candidates: [
                "Steven Zweier",
                "Tiffany",
                "Samuel",
                "Sasha",
                "Ada Lovelace",
                "Alan Turing",
                "Grace Hopper",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Get the ~/.mentions directory path, creating it if needed
pub fn mentions_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let dir = home.join(".mentions");

    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    Ok(dir)
}

/// Get the log directory, creating it if needed
pub fn logs_dir() -> Result<PathBuf> {
    let dir = mentions_dir()?.join("logs");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Load settings, falling back to defaults when no config file exists
pub fn load_settings() -> Result<Settings> {
    let path = mentions_dir()?.join("config.json");
    if !path.exists() {
        return Ok(Settings::default());
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(settings)
}

/// Load a text file to start editing from
pub fn load_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))
}
