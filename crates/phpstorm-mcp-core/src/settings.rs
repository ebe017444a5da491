//! Installer settings loaded from `settings.toml`.
//!
//! ```toml
//! [mcp]
//! key = "servers"
//! wrapper = "vendor/bin/sail"
//! launcher = "wsl.exe"
//!
//! [bridge]
//! wslvar = "wslvar"
//! powershell = "powershell.exe"
//!
//! [paths]
//! guidelines = ".github/instructions/laravel-boost.instructions.md"
//! skills = ".github/skills"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bridge::WslBridgeConfig;
use crate::mcp::translate::{CommandTranslator, DEFAULT_WRAPPER};
use crate::types::DEFAULT_LAUNCHER;

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mcp: McpSettings,
    pub bridge: WslBridgeConfig,
    pub paths: PathSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// Top-level key grouping server entries.
    pub key: String,
    /// Project-local wrapper script, relative to the project root.
    pub wrapper: String,
    /// Launcher used to reach back into WSL from the host.
    pub launcher: String,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            key: "servers".to_string(),
            wrapper: DEFAULT_WRAPPER.to_string(),
            launcher: DEFAULT_LAUNCHER.to_string(),
        }
    }
}

/// Optional overrides for project-relative output locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub guidelines: Option<String>,
    pub skills: Option<String>,
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(base.join("phpstorm-mcp").join(SETTINGS_FILE))
    }

    /// Load settings from `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mcp.key.trim().is_empty() {
            anyhow::bail!("mcp.key must not be empty");
        }
        if self.mcp.wrapper.trim().is_empty() {
            anyhow::bail!("mcp.wrapper must not be empty");
        }
        if self.mcp.launcher.trim().is_empty() {
            anyhow::bail!("mcp.launcher must not be empty");
        }
        Ok(())
    }

    pub fn translator(&self) -> CommandTranslator {
        CommandTranslator::new(&self.mcp.wrapper)
    }
}

/// Attach the offending lines to a TOML error.
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();
    match error.span() {
        Some(span) => {
            let prefix = content.get(..span.start).unwrap_or(content);
            let line_num = prefix.matches('\n').count() + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                line_context(content, line_num),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
