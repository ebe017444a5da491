//! PhpStorm with the GitHub Copilot plugin.

use std::path::PathBuf;

use crate::client::{ClientContext, McpClient};
use crate::mcp::ConfigTarget;
use crate::settings::Settings;
use crate::types::Platform;

const DEFAULT_GUIDELINES_PATH: &str = ".github/instructions/laravel-boost.instructions.md";
const DEFAULT_SKILLS_PATH: &str = ".github/skills";

/// Config location below the per-user base directory. The same segments apply
/// to `~/.config` on POSIX hosts and `%LOCALAPPDATA%` on Windows.
const CONFIG_SEGMENTS: [&str; 3] = ["github-copilot", "intellij", "mcp.json"];

#[derive(Debug, Clone)]
pub struct PhpStormCopilot {
    key: String,
    guidelines_path: Option<String>,
    skills_path: Option<String>,
}

impl Default for PhpStormCopilot {
    fn default() -> Self {
        Self {
            key: "servers".to_string(),
            guidelines_path: None,
            skills_path: None,
        }
    }
}

impl PhpStormCopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            key: settings.mcp.key.clone(),
            guidelines_path: settings.paths.guidelines.clone(),
            skills_path: settings.paths.skills.clone(),
        }
    }

    /// The plugin resolves neither `PATH` nor relative paths.
    pub fn uses_absolute_paths(&self) -> bool {
        true
    }

    /// Project-relative file receiving AI guidelines.
    pub fn guidelines_path(&self) -> &str {
        self.guidelines_path
            .as_deref()
            .unwrap_or(DEFAULT_GUIDELINES_PATH)
    }

    /// Project-relative directory receiving agent skills.
    pub fn skills_path(&self) -> &str {
        self.skills_path.as_deref().unwrap_or(DEFAULT_SKILLS_PATH)
    }
}

impl McpClient for PhpStormCopilot {
    fn id(&self) -> &'static str {
        "phpstorm-copilot"
    }

    fn display_name(&self) -> &'static str {
        "PhpStorm with GitHub Copilot"
    }

    fn mcp_config_key(&self) -> &str {
        &self.key
    }

    fn mcp_config_path(&self, ctx: &ClientContext, platform: Platform) -> anyhow::Result<PathBuf> {
        let base = match platform {
            Platform::Darwin | Platform::Linux => ctx.home_dir().join(".config"),
            Platform::Windows => ctx
                .local_app_data()
                .ok_or_else(|| anyhow::anyhow!("Could not determine %LOCALAPPDATA%"))?
                .to_path_buf(),
        };
        Ok(CONFIG_SEGMENTS
            .iter()
            .fold(base, |path, segment| path.join(segment)))
    }

    fn mcp_target(&self, ctx: &ClientContext, platform: Platform) -> anyhow::Result<ConfigTarget> {
        let native_path = self.mcp_config_path(ctx, platform)?;
        Ok(ConfigTarget::new(native_path, &CONFIG_SEGMENTS))
    }
}
