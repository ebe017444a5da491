//! Client descriptors: where a client keeps its MCP config and related files.

pub mod phpstorm;

use std::path::{Path, PathBuf};

use crate::mcp::ConfigTarget;
use crate::types::Platform;

pub use phpstorm::PhpStormCopilot;

/// Directories needed to locate client files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    home_dir: PathBuf,
    local_app_data: Option<PathBuf>,
}

impl ClientContext {
    pub fn new(home_dir: PathBuf, local_app_data: Option<PathBuf>) -> Self {
        Self {
            home_dir,
            local_app_data,
        }
    }

    /// Context for the current user.
    pub fn from_env() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let local_app_data = if Platform::current() == Platform::Windows {
            dirs::data_local_dir()
        } else {
            None
        };
        Ok(Self::new(home_dir, local_app_data))
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn local_app_data(&self) -> Option<&Path> {
        self.local_app_data.as_deref()
    }
}

/// A client that reads MCP servers from a JSON file.
pub trait McpClient {
    /// Stable identifier.
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn display_name(&self) -> &'static str;

    /// Top-level key grouping server entries.
    fn mcp_config_key(&self) -> &str;

    /// MCP config file for `platform`.
    fn mcp_config_path(&self, ctx: &ClientContext, platform: Platform) -> anyhow::Result<PathBuf>;

    /// MCP config file on both sides of the WSL boundary.
    fn mcp_target(&self, ctx: &ClientContext, platform: Platform) -> anyhow::Result<ConfigTarget>;
}
