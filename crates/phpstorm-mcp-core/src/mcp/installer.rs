//! MCP server registration pipeline.
//!
//! `ResolveTarget -> ReadExisting -> Merge -> Normalize -> Serialize -> Persist`.
//! Nothing is retried. A failure while resolving the target or persisting
//! leaves the existing config file as it was.

use std::path::{Path, PathBuf};

use crate::bridge::{HostBridge, HostPath};
use crate::config::ConfigDocument;
use crate::config::document::write_bytes;
use crate::error::InstallResult;
use crate::mcp::spec::ServerEntry;
use crate::mcp::translate::CommandTranslator;
use crate::types::ExecutionContext;

/// Location of the MCP config file on both sides of the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTarget {
    /// Path used when this process can write the file itself.
    pub native_path: PathBuf,
    /// Segments below the host base directory used from inside WSL.
    pub host_relative: Vec<String>,
}

impl ConfigTarget {
    pub fn new(native_path: impl Into<PathBuf>, host_relative: &[&str]) -> Self {
        Self {
            native_path: native_path.into(),
            host_relative: host_relative.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn native_path(&self) -> &Path {
        &self.native_path
    }

    /// Full host path below `base_dir`.
    pub fn host_path(&self, base_dir: &HostPath) -> HostPath {
        base_dir.join_all(self.host_relative.iter().map(String::as_str))
    }
}

/// Writes one server entry into an MCP config file.
#[derive(Debug)]
pub struct McpInstaller<B> {
    bridge: B,
    translator: CommandTranslator,
}

impl<B: HostBridge> McpInstaller<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            translator: CommandTranslator::default(),
        }
    }

    pub fn with_translator(mut self, translator: CommandTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Register `entry` as `name` under the registration `key`.
    ///
    /// Returns `Ok(false)` when the host base directory resolves to nothing or
    /// a host file operation reports failure. Returns `Err` when a helper cannot
    /// run, the host lookup errors, or a native write fails.
    pub fn install(
        &self,
        target: &ConfigTarget,
        key: &str,
        name: &str,
        entry: &ServerEntry,
        context: &ExecutionContext,
    ) -> InstallResult<bool> {
        let launch = self
            .translator
            .translate(&entry.command, &entry.args, context);
        let entry = entry.clone().with_launch(launch);
        tracing::debug!(name, command = %entry.command, args = ?entry.args, "Translated MCP command");

        match context {
            ExecutionContext::Native { .. } => self.install_native(target, key, name, &entry),
            ExecutionContext::CrossBoundary { .. } => {
                self.install_cross_boundary(target, key, name, &entry)
            }
        }
    }

    /// Like [`McpInstaller::install`], logging errors and reporting them as `false`.
    pub fn install_entry(
        &self,
        target: &ConfigTarget,
        key: &str,
        name: &str,
        entry: &ServerEntry,
        context: &ExecutionContext,
    ) -> bool {
        match self.install(target, key, name, entry, context) {
            Ok(installed) => installed,
            Err(err) => {
                tracing::error!(name, error = %err, "MCP server installation failed");
                false
            }
        }
    }

    fn install_native(
        &self,
        target: &ConfigTarget,
        key: &str,
        name: &str,
        entry: &ServerEntry,
    ) -> InstallResult<bool> {
        let path = target.native_path();
        let document = ConfigDocument::load(path)?;
        let bytes = merge(document, key, name, entry)?;

        write_bytes(path, &bytes)?;
        tracing::info!(name, path = %path.display(), "Registered MCP server");
        Ok(true)
    }

    fn install_cross_boundary(
        &self,
        target: &ConfigTarget,
        key: &str,
        name: &str,
        entry: &ServerEntry,
    ) -> InstallResult<bool> {
        let base_dir = self.bridge.resolve_host_base_dir()?;
        if base_dir.trim().is_empty() {
            tracing::warn!("Host base directory resolved to an empty value");
            return Ok(false);
        }
        let base_dir = HostPath::new(base_dir.trim());
        let host_path = target.host_path(&base_dir);
        tracing::debug!(path = %host_path, "Resolved host MCP config path");

        let document = self
            .bridge
            .read_host_file(&host_path)?
            .map(|text| ConfigDocument::parse_lenient(&text))
            .unwrap_or_default();
        let bytes = merge(document, key, name, entry)?;

        let Some(staged) = self.bridge.write_host_file_staged(&base_dir, &bytes)? else {
            tracing::warn!(path = %host_path, "Staging MCP config on the host failed");
            return Ok(false);
        };

        let published = self.bridge.publish_staged(&staged, &host_path);
        match self.bridge.discard_staged(&staged) {
            Ok(true) => {}
            Ok(false) => tracing::warn!(staged = %staged, "Staged MCP config was left behind"),
            Err(err) => {
                tracing::warn!(staged = %staged, error = %err, "Staged MCP config was left behind")
            }
        }

        let published = published?;
        if published {
            tracing::info!(name, path = %host_path, "Registered MCP server on host");
        } else {
            tracing::warn!(path = %host_path, "Copying MCP config into place failed");
        }
        Ok(published)
    }
}

fn merge(
    mut document: ConfigDocument,
    key: &str,
    name: &str,
    entry: &ServerEntry,
) -> InstallResult<Vec<u8>> {
    document.ensure_key(key);
    document.upsert(key, name, entry)?;
    document.normalize();
    document.to_pretty_bytes()
}
