//! PhpStorm MCP Core Library
//!
//! Registers MCP servers in the GitHub Copilot for PhpStorm configuration file,
//! rewriting launch commands and relaying file writes through the Windows host
//! when running inside WSL.

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod settings;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Execution environment
    pub use crate::types::{ExecutionContext, Platform};

    // MCP
    pub use crate::mcp::{
        CommandShape, CommandTranslator, ConfigTarget, LaunchSpec, McpInstaller, ServerEntry,
        translate,
    };

    // Configuration document
    pub use crate::config::{ConfigDocument, normalize};

    // Host bridge
    pub use crate::bridge::{HostBridge, HostPath, WslBridge, WslBridgeConfig};

    // Client
    pub use crate::client::{ClientContext, McpClient, PhpStormCopilot};

    // Errors and settings
    pub use crate::error::{BridgeError, InstallError};
    pub use crate::settings::Settings;
}
