//! MCP (Model Context Protocol) server registration

pub mod installer;
pub mod spec;
pub mod translate;

pub use installer::{ConfigTarget, McpInstaller};
pub use spec::{LaunchSpec, ServerEntry};
pub use translate::{CommandShape, CommandTranslator, DEFAULT_WRAPPER, translate};
