//! MCP configuration document handling.

pub mod document;
pub mod normalize;

pub use document::ConfigDocument;
pub use normalize::normalize;
