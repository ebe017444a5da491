//! The JSON document holding MCP server registrations.

use std::path::Path;

use serde_json::{Map, Value};

use crate::config::normalize::normalize;
use crate::error::{InstallError, InstallResult};
use crate::mcp::spec::ServerEntry;

/// An MCP configuration file loaded into memory.
///
/// Keys other than the registration key belong to other tools and are carried
/// through untouched apart from normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Parse document text, degrading to an empty document when the text is
    /// blank, invalid JSON or not a JSON object.
    pub fn parse_lenient(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::new();
        }
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(root)) => Self { root },
            Ok(_) => {
                tracing::warn!("MCP config root is not a JSON object, starting from an empty document");
                Self::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "MCP config is not valid JSON, starting from an empty document");
                Self::new()
            }
        }
    }

    /// Load the document at `path`. A missing file is an empty document.
    pub fn load(path: &Path) -> InstallResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "MCP config does not exist yet");
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path).map_err(|source| InstallError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse_lenient(&text))
    }

    /// Insert or replace `name` under the registration `key`.
    ///
    /// A non-object value already stored under `key` is replaced.
    pub fn upsert(&mut self, key: &str, name: &str, entry: &ServerEntry) -> InstallResult<()> {
        let value = serde_json::to_value(entry)?;
        let slot = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            tracing::warn!(key, "Replacing non-object value under registration key");
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(servers) = slot {
            servers.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Ensure the registration key holds an object.
    pub fn ensure_key(&mut self, key: &str) {
        let slot = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
    }

    pub fn servers(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key).and_then(Value::as_object)
    }

    /// Decode one registration. Entries that do not fit [`ServerEntry`] yield `None`.
    pub fn entry(&self, key: &str, name: &str) -> Option<ServerEntry> {
        let value = self.servers(key)?.get(name)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Strip structurally empty containers from the whole document.
    pub fn normalize(&mut self) {
        let root = std::mem::take(&mut self.root);
        if let Value::Object(root) = normalize(Value::Object(root)) {
            self.root = root;
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    pub fn to_pretty_bytes(&self) -> InstallResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.root)?)
    }

    /// Write the document to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> InstallResult<()> {
        let bytes = self.to_pretty_bytes()?;
        write_bytes(path, &bytes)
    }
}

pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> InstallResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| InstallError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| InstallError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> ConfigDocument {
        match value {
            Value::Object(map) => ConfigDocument::from_map(map),
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn parse_lenient_accepts_object() {
        let parsed = ConfigDocument::parse_lenient(r#"{"servers": {}}"#);
        assert!(parsed.servers("servers").is_some());
    }

    #[test]
    fn parse_lenient_degrades_on_garbage() {
        assert_eq!(ConfigDocument::parse_lenient("{not json"), ConfigDocument::new());
        assert_eq!(ConfigDocument::parse_lenient("[1, 2]"), ConfigDocument::new());
        assert_eq!(ConfigDocument::parse_lenient(""), ConfigDocument::new());
        assert_eq!(ConfigDocument::parse_lenient("  \r\n"), ConfigDocument::new());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let loaded = ConfigDocument::load(&temp.path().join("absent.json")).unwrap();
        assert!(loaded.as_map().is_empty());
    }

    #[test]
    fn load_invalid_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mcp.json");
        std::fs::write(&path, "{\"servers\": ").unwrap();

        let loaded = ConfigDocument::load(&path).unwrap();
        assert!(loaded.as_map().is_empty());
    }

    #[test]
    fn upsert_creates_key_and_overwrites_entry() {
        let mut document = ConfigDocument::new();
        document
            .upsert("servers", "boost", &ServerEntry::new("php", vec!["a".into()]))
            .unwrap();
        document
            .upsert("servers", "boost", &ServerEntry::new("php", vec!["b".into()]))
            .unwrap();

        let entry = document.entry("servers", "boost").unwrap();
        assert_eq!(entry.args, vec!["b".to_string()]);
        assert_eq!(document.servers("servers").unwrap().len(), 1);
    }

    #[test]
    fn upsert_replaces_non_object_key() {
        let mut document = doc(json!({"servers": "oops"}));
        document
            .upsert("servers", "boost", &ServerEntry::new("php", vec![]))
            .unwrap();
        assert!(document.entry("servers", "boost").is_some());
    }

    #[test]
    fn upsert_does_not_merge_fields() {
        let mut document = doc(json!({
            "servers": {"boost": {"command": "old", "args": ["x"], "type": "stdio"}}
        }));
        document
            .upsert("servers", "boost", &ServerEntry::new("new", vec!["y".into()]))
            .unwrap();

        assert_eq!(
            document.servers("servers").unwrap().get("boost"),
            Some(&json!({"command": "new", "args": ["y"]}))
        );
    }

    #[test]
    fn ensure_key_keeps_existing_servers() {
        let mut document = doc(json!({"servers": {"a": {"command": "x"}}}));
        document.ensure_key("servers");
        assert_eq!(document.servers("servers").unwrap().len(), 1);
    }

    #[test]
    fn serialized_output_does_not_escape_slashes() {
        let mut document = ConfigDocument::new();
        document
            .upsert(
                "servers",
                "boost",
                &ServerEntry::new("/usr/bin/php", vec!["/p/artisan".into()]),
            )
            .unwrap();
        let text = String::from_utf8(document.to_pretty_bytes().unwrap()).unwrap();
        assert!(text.contains("\"/usr/bin/php\""));
        assert!(text.contains('\n'));
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("mcp.json");
        let mut document = ConfigDocument::new();
        document.ensure_key("servers");

        document.save(&path).unwrap();

        assert!(path.exists());
    }
}
