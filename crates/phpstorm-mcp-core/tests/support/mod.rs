#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use phpstorm_mcp_core::bridge::{HostBridge, HostPath};
use phpstorm_mcp_core::error::BridgeError;

/// In-memory host filesystem recording every bridge call.
#[derive(Debug)]
pub struct FakeHost {
    pub base_dir: String,
    pub lookup_fails: bool,
    pub stage_ok: bool,
    pub publish_ok: bool,
    pub discard_ok: bool,
    pub files: RefCell<HashMap<String, String>>,
    pub calls: RefCell<Vec<String>>,
    staged_counter: Cell<u32>,
}

impl FakeHost {
    pub fn new(base_dir: &str) -> Self {
        Self {
            base_dir: base_dir.to_string(),
            lookup_fails: false,
            stage_ok: true,
            publish_ok: true,
            discard_ok: true,
            files: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            staged_counter: Cell::new(0),
        }
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(path.to_string(), contents.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl HostBridge for FakeHost {
    fn resolve_host_base_dir(&self) -> Result<String, BridgeError> {
        self.record("resolve".to_string());
        if self.lookup_fails {
            return Err(BridgeError::Failed {
                program: "wslvar".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "not found".to_string(),
            });
        }
        Ok(format!("{}\n", self.base_dir))
    }

    fn read_host_file(&self, path: &HostPath) -> Result<Option<String>, BridgeError> {
        self.record(format!("read {path}"));
        Ok(self.file(path.as_str()))
    }

    fn write_host_file_staged(
        &self,
        base_dir: &HostPath,
        contents: &[u8],
    ) -> Result<Option<HostPath>, BridgeError> {
        let n = self.staged_counter.get() + 1;
        self.staged_counter.set(n);
        let staged = base_dir.join("Temp").join(&format!("mcp_{n}.json"));
        self.record(format!("stage {staged}"));
        if !self.stage_ok {
            return Ok(None);
        }
        self.files.borrow_mut().insert(
            staged.as_str().to_string(),
            String::from_utf8_lossy(contents).into_owned(),
        );
        Ok(Some(staged))
    }

    fn publish_staged(&self, staged: &HostPath, target: &HostPath) -> Result<bool, BridgeError> {
        self.record(format!("publish {staged} -> {target}"));
        if !self.publish_ok {
            return Ok(false);
        }
        let Some(contents) = self.file(staged.as_str()) else {
            return Ok(false);
        };
        self.files
            .borrow_mut()
            .insert(target.as_str().to_string(), contents);
        Ok(true)
    }

    fn discard_staged(&self, staged: &HostPath) -> Result<bool, BridgeError> {
        self.record(format!("discard {staged}"));
        if !self.discard_ok {
            return Ok(false);
        }
        self.files.borrow_mut().remove(staged.as_str());
        Ok(true)
    }
}
