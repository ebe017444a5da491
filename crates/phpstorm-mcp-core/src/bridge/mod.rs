//! Access to the Windows host filesystem from inside WSL.
//!
//! The installer never touches host files directly when crossing the boundary.
//! Everything goes through a [`HostBridge`], which keeps the merge logic
//! testable with an in-memory fake.

mod wsl;

use std::fmt;

use crate::error::BridgeError;

pub use wsl::{WslBridge, WslBridgeConfig};

/// A path on the Windows host, always `\`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPath(String);

impl HostPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Append one segment. Any `/` inside `segment` becomes `\`.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('/', "\\");
        let segment = segment.trim_matches('\\');
        if self.0.is_empty() {
            return Self(segment.to_string());
        }
        let base = self.0.trim_end_matches('\\');
        Self(format!("{base}\\{segment}"))
    }

    pub fn join_all<'a, I>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .fold(self.clone(), |path, segment| path.join(segment))
    }

    /// The containing directory, if any.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('\\')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations the installer needs on the host side.
///
/// `Err` means the helper could not run or its answer is unusable; `Ok(false)`
/// or `Ok(None)` means it ran and reported that the step did not succeed.
pub trait HostBridge {
    /// Base directory on the host under which the config lives (`%LOCALAPPDATA%`).
    fn resolve_host_base_dir(&self) -> Result<String, BridgeError>;

    /// Raw contents of a host file, `None` when it does not exist.
    fn read_host_file(&self, path: &HostPath) -> Result<Option<String>, BridgeError>;

    /// Write `contents` to a fresh temporary file below `base_dir`.
    fn write_host_file_staged(
        &self,
        base_dir: &HostPath,
        contents: &[u8],
    ) -> Result<Option<HostPath>, BridgeError>;

    /// Create the target directory if needed and copy the staged file over `target`.
    fn publish_staged(&self, staged: &HostPath, target: &HostPath) -> Result<bool, BridgeError>;

    /// Remove a staged file.
    fn discard_staged(&self, staged: &HostPath) -> Result<bool, BridgeError>;
}

impl<T: HostBridge + ?Sized> HostBridge for &T {
    fn resolve_host_base_dir(&self) -> Result<String, BridgeError> {
        (**self).resolve_host_base_dir()
    }

    fn read_host_file(&self, path: &HostPath) -> Result<Option<String>, BridgeError> {
        (**self).read_host_file(path)
    }

    fn write_host_file_staged(
        &self,
        base_dir: &HostPath,
        contents: &[u8],
    ) -> Result<Option<HostPath>, BridgeError> {
        (**self).write_host_file_staged(base_dir, contents)
    }

    fn publish_staged(&self, staged: &HostPath, target: &HostPath) -> Result<bool, BridgeError> {
        (**self).publish_staged(staged, target)
    }

    fn discard_staged(&self, staged: &HostPath) -> Result<bool, BridgeError> {
        (**self).discard_staged(staged)
    }
}
