//! Shared core types describing where the installer runs.

use serde::{Deserialize, Serialize};

/// Environment variable set by WSL inside every distribution.
pub const WSL_DISTRO_ENV: &str = "WSL_DISTRO_NAME";

/// Boundary-crossing launcher used when no other is configured.
pub const DEFAULT_LAUNCHER: &str = "wsl.exe";

/// Host operating system families with a known MCP config location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Darwin
        } else {
            Platform::Linux
        }
    }
}

/// Where the registered command will eventually be launched from, relative to
/// where this process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionContext {
    /// The IDE and this process share a filesystem and process namespace.
    Native { project_root: String },
    /// This process runs inside WSL while the IDE runs on the Windows host.
    CrossBoundary {
        project_root: String,
        launcher: String,
    },
}

impl ExecutionContext {
    /// Detect the context using the given environment lookup.
    pub fn detect<F>(project_root: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_root = project_root.into();
        let in_wsl = lookup(WSL_DISTRO_ENV).is_some_and(|value| !value.trim().is_empty());
        if in_wsl {
            ExecutionContext::CrossBoundary {
                project_root,
                launcher: DEFAULT_LAUNCHER.to_string(),
            }
        } else {
            ExecutionContext::Native { project_root }
        }
    }

    /// Detect the context from the process environment.
    pub fn from_env(project_root: impl Into<String>) -> Self {
        Self::detect(project_root, |key| std::env::var(key).ok())
    }

    /// Replace the launcher of a cross-boundary context. No-op for native.
    pub fn with_launcher(self, launcher: impl Into<String>) -> Self {
        match self {
            ExecutionContext::CrossBoundary { project_root, .. } => {
                ExecutionContext::CrossBoundary {
                    project_root,
                    launcher: launcher.into(),
                }
            }
            native => native,
        }
    }

    pub fn project_root(&self) -> &str {
        match self {
            ExecutionContext::Native { project_root }
            | ExecutionContext::CrossBoundary { project_root, .. } => project_root,
        }
    }

    pub fn is_cross_boundary(&self) -> bool {
        matches!(self, ExecutionContext::CrossBoundary { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_native_without_distro_name() {
        let ctx = ExecutionContext::detect("/p", |_| None);
        assert_eq!(
            ctx,
            ExecutionContext::Native {
                project_root: "/p".to_string()
            }
        );
    }

    #[test]
    fn detect_cross_boundary_with_distro_name() {
        let ctx = ExecutionContext::detect("/p", |key| {
            (key == WSL_DISTRO_ENV).then(|| "Ubuntu".to_string())
        });
        assert!(ctx.is_cross_boundary());
        assert_eq!(ctx.project_root(), "/p");
    }

    #[test]
    fn detect_treats_blank_distro_name_as_native() {
        let ctx = ExecutionContext::detect("/p", |_| Some("  ".to_string()));
        assert!(!ctx.is_cross_boundary());
    }

    #[test]
    fn with_launcher_only_affects_cross_boundary() {
        let native = ExecutionContext::Native {
            project_root: "/p".to_string(),
        }
        .with_launcher("wsl");
        assert!(!native.is_cross_boundary());

        let crossing = ExecutionContext::detect("/p", |_| Some("Debian".to_string()))
            .with_launcher("C:\\Windows\\System32\\wsl.exe");
        assert_eq!(
            crossing,
            ExecutionContext::CrossBoundary {
                project_root: "/p".to_string(),
                launcher: "C:\\Windows\\System32\\wsl.exe".to_string(),
            }
        );
    }

    #[test]
    fn platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Darwin).unwrap();
        assert_eq!(json, "\"darwin\"");
    }
}
