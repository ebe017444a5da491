//! [`HostBridge`] backed by WSL interop helpers.
//!
//! `wslvar` resolves Windows environment variables and `powershell.exe` performs
//! every host file operation. File contents cross the boundary base64-encoded
//! in both directions, so the host never decodes them as text. Staged payloads
//! go through stdin to stay clear of the host command-line length limit.

use std::io::Write as _;
use std::process::{Command, Output, Stdio};

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{HostBridge, HostPath};
use crate::error::BridgeError;

/// Programs and names used by [`WslBridge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WslBridgeConfig {
    /// Helper printing a Windows environment variable.
    pub wslvar: String,
    /// PowerShell executable reachable through interop.
    pub powershell: String,
    /// Windows variable naming the host base directory.
    pub base_var: String,
    /// Directory below the base directory used for staged files.
    pub temp_dir: String,
}

impl Default for WslBridgeConfig {
    fn default() -> Self {
        Self {
            wslvar: "wslvar".to_string(),
            powershell: "powershell.exe".to_string(),
            base_var: "LOCALAPPDATA".to_string(),
            temp_dir: "Temp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WslBridge {
    config: WslBridgeConfig,
}

impl WslBridge {
    pub fn new(config: WslBridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WslBridgeConfig {
        &self.config
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<Output, BridgeError> {
        tracing::debug!(program, ?args, "Running host helper");
        Command::new(program)
            .args(args)
            .output()
            .map_err(|source| BridgeError::Spawn {
                program: program.to_string(),
                source,
            })
    }

    /// Run `program`, writing `input` to its stdin.
    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<Output, BridgeError> {
        tracing::debug!(program, ?args, input_len = input.len(), "Running host helper");
        let spawn_error = |source: std::io::Error| BridgeError::Spawn {
            program: program.to_string(),
            source,
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A helper that exits without reading is judged by its exit status.
            match stdin.write_all(input) {
                Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(spawn_error(err));
                }
                _ => {}
            }
        }
        child.wait_with_output().map_err(spawn_error)
    }

    fn powershell(&self, script: &str) -> Result<Output, BridgeError> {
        self.run(&self.config.powershell, &["-NoProfile", "-Command", script])
    }

    fn powershell_with_input(&self, script: &str, input: &[u8]) -> Result<Output, BridgeError> {
        self.run_with_input(
            &self.config.powershell,
            &["-NoProfile", "-NonInteractive", "-Command", script],
            input,
        )
    }

    fn require_success(&self, program: &str, output: Output) -> Result<String, BridgeError> {
        if !output.status.success() {
            return Err(BridgeError::Failed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(decode_stdout(&output.stdout))
    }

    fn report(&self, step: &str, output: &Output) -> bool {
        let ok = output.status.success();
        if !ok {
            tracing::warn!(
                step,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Host file operation failed"
            );
        }
        ok
    }
}

impl HostBridge for WslBridge {
    fn resolve_host_base_dir(&self) -> Result<String, BridgeError> {
        let output = self.run(&self.config.wslvar, &[self.config.base_var.as_str()])?;
        let stdout = self.require_success(&self.config.wslvar, output)?;
        Ok(stdout.trim().to_string())
    }

    fn read_host_file(&self, path: &HostPath) -> Result<Option<String>, BridgeError> {
        let output = self.powershell(&read_script(path))?;
        let stdout = self.require_success(&self.config.powershell, output)?;
        decode_host_file(&stdout).map_err(|reason| BridgeError::Decode {
            program: self.config.powershell.clone(),
            reason,
        })
    }

    fn write_host_file_staged(
        &self,
        base_dir: &HostPath,
        contents: &[u8],
    ) -> Result<Option<HostPath>, BridgeError> {
        let staged = base_dir
            .join(&self.config.temp_dir)
            .join(&staged_file_name());
        let payload = base64::engine::general_purpose::STANDARD.encode(contents);
        let output = self.powershell_with_input(&stage_script(&staged), payload.as_bytes())?;
        if !self.report("stage", &output) {
            tracing::warn!(
                staged = %staged,
                bytes = contents.len(),
                "Could not stage config on the host"
            );
            return Ok(None);
        }
        Ok(Some(staged))
    }

    fn publish_staged(&self, staged: &HostPath, target: &HostPath) -> Result<bool, BridgeError> {
        let output = self.powershell(&publish_script(staged, target))?;
        Ok(self.report("publish", &output))
    }

    fn discard_staged(&self, staged: &HostPath) -> Result<bool, BridgeError> {
        let output = self.powershell(&discard_script(staged))?;
        Ok(self.report("discard", &output))
    }
}

fn staged_file_name() -> String {
    format!("mcp_{}.json", uuid::Uuid::new_v4().simple())
}

/// Quote a PowerShell string literal.
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Prints the file's raw bytes as base64, or nothing when it does not exist.
fn read_script(path: &HostPath) -> String {
    let quoted = ps_quote(path.as_str());
    format!(
        "if (Test-Path -LiteralPath {quoted}) {{ \
         [System.Convert]::ToBase64String([System.IO.File]::ReadAllBytes({quoted})) }}"
    )
}

/// Writes the base64 payload read from stdin to `staged`.
fn stage_script(staged: &HostPath) -> String {
    format!(
        "[System.IO.File]::WriteAllBytes({}, \
         [System.Convert]::FromBase64String([Console]::In.ReadToEnd().Trim()))",
        ps_quote(staged.as_str())
    )
}

fn publish_script(staged: &HostPath, target: &HostPath) -> String {
    let mut script = String::new();
    if let Some(dir) = target.parent() {
        script.push_str(&format!(
            "New-Item -ItemType Directory -Path {} -Force | Out-Null; ",
            ps_quote(dir.as_str())
        ));
    }
    script.push_str(&format!(
        "Copy-Item -LiteralPath {} -Destination {} -Force",
        ps_quote(staged.as_str()),
        ps_quote(target.as_str())
    ));
    script
}

fn discard_script(staged: &HostPath) -> String {
    format!("Remove-Item -LiteralPath {} -Force", ps_quote(staged.as_str()))
}

fn decode_stdout(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    text.trim_start_matches('\u{feff}').to_string()
}

/// Decode the base64 printed by [`read_script`]. Empty output means no file.
fn decode_host_file(stdout: &str) -> Result<Option<String>, String> {
    let encoded: String = stdout.split_whitespace().collect();
    if encoded.is_empty() {
        return Ok(None);
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| format!("invalid base64: {e}"))?;
    let text = String::from_utf8(bytes).map_err(|e| format!("file is not UTF-8: {e}"))?;
    Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
}
