//! Launch command translation.
//!
//! The command handed to the installer is written for a POSIX shell running in
//! the project directory. The IDE launches it from somewhere else, so the pair
//! is rewritten depending on the [`ExecutionContext`]:
//!
//! | Shape              | Cross-boundary                                        | Native                         |
//! |--------------------|-------------------------------------------------------|--------------------------------|
//! | wrapped launcher   | `wsl.exe --cd <root> ./vendor/bin/sail <args>`        | `bash -c "cd <root> && ..."`   |
//! | already forwarded  | unchanged                                             | unchanged                      |
//! | bare interpreter   | `wsl.exe --cd <root> <command> <args>`                | unchanged                      |

use crate::mcp::spec::LaunchSpec;
use crate::types::ExecutionContext;

/// Project-local wrapper recognised when no other is configured.
pub const DEFAULT_WRAPPER: &str = "vendor/bin/sail";

/// Classification of a launch command, evaluated in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandShape {
    /// A project-local wrapper script. `wrapper` is its `./`-relative POSIX path.
    WrappedLauncher { wrapper: String },
    /// The command already crosses into WSL.
    Forwarded,
    /// Anything else, typically an interpreter path.
    BareInterpreter,
}

impl CommandShape {
    pub fn classify(command: &str, wrapper_suffix: &str) -> Self {
        if let Some(wrapper) = match_wrapper(command, &normalize_suffix(wrapper_suffix)) {
            return CommandShape::WrappedLauncher { wrapper };
        }
        if is_forwarding_launcher(command) {
            return CommandShape::Forwarded;
        }
        CommandShape::BareInterpreter
    }
}

/// Translator with a configurable wrapper suffix.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    wrapper_suffix: String,
}

impl Default for CommandTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_WRAPPER)
    }
}

impl CommandTranslator {
    pub fn new(wrapper_suffix: impl Into<String>) -> Self {
        Self {
            wrapper_suffix: normalize_suffix(&wrapper_suffix.into()),
        }
    }

    pub fn wrapper_suffix(&self) -> &str {
        &self.wrapper_suffix
    }

    pub fn translate(
        &self,
        command: &str,
        args: &[String],
        context: &ExecutionContext,
    ) -> LaunchSpec {
        let shape = CommandShape::classify(command, &self.wrapper_suffix);
        match context {
            ExecutionContext::CrossBoundary {
                project_root,
                launcher,
            } => translate_cross_boundary(shape, command, args, project_root, launcher),
            ExecutionContext::Native { project_root } => {
                translate_native(shape, command, args, project_root)
            }
        }
    }
}

/// Translate using the default wrapper suffix.
pub fn translate(command: &str, args: &[String], context: &ExecutionContext) -> LaunchSpec {
    CommandTranslator::default().translate(command, args, context)
}

fn translate_cross_boundary(
    shape: CommandShape,
    command: &str,
    args: &[String],
    project_root: &str,
    launcher: &str,
) -> LaunchSpec {
    let target = match shape {
        CommandShape::WrappedLauncher { wrapper } => wrapper,
        CommandShape::Forwarded => return LaunchSpec::new(command, args.to_vec()),
        CommandShape::BareInterpreter => command.to_string(),
    };

    let mut forwarded = Vec::with_capacity(args.len() + 3);
    forwarded.push("--cd".to_string());
    forwarded.push(project_root.to_string());
    forwarded.push(target);
    forwarded.extend(args.iter().cloned());

    LaunchSpec::new(launcher, forwarded)
}

fn translate_native(
    shape: CommandShape,
    command: &str,
    args: &[String],
    project_root: &str,
) -> LaunchSpec {
    match shape {
        CommandShape::WrappedLauncher { wrapper } => {
            let mut script = format!("cd {} && {}", shell_quote(project_root), wrapper);
            for arg in args {
                script.push(' ');
                script.push_str(&shell_quote(arg));
            }
            LaunchSpec::new("bash", vec!["-c".to_string(), script])
        }
        CommandShape::Forwarded | CommandShape::BareInterpreter => {
            LaunchSpec::new(command, args.to_vec())
        }
    }
}

/// `vendor/bin/sail` form of a wrapper path written with either separator.
fn normalize_suffix(suffix: &str) -> String {
    suffix
        .replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
}

/// Returns the normalized `./<suffix>` path when `command` ends with the wrapper
/// suffix under either separator convention.
fn match_wrapper(command: &str, suffix: &str) -> Option<String> {
    if suffix.is_empty() {
        return None;
    }
    let posix = command.replace('\\', "/");
    let relative = posix.strip_prefix("./").unwrap_or(&posix);
    let matches = relative == suffix
        || posix
            .strip_suffix(suffix)
            .is_some_and(|head| head.ends_with('/'));
    matches.then(|| format!("./{suffix}"))
}

fn is_forwarding_launcher(command: &str) -> bool {
    let program = command
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(command)
        .to_ascii_lowercase();
    program == "wsl" || program == "wsl.exe"
}

/// Single-quote a string for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
