//! phpstorm-mcp - register MCP servers with GitHub Copilot for PhpStorm
//!
//! Usage:
//!   phpstorm-mcp install --name laravel-boost -- php artisan boost:mcp
//!   phpstorm-mcp translate --cross-boundary -- ./vendor/bin/sail artisan boost:mcp
//!   phpstorm-mcp path

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phpstorm_mcp_core::bridge::WslBridge;
use phpstorm_mcp_core::client::{ClientContext, McpClient, PhpStormCopilot};
use phpstorm_mcp_core::mcp::{McpInstaller, ServerEntry};
use phpstorm_mcp_core::settings::Settings;
use phpstorm_mcp_core::types::{DEFAULT_LAUNCHER, ExecutionContext, Platform};

#[derive(Parser)]
#[command(name = "phpstorm-mcp")]
#[command(about = "Register MCP servers with GitHub Copilot for PhpStorm", long_about = None)]
struct Cli {
    /// Settings file (defaults to ~/.config/phpstorm-mcp/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a server entry into the MCP config file
    Install(InstallArgs),

    /// Show how a command would be rewritten, without writing anything
    Translate(TranslateArgs),

    /// Print the MCP config file location
    Path,
}

#[derive(Args)]
struct InstallArgs {
    /// Server name inside the config file
    #[arg(long)]
    name: String,

    /// Project root (defaults to the current directory)
    #[arg(long)]
    project: Option<PathBuf>,

    /// Environment variable for the server, KEY=VALUE (repeatable)
    #[arg(long = "env", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// Command followed by its arguments
    #[arg(last = true, required = true)]
    command: Vec<String>,
}

#[derive(Args)]
struct TranslateArgs {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    project: Option<PathBuf>,

    /// Translate for a WSL process launched by the Windows host
    #[arg(long)]
    cross_boundary: bool,

    /// Command followed by its arguments
    #[arg(last = true, required = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phpstorm_mcp=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_ref())?;

    match cli.command {
        Commands::Install(args) => run_install(&settings, args),
        Commands::Translate(args) => run_translate(&settings, args),
        Commands::Path => run_path(&settings),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let path = match path {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };
    Settings::load(&path)
}

fn run_install(settings: &Settings, args: InstallArgs) -> Result<()> {
    let project_root = project_root(args.project)?;
    let context =
        ExecutionContext::from_env(project_root).with_launcher(settings.mcp.launcher.clone());
    tracing::debug!(?context, "Detected execution context");

    let (command, command_args) = split_command(args.command)?;
    let mut entry = ServerEntry::new(command, command_args);
    if !args.env.is_empty() {
        entry = entry.with_env(args.env.into_iter().collect::<BTreeMap<_, _>>());
    }

    let client = PhpStormCopilot::from_settings(settings);
    let target = client.mcp_target(&ClientContext::from_env()?, Platform::current())?;

    let installer = McpInstaller::new(WslBridge::new(settings.bridge.clone()))
        .with_translator(settings.translator());
    let installed = installer.install(
        &target,
        client.mcp_config_key(),
        &args.name,
        &entry,
        &context,
    )?;

    if !installed {
        anyhow::bail!("Failed to register MCP server '{}'", args.name);
    }

    if context.is_cross_boundary() {
        println!(
            "Registered '{}' for {} on the Windows host",
            args.name,
            client.display_name()
        );
    } else {
        println!(
            "Registered '{}' for {} in {}",
            args.name,
            client.display_name(),
            target.native_path().display()
        );
    }
    Ok(())
}

fn run_translate(settings: &Settings, args: TranslateArgs) -> Result<()> {
    let project_root = project_root(args.project)?;
    let context = if args.cross_boundary {
        ExecutionContext::CrossBoundary {
            project_root,
            launcher: settings.mcp.launcher.clone(),
        }
    } else {
        ExecutionContext::Native { project_root }
    };

    let (command, command_args) = split_command(args.command)?;
    let launch = settings
        .translator()
        .translate(&command, &command_args, &context);

    println!("{}", serde_json::to_string_pretty(&launch)?);
    Ok(())
}

fn run_path(settings: &Settings) -> Result<()> {
    let client = PhpStormCopilot::from_settings(settings);
    let path = client.mcp_config_path(&ClientContext::from_env()?, Platform::current())?;
    println!("{}", path.display());
    Ok(())
}

fn project_root(project: Option<PathBuf>) -> Result<String> {
    let root = match project {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let root = std::path::absolute(&root)
        .with_context(|| format!("Failed to resolve project path: {}", root.display()))?;
    Ok(root.to_string_lossy().into_owned())
}

fn split_command(mut command: Vec<String>) -> Result<(String, Vec<String>)> {
    if command.is_empty() {
        anyhow::bail!("A command is required");
    }
    let program = command.remove(0);
    Ok((program, command))
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
