//! Binary entry point for gistpad.
//!
//! Runs the gistpad MCP server over stdio.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gistpad::config::{FeatureFlags, GistpadConfig};
use gistpad::mcp::{GistContext, JsonRpcNotifier, McpServer, SessionEnd, stdout_output};
use gistpad::observability::{self, LoggingConfig};
use gistpad::store::BackgroundRefresh;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Gistpad - personal notes, daily todos and prompts backed by GitHub Gists.
#[derive(Parser)]
#[command(name = "gistpad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "GISTPAD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio (the default).
    Serve(ServeArgs),
}

/// Options for `serve`. Flags only enable features; the config file can
/// enable them too.
#[derive(Args, Default)]
struct ServeArgs {
    /// Only expose gists made up of markdown files.
    #[arg(long)]
    markdown: bool,

    /// List starred gists as resources.
    #[arg(long)]
    starred: bool,

    /// List archived gists as resources.
    #[arg(long)]
    archived: bool,

    /// List the daily notes gist as a resource.
    #[arg(long)]
    daily: bool,

    /// Serve prompts from the prompts gist and enable the prompt tools.
    #[arg(long)]
    prompts: bool,

    /// Seconds between background refreshes of the gist cache.
    #[arg(long)]
    refresh_interval_secs: Option<u64>,
}

impl ServeArgs {
    const fn features(&self) -> FeatureFlags {
        FeatureFlags {
            markdown_only: self.markdown,
            include_starred: self.starred,
            include_archived: self.archived,
            include_daily: self.daily,
            include_prompts: self.prompts,
        }
    }
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match GistpadConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(&config.logging, cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Some(Commands::Serve(args)) => cmd_serve(config, args),
        None => cmd_serve(config, ServeArgs::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "gistpad exited with an error");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Serve command.
fn cmd_serve(config: GistpadConfig, args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config.with_features(args.features());
    if let Some(secs) = args.refresh_interval_secs {
        config = config.with_refresh_interval(Duration::from_secs(secs));
    }

    let client = config
        .github_client()
        .context("GitHub authentication is required")?;

    let output = stdout_output();
    let notifier = Arc::new(JsonRpcNotifier::new(Arc::clone(&output)));
    let context = Arc::new(GistContext::new(
        Arc::new(client),
        notifier,
        config.features,
    ));
    tracing::info!(features = ?config.features, "Starting gistpad");

    let mut refresh = BackgroundRefresh::spawn(context.refreshables(), config.refresh_interval)
        .context("failed to start background refresh")?;

    let session = McpServer::new(Arc::clone(&context))
        .with_output(output)
        .spawn_stdio()
        .context("failed to start MCP server")?;
    let interrupter = session.interrupter();
    ctrlc::set_handler(move || interrupter.interrupt())
        .context("failed to install signal handler")?;

    let ended = session.wait().context("MCP server failed");
    if matches!(ended, Ok(SessionEnd::Interrupted)) {
        tracing::info!("Interrupted, shutting down");
    }

    // The stdin thread may still be blocked; returning from main ends it.
    refresh.shutdown();
    ended.map(drop)
}
