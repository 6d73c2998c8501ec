use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use toolsync::client::HttpClient;
use toolsync::pull::pull_scripts;
use toolsync::sync::{Progress, SyncEvent, SyncOptions, SyncRun};

const DEFAULT_SERVER_URL: &str = "http://localhost:8001";

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolsync")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolsync.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Flags override the saved context; the context overrides the default
fn resolve_connection(config: &Config, url: Option<&String>, token: Option<&String>) -> (String, String) {
    let context = config.current();

    let url = url
        .cloned()
        .or_else(|| context.map(|c| c.server_url.clone()).filter(|u| !u.is_empty()))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let token = token
        .cloned()
        .or_else(|| context.map(|c| c.access_token.clone()))
        .unwrap_or_default();

    if let Some(context) = context {
        if !context.email.is_empty() {
            info!("Using saved credentials (logged in as {})", context.email);
        }
    }

    (url, token)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Sync {
            dir,
            url,
            token,
            prune,
            build,
        } => handle_sync(config, dir, url.as_ref(), token.as_ref(), *prune, *build).await,
        Commands::Pull { dir, url, token } => {
            handle_pull(config, dir, url.as_ref(), token.as_ref()).await
        }
        Commands::Logo {
            tool,
            file,
            url,
            token,
        } => handle_logo(config, tool, file, url.as_ref(), token.as_ref()).await,
        Commands::Whoami => handle_whoami(config),
        Commands::Logout => handle_logout(),
    }
}

async fn handle_sync(
    config: &Config,
    dir: &Path,
    url: Option<&String>,
    token: Option<&String>,
    prune: bool,
    build: bool,
) -> Result<()> {
    let (url, token) = resolve_connection(config, url, token);
    info!("Syncing {} against {}", dir.display(), url);

    let client = HttpClient::new(url, token).context("Failed to create HTTP client")?;
    let (progress, mut events) = Progress::channel();

    // The printer must never block the engine; it drains an unbounded
    // channel and exits when the run drops its sender.
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SyncEvent::Progress(message) => println!("{}", message.cyan()),
                SyncEvent::Done(summary) => {
                    println!("{} {}", "Summary:".green(), summary);
                }
            }
        }
    });

    let run = SyncRun::new(client, dir, progress);
    let result = run.run(SyncOptions { prune, build }).await;
    printer.await.ok();

    let summary = result.context("Sync failed")?;
    if summary.failed > 0 {
        println!("{} {} file(s) failed, see the log for details", "Warning:".yellow(), summary.failed);
    }
    Ok(())
}

async fn handle_pull(
    config: &Config,
    dir: &Path,
    url: Option<&String>,
    token: Option<&String>,
) -> Result<()> {
    let (url, token) = resolve_connection(config, url, token);
    println!("{} Pulling scripts from {} into '{}'...", "Pull:".cyan(), url, dir.display());

    let client = HttpClient::new(url, token).context("Failed to create HTTP client")?;
    let pulled = pull_scripts(&client, dir).await.context("Pull failed")?;

    println!("{} Pulled {} scripts into '{}'", "Done:".green(), pulled, dir.display());
    Ok(())
}

async fn handle_logo(
    config: &Config,
    tool: &str,
    file: &Path,
    url: Option<&String>,
    token: Option<&String>,
) -> Result<()> {
    let Some((category, name)) = tool.split_once('/') else {
        bail!("expected tool reference as category/name, got '{tool}'");
    };

    let svg_code = fs::read_to_string(file)
        .context(format!("Failed to read SVG file {}", file.display()))?;

    let (url, token) = resolve_connection(config, url, token);
    let client = HttpClient::new(url, token).context("Failed to create HTTP client")?;

    client
        .upload_logo(category, name, &svg_code)
        .await
        .context(format!("Logo upload failed for {tool}"))?;

    println!("{} Uploaded logo for {}", "Done:".green(), tool);
    Ok(())
}

fn handle_whoami(config: &Config) -> Result<()> {
    match config.current() {
        Some(context) if !context.email.is_empty() || !context.server_url.is_empty() => {
            println!("{} {}", "Logged in as:".green(), context.email);
            println!("{} {}", "Server:".green(), context.server_url);
        }
        _ => {
            println!("{}", "No saved context; pass --url/--token or create a config".yellow());
        }
    }
    Ok(())
}

fn handle_logout() -> Result<()> {
    let path = Config::config_path();
    match fs::remove_file(&path) {
        Ok(()) => println!("{}", "Logged out successfully".green()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("{}", "No saved configuration".yellow());
        }
        Err(e) => return Err(e).context("Failed to remove config"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
