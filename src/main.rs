use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use deep_report::api::ApiClient;
use deep_report::app::{App, AppEvent};
use deep_report::config::Config;
use deep_report::keybindings::KeybindingRegistry;
use deep_report::theme::ThemeVariant;
use deep_report::ui;

/// Get the config directory path (~/.config/deep-report/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("deep-report"))
}

#[derive(Parser, Debug)]
#[command(
    name = "deep-report",
    about = "Terminal client for the Deep-Report AI news feed"
)]
struct Args {
    /// Base URL of the article API (overrides the config file)
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Config file (default: ~/.config/deep-report/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Color theme: dark or light (overrides the config file)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

/// Logs share the terminal with the UI, so `--log-file` is the way to see
/// them while it runs. `RUST_LOG` selects the level.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!(%warning, "Keybinding override skipped");
    }

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = ThemeVariant::from_str_name(theme_name).unwrap_or_else(|| {
        tracing::warn!(theme = %theme_name, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    let api_base = config.api_base(args.api_base.as_deref());
    let api = ApiClient::new(api_base, config.request_timeout())
        .with_context(|| format!("Invalid API base URL '{}'", api_base))?;
    tracing::info!(api_base = %api.base_url(), theme = theme.name(), "Starting");

    let mut app = App::new(api, theme, keybindings, config.load_more_threshold);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
