//! scanmatch - Entry Point

use clap::Parser;
use scanmatch::config::{loader, KeyBindings};
use scanmatch::lookup::catalog::default_catalog_path;
use scanmatch::lookup::{CatalogLookup, LookupWorker};
use scanmatch::model::AppError;
use scanmatch::view::ColorConfig;
use std::path::PathBuf;
use tracing::info;

/// Barcode scan station: capture a reference code, then check items against it
#[derive(Parser, Debug)]
#[command(name = "scanmatch")]
#[command(version)]
#[command(about = "Terminal station for verifying scanned items against a reference code")]
pub struct Args {
    /// Record catalog (TOML, or JSON with a .json extension)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Inactivity gap in milliseconds that completes a scan without Enter
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub scan_timeout_ms: Option<u64>,

    /// How long a comparison result stays on screen, in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub result_ms: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = loader::load_config_with_precedence(args.config.clone())
            .map_err(AppError::from)?;
        let merged = loader::merge_config(config_file);
        let with_env = loader::apply_env_overrides(merged).map_err(AppError::from)?;
        loader::apply_cli_overrides(
            with_env,
            args.catalog.clone(),
            args.scan_timeout_ms,
            args.result_ms,
        )
        .validate()
        .map_err(AppError::from)?
    };

    let key_bindings = KeyBindings::default()
        .with_overrides(&config.keybindings)
        .map_err(AppError::from)?;

    scanmatch::logging::init(&config.log_file_path).map_err(AppError::from)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let catalog = CatalogLookup::load_configured(&config.catalog_path, default_catalog_path())
        .map_err(AppError::from)?;

    let worker = LookupWorker::spawn(catalog).map_err(AppError::from)?;

    scanmatch::view::run(
        config.workflow_settings(),
        Box::new(worker),
        key_bindings,
        ColorConfig::from_env_and_args(args.no_color),
    )?;

    Ok(())
}
