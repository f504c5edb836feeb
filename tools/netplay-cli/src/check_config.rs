//! Check-config command - validate a netplay.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use netplay_core::SessionConfig;
use netplay_core::config::default_config_path;

/// Arguments for the check-config command
#[derive(Args)]
pub struct CheckConfigArgs {
    /// Config file (defaults to the per-user netplay.toml)
    pub path: Option<PathBuf>,
}

/// Execute the check-config command
pub fn execute(args: CheckConfigArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => default_config_path().context("Could not determine the config directory")?,
    };

    let rendered = check(&path)?;

    println!("=== {} ===", path.display());
    print!("{}", rendered);
    Ok(())
}

/// Load and validate `path`, returning the effective config as TOML
fn check(path: &Path) -> Result<String> {
    let config = SessionConfig::load_from_path(path)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config.to_toml_string()?)
}
