//! Configuration command handlers
//!
//! Handles the `config` subcommand for inspecting and creating poedata.toml.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::{Config, CONFIG_FILE_NAME};

/// Handle the config command
///
/// # Arguments
/// * `root` - Working root the configuration applies to
/// * `explicit` - Config file given on the command line
/// * `show` - Show the effective configuration
/// * `init` - Write the defaults to `poedata.toml` in the root
pub fn handle(root: &Path, explicit: Option<&Path>, show: bool, init: bool) -> Result<()> {
    if init {
        init_config(root)?;
    }

    if show {
        show_config(root, explicit)?;
    } else if !init {
        show_usage();
    }

    Ok(())
}

/// Display the effective configuration and where it came from
fn show_config(root: &Path, explicit: Option<&Path>) -> Result<()> {
    match Config::locate(root, explicit)? {
        Some(path) => println!("# Config file: {}", path.display()),
        None => println!("# No config file found, using defaults"),
    }

    let config = Config::load(root, explicit)?;
    let contents = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    print!("{}", contents);

    Ok(())
}

/// Write the default configuration to the root
fn init_config(root: &Path) -> Result<()> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    Config::default().save(&path)?;
    println!("Config saved to: {}", path.display());

    Ok(())
}

/// Show usage help for the config command
fn show_usage() {
    println!("Usage: poedata config --show");
    println!("   or: poedata config --init");
}
