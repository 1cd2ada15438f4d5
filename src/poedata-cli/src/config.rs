//! Configuration management for poedata CLI

use anyhow::{bail, Context, Result};
use poedata::source::DESCRIPTION_EXTENSION;
use poedata::{Locale, RunPaths};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name looked up in the working root
pub const CONFIG_FILE_NAME: &str = "poedata.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Game language, also the table directory name
    pub name: String,
    /// Output directory code
    pub code: String,
}

/// Input and output locations; relative paths are taken from the root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub descriptions_dir: PathBuf,
    pub description_extension: String,
    pub tables_dir: PathBuf,
    pub api_stats: PathBuf,
    pub api_items: PathBuf,
    pub api_static: PathBuf,
    pub output_dir: PathBuf,
    pub dump_dir: PathBuf,
    pub icon_cdn: String,
    pub locales: Vec<LocaleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            descriptions_dir: PathBuf::from("descriptions"),
            description_extension: DESCRIPTION_EXTENSION.to_string(),
            tables_dir: PathBuf::from("tables"),
            api_stats: PathBuf::from("api_stats.json"),
            api_items: PathBuf::from("api_items.json"),
            api_static: PathBuf::from("api_static.json"),
            output_dir: PathBuf::from("../renderer/public/data"),
            dump_dir: PathBuf::from("."),
            icon_cdn: "https://web.poecdn.com/".to_string(),
            locales: vec![LocaleConfig {
                name: "English".to_string(),
                code: "en".to_string(),
            }],
        }
    }
}

impl Config {
    /// Get the path to the per-user config file
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("poedata");

        Ok(config_dir.join("config.toml"))
    }

    /// Find the config file to use, if any
    ///
    /// An explicit path must exist. Otherwise `poedata.toml` in the root is
    /// preferred over the per-user file.
    pub fn locate(root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = root.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Ok(Some(local));
        }

        match Self::user_config_path() {
            Ok(path) if path.exists() => Ok(Some(path)),
            _ => Ok(None),
        }
    }

    /// Load configuration, or defaults when no file is found
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(root, explicit)? {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Resolve all locations against the root
    pub fn run_paths(&self, root: &Path) -> RunPaths {
        RunPaths {
            descriptions_dir: root.join(&self.descriptions_dir),
            description_extension: self.description_extension.clone(),
            tables_dir: root.join(&self.tables_dir),
            api_stats: root.join(&self.api_stats),
            api_items: root.join(&self.api_items),
            api_static: root.join(&self.api_static),
            output_dir: root.join(&self.output_dir),
            dump_dir: root.join(&self.dump_dir),
        }
    }

    /// Configured locales, or only the one with the given code
    pub fn select_locales(&self, code: Option<&str>) -> Result<Vec<Locale>> {
        let locales: Vec<Locale> = self
            .locales
            .iter()
            .filter(|locale| code.map_or(true, |code| locale.code == code))
            .map(|locale| Locale::new(&locale.name, &locale.code))
            .collect();

        if locales.is_empty() {
            match code {
                Some(code) => bail!("Locale '{}' is not configured", code),
                None => bail!("No locales configured"),
            }
        }

        Ok(locales)
    }
}
