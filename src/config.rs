use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::normalizer::DEFAULT_ARCHITECTURES;

/// Root configuration, deserialized from `.rpm-license-updater/config.toml`.
///
/// Every key is optional; missing keys take the built-in defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which repository query backs the lookups.
    pub backend: Backend,
    /// Program invoked for repository queries.
    pub dnf_command: String,
    /// Rows whose flag column equals this (case-insensitively) get looked up.
    pub eligible_value: String,
    /// Suffixes stripped from package names before lookup.
    pub architectures: Vec<String>,
    /// Rows shown from each end of the table when no output file is given.
    pub preview_rows: usize,
    pub columns: ColumnConfig,
}

/// Header names of the columns the updater reads and writes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub flag: String,
    pub package: String,
    pub license: String,
}

/// How available builds are discovered and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `dnf repoquery --queryformat` over a cached session; builds ordered by EVR.
    Repoquery,
    /// `dnf repoquery --info` text; builds ordered by source RPM release.
    Info,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: Backend::Repoquery,
            dnf_command: "dnf".to_string(),
            eligible_value: "no".to_string(),
            architectures: DEFAULT_ARCHITECTURES.iter().map(|a| a.to_string()).collect(),
            preview_rows: 20,
            columns: ColumnConfig::default(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            flag: "UBI?".to_string(),
            package: "package".to_string(),
            license: "License".to_string(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<dir>/.rpm-license-updater/config.toml`
/// 3. `~/.config/rpm-license-updater/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local = dir.join(".rpm-license-updater").join("config.toml");
    if local.exists() {
        return read_config(&local);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("rpm-license-updater")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
