//! # Configuration loader
//!
//! Reads the TOML file into [`EdgeConfig`]. Keys missing from the file take
//! their defaults from the config model; this module applies no validation
//! beyond what parsing requires.

use std::path::{Path, PathBuf};

use anyhow::Context;
use boulders_core::config::EdgeConfig;

/// Path of the TOML config file.
pub const CONFIG_PATH_ENV: &str = "BOULDERS_CONFIG";
/// Overrides `server.bind_address`.
pub const BIND_ADDRESS_ENV: &str = "BOULDERS_BIND";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`EdgeConfig`].
pub fn load_config(config_path: &Path) -> anyhow::Result<EdgeConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    EdgeConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// The file named by `BOULDERS_CONFIG`, if that variable is set and the file
/// exists.
pub fn resolve_config_path() -> Option<PathBuf> {
    resolve_from(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

fn resolve_from(candidate: Option<PathBuf>) -> Option<PathBuf> {
    candidate
        .filter(|path| !path.as_os_str().is_empty())
        .filter(|path| path.is_file())
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Config file if one resolves, defaults otherwise, then environment
/// overrides.
pub fn load_effective_config() -> anyhow::Result<(EdgeConfig, ConfigSource)> {
    let (mut config, source) = match resolve_config_path() {
        Some(path) => (load_config(&path)?, ConfigSource::File(path)),
        None => (EdgeConfig::default(), ConfigSource::Defaults),
    };
    apply_bind_override(&mut config, std::env::var(BIND_ADDRESS_ENV).ok());
    Ok((config, source))
}

fn apply_bind_override(config: &mut EdgeConfig, bind: Option<String>) {
    if let Some(bind) = bind.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()) {
        config.server.bind_address = bind;
    }
}
