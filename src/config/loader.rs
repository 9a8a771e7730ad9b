// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{GlobalConfig, RawGlobalConfig, RawRunConfig, RunConfiguration};
use crate::errors::{Result, RunnerError};

/// Default global config name (`<storage>/backup-runner.toml`).
pub const DEFAULT_GLOBAL_CONFIG: &str = "backup-runner";

/// Directory under `$HOME` used when `--sd` is not given.
pub const DEFAULT_STORAGE_DIR: &str = ".backup-runner";

/// Resolve the storage directory holding the global config, the per-run
/// configuration files, lock files and logs.
pub fn resolve_storage_dir(cli_override: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = cli_override.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    match std::env::var_os("HOME").filter(|h| !h.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(DEFAULT_STORAGE_DIR)),
        None => Err(RunnerError::ConfigError(
            "cannot determine storage directory: HOME is not set (use --sd)".to_string(),
        )),
    }
}

/// Load the global settings.
///
/// A missing file is fine when no name was given explicitly; defaults are
/// used. An explicitly named file must exist.
pub fn load_global(storage_dir: &Path, name: Option<&str>) -> Result<GlobalConfig> {
    let explicit = name.filter(|n| !n.trim().is_empty());
    let path = config_path(storage_dir, explicit.unwrap_or(DEFAULT_GLOBAL_CONFIG));

    if !path.exists() {
        if explicit.is_some() {
            return Err(RunnerError::ConfigError(format!(
                "global configuration file {} does not exist",
                path.display()
            )));
        }
        debug!(path = %path.display(), "no global configuration file; using defaults");
        return Ok(GlobalConfig::defaults(storage_dir));
    }

    let contents = fs::read_to_string(&path)?;
    let raw: RawGlobalConfig = toml::from_str(&contents)?;
    let global = GlobalConfig::from_raw(storage_dir, raw)?;

    debug!(path = %path.display(), "global configuration loaded");
    Ok(global)
}

/// Map a `-f` selector to `(configuration name, file path)`.
///
/// An existing file path is used as is; anything else is treated as a
/// configuration name under the storage directory.
pub fn resolve_run_config(storage_dir: &Path, selector: &str) -> (String, PathBuf) {
    let candidate = PathBuf::from(selector);
    let path = if candidate.is_file() {
        candidate
    } else {
        config_path(storage_dir, selector)
    };

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| selector.to_string());

    (name, path)
}

/// Load and validate a per-run configuration.
pub fn load_run_config(storage_dir: &Path, selector: &str) -> Result<RunConfiguration> {
    let (name, path) = resolve_run_config(storage_dir, selector);
    let raw = load_raw_run_config(&path)?;
    let config = RunConfiguration::from_raw(name, path, raw)?;

    debug!(config = %config.name, path = %config.path.display(), "run configuration loaded");
    Ok(config)
}

/// Only performs TOML deserialization; see [`load_run_config`] for the
/// validated entry point.
pub fn load_raw_run_config(path: impl AsRef<Path>) -> Result<RawRunConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|err| {
        RunnerError::ConfigError(format!("cannot read {}: {err}", path.display()))
    })?;

    let config: RawRunConfig = toml::from_str(&contents)?;

    Ok(config)
}

fn config_path(storage_dir: &Path, name: &str) -> PathBuf {
    if name.ends_with(".toml") {
        storage_dir.join(name)
    } else {
        storage_dir.join(format!("{name}.toml"))
    }
}
