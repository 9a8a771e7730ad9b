// src/config/validate.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::model::{
    GlobalConfig, NotificationsConfig, NotifierTarget, RawGlobalConfig, RawRunConfig,
    RunConfiguration,
};
use crate::errors::{Result, RunnerError};

pub fn validate_global_config(cfg: &RawGlobalConfig) -> Result<()> {
    if cfg.log_file_count == Some(0) {
        return Err(RunnerError::ConfigError(
            "log_file_count must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.engine.binary.trim().is_empty() {
        return Err(RunnerError::ConfigError(
            "[engine].binary must not be empty".to_string(),
        ));
    }
    validate_notifications(&cfg.notifications)?;
    Ok(())
}

pub fn validate_run_config(cfg: &RawRunConfig) -> Result<()> {
    ensure_repository(cfg)?;
    validate_storages(cfg)?;
    validate_copies(cfg)?;
    validate_prunes_and_checks(cfg)?;
    if let Some(engine) = &cfg.engine {
        if engine.binary.trim().is_empty() {
            return Err(RunnerError::ConfigError(
                "[engine].binary must not be empty".to_string(),
            ));
        }
    }
    if let Some(notifications) = &cfg.notifications {
        validate_notifications(notifications)?;
    }
    Ok(())
}

fn ensure_repository(cfg: &RawRunConfig) -> Result<()> {
    if cfg.repository.as_os_str().is_empty() {
        return Err(RunnerError::ConfigError(
            "`repository` must be set to the directory being backed up".to_string(),
        ));
    }
    Ok(())
}

fn validate_storages(cfg: &RawRunConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in cfg.storage.iter() {
        if entry.name.trim().is_empty() {
            return Err(RunnerError::ConfigError(
                "[[storage]] entry has an empty name".to_string(),
            ));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(RunnerError::ConfigError(format!(
                "storage '{}' is declared more than once",
                entry.name
            )));
        }
        if entry.threads == 0 {
            return Err(RunnerError::ConfigError(format!(
                "storage '{}' must use at least one thread",
                entry.name
            )));
        }
    }
    Ok(())
}

fn validate_copies(cfg: &RawRunConfig) -> Result<()> {
    for entry in cfg.copy.iter() {
        for side in [&entry.from, &entry.to] {
            if !declares_storage(cfg, side) {
                return Err(RunnerError::ConfigError(format!(
                    "copy from '{}' to '{}' refers to unknown storage '{}'",
                    entry.from, entry.to, side
                )));
            }
        }
        if entry.from == entry.to {
            return Err(RunnerError::ConfigError(format!(
                "copy from '{}' cannot target the same storage",
                entry.from
            )));
        }
        if entry.threads == 0 {
            return Err(RunnerError::ConfigError(format!(
                "copy from '{}' to '{}' must use at least one thread",
                entry.from, entry.to
            )));
        }
    }
    Ok(())
}

fn validate_prunes_and_checks(cfg: &RawRunConfig) -> Result<()> {
    for entry in cfg.prune.iter() {
        if !declares_storage(cfg, &entry.storage) {
            return Err(RunnerError::ConfigError(format!(
                "prune refers to unknown storage '{}'",
                entry.storage
            )));
        }
        if entry.keep.is_empty() {
            return Err(RunnerError::ConfigError(format!(
                "prune of storage '{}' needs at least one `keep` rule",
                entry.storage
            )));
        }
    }
    for entry in cfg.check.iter() {
        if !declares_storage(cfg, &entry.storage) {
            return Err(RunnerError::ConfigError(format!(
                "check refers to unknown storage '{}'",
                entry.storage
            )));
        }
    }
    Ok(())
}

fn declares_storage(cfg: &RawRunConfig, name: &str) -> bool {
    cfg.storage.iter().any(|s| s.name == name)
}

fn validate_notifications(cfg: &NotificationsConfig) -> Result<()> {
    for target in cfg.on_skip.iter().chain(cfg.on_failure.iter()) {
        match target {
            NotifierTarget::Webhook { url, .. } => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(RunnerError::ConfigError(format!(
                        "webhook url must start with http:// or https:// (got '{url}')"
                    )));
                }
            }
            NotifierTarget::Command { command } => {
                if command.trim().is_empty() {
                    return Err(RunnerError::ConfigError(
                        "command notifier has an empty command".to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}

impl RunConfiguration {
    /// Validate `raw` and build the configuration named `name`.
    pub fn from_raw(name: impl Into<String>, path: PathBuf, raw: RawRunConfig) -> Result<Self> {
        validate_run_config(&raw)?;
        Ok(RunConfiguration::new_unchecked(name.into(), path, raw))
    }
}

impl GlobalConfig {
    /// Validate `raw` and resolve its directories against `storage_dir`.
    pub fn from_raw(storage_dir: &Path, raw: RawGlobalConfig) -> Result<Self> {
        validate_global_config(&raw)?;
        Ok(GlobalConfig::new_unchecked(storage_dir, raw))
    }
}
