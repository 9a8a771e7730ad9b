// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Global settings as read from `<storage>/backup-runner.toml`.
///
/// ```toml
/// lock_directory = "locks"
/// log_directory = "logs"
/// log_file_count = 5
///
/// [engine]
/// binary = "/usr/local/bin/duplicacy"
///
/// [notifications]
/// on_failure = [{ type = "webhook", url = "https://hooks.example.com/backup" }]
/// on_skip = [{ type = "command", command = "logger -t backup-runner" }]
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGlobalConfig {
    #[serde(default)]
    pub lock_directory: Option<PathBuf>,

    #[serde(default)]
    pub log_directory: Option<PathBuf>,

    #[serde(default)]
    pub log_file_count: Option<usize>,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Validated global settings with every directory resolved.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub storage_dir: PathBuf,
    pub lock_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_file_count: usize,
    pub engine: EngineSection,
    pub notifications: NotificationsConfig,
}

pub const DEFAULT_LOG_FILE_COUNT: usize = 5;

impl GlobalConfig {
    /// Defaults for a storage directory with no global config file.
    pub fn defaults(storage_dir: impl Into<PathBuf>) -> Self {
        let storage_dir = storage_dir.into();
        Self {
            lock_dir: storage_dir.clone(),
            log_dir: storage_dir.join("logs"),
            log_file_count: DEFAULT_LOG_FILE_COUNT,
            engine: EngineSection::default(),
            notifications: NotificationsConfig::default(),
            storage_dir,
        }
    }

    pub(crate) fn new_unchecked(storage_dir: &Path, raw: RawGlobalConfig) -> Self {
        let resolve = |p: PathBuf| {
            if p.is_absolute() {
                p
            } else {
                storage_dir.join(p)
            }
        };
        let defaults = Self::defaults(storage_dir);
        Self {
            lock_dir: raw.lock_directory.map(resolve).unwrap_or(defaults.lock_dir),
            log_dir: raw.log_directory.map(resolve).unwrap_or(defaults.log_dir),
            log_file_count: raw.log_file_count.unwrap_or(defaults.log_file_count),
            engine: raw.engine,
            notifications: raw.notifications,
            storage_dir: defaults.storage_dir,
        }
    }
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Backup engine executable, looked up on `PATH` when not absolute.
    #[serde(default = "default_engine_binary")]
    pub binary: String,
}

fn default_engine_binary() -> String {
    "duplicacy".to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            binary: default_engine_binary(),
        }
    }
}

/// `[notifications]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub on_skip: Vec<NotifierTarget>,

    #[serde(default)]
    pub on_failure: Vec<NotifierTarget>,
}

impl NotificationsConfig {
    pub fn has_failure_notifier(&self) -> bool {
        !self.on_failure.is_empty()
    }
}

/// One notification sink.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotifierTarget {
    /// HTTP POST of a JSON document `{ subject, kind, body }`.
    Webhook {
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
    },
    /// Shell command receiving the body on stdin.
    Command { command: String },
}

/// Per-configuration file, e.g. `<storage>/photos.toml`.
///
/// ```toml
/// repository = "/srv/photos"
///
/// [[storage]]
/// name = "default"
/// threads = 4
///
/// [[storage]]
/// name = "offsite"
///
/// [[copy]]
/// from = "default"
/// to = "offsite"
///
/// [[prune]]
/// storage = "default"
/// keep = ["0:365", "30:180", "7:30", "1:7"]
/// all = true
///
/// [[check]]
/// storage = "default"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRunConfig {
    #[serde(default)]
    pub repository: PathBuf,

    #[serde(default)]
    pub storage: Vec<StorageEntry>,

    #[serde(default)]
    pub copy: Vec<CopyEntry>,

    #[serde(default)]
    pub prune: Vec<PruneEntry>,

    #[serde(default)]
    pub check: Vec<CheckEntry>,

    /// Replaces the global `[engine]` section when present.
    #[serde(default)]
    pub engine: Option<EngineSection>,

    /// Replaces the global `[notifications]` section when present.
    #[serde(default)]
    pub notifications: Option<NotificationsConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageEntry {
    pub name: String,
    #[serde(default = "default_threads")]
    pub threads: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CopyEntry {
    pub from: String,
    pub to: String,
    #[serde(default = "default_threads")]
    pub threads: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PruneEntry {
    pub storage: String,
    #[serde(default)]
    pub keep: Vec<String>,
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckEntry {
    pub storage: String,
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub tabular: bool,
}

fn default_threads() -> u32 {
    1
}

/// A loaded, validated backup target. Immutable once built.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    /// Lock key and run log stem.
    pub name: String,
    pub path: PathBuf,
    pub repository: PathBuf,
    pub storage: Vec<StorageEntry>,
    pub copy: Vec<CopyEntry>,
    pub prune: Vec<PruneEntry>,
    pub check: Vec<CheckEntry>,
    pub engine: Option<EngineSection>,
    pub notifications: Option<NotificationsConfig>,
}

impl RunConfiguration {
    pub(crate) fn new_unchecked(name: String, path: PathBuf, raw: RawRunConfig) -> Self {
        Self {
            name,
            path,
            repository: raw.repository,
            storage: raw.storage,
            copy: raw.copy,
            prune: raw.prune,
            check: raw.check,
            engine: raw.engine,
            notifications: raw.notifications,
        }
    }

    /// Engine settings, preferring the per-configuration override.
    pub fn effective_engine<'a>(&'a self, global: &'a GlobalConfig) -> &'a EngineSection {
        self.engine.as_ref().unwrap_or(&global.engine)
    }

    /// Notifier settings, preferring the per-configuration override.
    pub fn effective_notifications<'a>(
        &'a self,
        global: &'a GlobalConfig,
    ) -> &'a NotificationsConfig {
        self.notifications.as_ref().unwrap_or(&global.notifications)
    }
}
