#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use backup_runner::cli::CliArgs;
use backup_runner::config::{
    CheckEntry, CopyEntry, PruneEntry, RawRunConfig, RunConfiguration, StorageEntry,
};
use tempfile::TempDir;

/// Builder for `RunConfiguration` to simplify test setup.
pub struct RunConfigBuilder {
    config: RawRunConfig,
}

impl RunConfigBuilder {
    pub fn new(repository: &str) -> Self {
        Self {
            config: RawRunConfig {
                repository: PathBuf::from(repository),
                ..RawRunConfig::default()
            },
        }
    }

    pub fn storage(mut self, name: &str) -> Self {
        self.config.storage.push(StorageEntry {
            name: name.to_string(),
            threads: 1,
        });
        self
    }

    pub fn copy(mut self, from: &str, to: &str) -> Self {
        self.config.copy.push(CopyEntry {
            from: from.to_string(),
            to: to.to_string(),
            threads: 1,
        });
        self
    }

    pub fn prune(mut self, storage: &str, keep: &[&str]) -> Self {
        self.config.prune.push(PruneEntry {
            storage: storage.to_string(),
            keep: keep.iter().map(|k| k.to_string()).collect(),
            all: false,
        });
        self
    }

    pub fn check(mut self, storage: &str) -> Self {
        self.config.check.push(CheckEntry {
            storage: storage.to_string(),
            all: false,
            tabular: false,
        });
        self
    }

    pub fn build(self, name: &str) -> RunConfiguration {
        RunConfiguration::from_raw(name, PathBuf::from(format!("{name}.toml")), self.config)
            .expect("Failed to build valid run configuration from builder")
    }
}

/// A configuration with two storages and one entry for every operation.
pub fn full_run_config(name: &str) -> RunConfiguration {
    RunConfigBuilder::new("/srv/data")
        .storage("default")
        .storage("offsite")
        .copy("default", "offsite")
        .prune("default", &["0:365", "7:30"])
        .check("default")
        .build(name)
}

/// TOML text matching [`full_run_config`].
pub const FULL_RUN_CONFIG_TOML: &str = r#"
repository = "/srv/data"

[[storage]]
name = "default"
threads = 2

[[storage]]
name = "offsite"

[[copy]]
from = "default"
to = "offsite"

[[prune]]
storage = "default"
keep = ["0:365", "7:30"]
all = true

[[check]]
storage = "default"
tabular = true
"#;

/// Temporary storage directory laid out the way the runner expects.
pub struct StorageDir {
    dir: TempDir,
}

impl StorageDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp storage dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_global(&self, toml: &str) -> &Self {
        fs::write(self.path().join("backup-runner.toml"), toml).expect("write global config");
        self
    }

    pub fn write_config(&self, name: &str, toml: &str) -> &Self {
        fs::write(self.path().join(format!("{name}.toml")), toml).expect("write run config");
        self
    }

    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.path().join(format!("{name}.lock"))
    }

    pub fn log_path(&self, name: &str) -> PathBuf {
        self.path().join("logs").join(format!("{name}.log"))
    }

    /// Arguments pointing at this storage directory and nothing else.
    pub fn args(&self) -> CliArgsBuilder {
        CliArgsBuilder::new().storage_dir(self.path())
    }
}

impl Default for StorageDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `CliArgs`.
#[derive(Default)]
pub struct CliArgsBuilder {
    args: CliArgs,
}

impl CliArgsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage_dir(mut self, dir: &Path) -> Self {
        self.args.storage_dir = Some(dir.display().to_string());
        self
    }

    pub fn config(mut self, name: &str) -> Self {
        self.args.config = Some(name.to_string());
        self
    }

    pub fn all(mut self) -> Self {
        self.args.all = true;
        self
    }

    pub fn backup(mut self) -> Self {
        self.args.backup = true;
        self
    }

    pub fn copy(mut self) -> Self {
        self.args.copy = true;
        self
    }

    pub fn prune(mut self) -> Self {
        self.args.prune = true;
        self
    }

    pub fn check(mut self) -> Self {
        self.args.check = true;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.args.quiet = true;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.args.verbose = true;
        self
    }

    pub fn test_notifications(mut self) -> Self {
        self.args.test_notifications = true;
        self
    }

    pub fn version(mut self) -> Self {
        self.args.version = true;
        self
    }

    pub fn extra(mut self, arg: &str) -> Self {
        self.args.extra.push(arg.to_string());
        self
    }

    pub fn build(self) -> CliArgs {
        self.args
    }
}
