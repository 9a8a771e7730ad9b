// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Resolve the storage directory and load files from disk (`loader.rs`).
//! - Validate cross-references between sections (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_global, load_run_config, resolve_run_config, resolve_storage_dir};
pub use model::{
    CheckEntry, CopyEntry, EngineSection, GlobalConfig, NotificationsConfig, NotifierTarget,
    PruneEntry, RawGlobalConfig, RawRunConfig, RunConfiguration, StorageEntry,
};
pub use validate::{validate_global_config, validate_run_config};
