// src/transcript/run_log.rs

//! Persistent per-configuration run log with simple generation rotation.
//!
//! `<dir>/<stem>.log` is the current run; older runs are kept as
//! `<stem>.log.1` (newest) up to `<stem>.log.<keep - 1>` (oldest).

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tracing::{debug, warn};

use crate::errors::Result;

#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Rotate previous logs for `stem` and open a fresh one.
    ///
    /// `keep` counts the new log, so `keep = 1` retains no history.
    pub fn open(dir: &Path, stem: &str, keep: usize) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;

        rotate(dir, stem, keep.max(1))?;

        let path = dir.join(format!("{stem}.log"));
        let file = File::create(&path)
            .with_context(|| format!("creating run log {}", path.display()))?;

        debug!(path = %path.display(), "run log opened");
        Ok(Self { path, file })
    }

    /// Append one line. A failing write is logged and otherwise ignored so
    /// a full disk never hides the console and notification output.
    pub fn append(&mut self, message: &str) {
        let stamp = Local::now().format("%Y/%m/%d %H:%M:%S");
        if let Err(err) = writeln!(self.file, "{stamp} {message}") {
            warn!(path = %self.path.display(), error = %err, "failed to write run log");
        }
    }
}

fn generation(dir: &Path, stem: &str, n: usize) -> PathBuf {
    if n == 0 {
        dir.join(format!("{stem}.log"))
    } else {
        dir.join(format!("{stem}.log.{n}"))
    }
}

fn rotate(dir: &Path, stem: &str, keep: usize) -> Result<()> {
    let oldest = generation(dir, stem, keep - 1);
    if keep > 1 {
        remove_if_exists(&oldest)?;
    }

    for n in (0..keep - 1).rev() {
        let from = generation(dir, stem, n);
        if from.exists() {
            let to = generation(dir, stem, n + 1);
            fs::rename(&from, &to).with_context(|| {
                format!("rotating {} to {}", from.display(), to.display())
            })?;
        }
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
