// src/lock.rs

//! Host-local run lock, one per configuration name.
//!
//! The lock is an exclusive, non-blocking file lock (`flock(2)` on Unix) on
//! `<lock_dir>/<name>.lock`. A busy lock is reported as
//! [`LockAttempt::AlreadyRunning`] straight away; there is no waiting and no
//! retry. The held lock is a [`RunLock`] guard which unlocks and removes the
//! lock file when dropped, whatever path the run takes out of scope.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{Result, RunnerError};

/// Result of a single acquisition attempt.
#[derive(Debug)]
pub enum LockAttempt {
    Acquired(RunLock),
    AlreadyRunning,
}

/// Hands out run locks inside one directory.
#[derive(Debug, Clone)]
pub struct LockManager {
    dir: PathBuf,
}

impl LockManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the lock file for `name`.
    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.lock"))
    }

    /// Try once to take the lock for `name`.
    pub fn acquire(&self, name: &str) -> Result<LockAttempt> {
        let path = self.lock_path(name);
        fs::create_dir_all(&self.dir).map_err(|source| lock_io(&self.dir, source))?;

        loop {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)
                .map_err(|source| lock_io(&path, source))?;

            if !try_lock_exclusive(&file).map_err(|source| lock_io(&path, source))? {
                debug!(config = name, path = %path.display(), "run lock is busy");
                return Ok(LockAttempt::AlreadyRunning);
            }

            // The previous holder may have unlinked the file between our
            // open and our flock; a lock on an orphaned inode excludes no one.
            if still_linked(&file, &path).map_err(|source| lock_io(&path, source))? {
                info!(config = name, path = %path.display(), "run lock acquired");
                return Ok(LockAttempt::Acquired(RunLock {
                    name: name.to_string(),
                    path,
                    file: Some(file),
                }));
            }
            debug!(path = %path.display(), "lock file replaced while locking; retrying open");
        }
    }
}

/// A held run lock. Dropping it releases the lock.
#[derive(Debug)]
pub struct RunLock {
    name: String,
    path: PathBuf,
    file: Option<File>,
}

impl RunLock {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release explicitly. Equivalent to dropping the guard.
    pub fn release(self) {}
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Unlink before unlocking; see `still_linked`.
        if let Err(err) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %err, "could not remove lock file");
        }
        if let Some(file) = self.file.take() {
            // Closing the descriptor releases the lock.
            drop(file);
        }
        debug!(config = %self.name, "run lock released");
    }
}

fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    match file.try_lock() {
        Ok(()) => Ok(true),
        Err(fs::TryLockError::WouldBlock) => Ok(false),
        Err(fs::TryLockError::Error(err)) => Err(err),
    }
}

fn lock_io(path: &Path, source: io::Error) -> RunnerError {
    RunnerError::LockIo {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(unix)]
fn still_linked(file: &File, path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(current) => Ok(current.dev() == held.dev() && current.ino() == held.ino()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(not(unix))]
fn still_linked(_file: &File, path: &Path) -> io::Result<bool> {
    Ok(path.exists())
}
