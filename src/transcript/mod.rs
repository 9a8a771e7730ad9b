// src/transcript/mod.rs

//! Run output accumulator.
//!
//! Every user-visible line produced during a run goes through
//! [`Transcript::emit`]. The line is:
//! - timestamped and appended to the in-memory transcript (always),
//! - echoed to the console (stdout unless quiet, stderr always),
//! - appended to the persistent run log, if one is attached.
//!
//! The transcript doubles as the notification body.

pub mod run_log;

use std::io::{self, Write};

use chrono::Local;

pub use run_log::RunLog;

/// Where a message is sent on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Normal,
    Error,
}

pub struct Transcript {
    lines: Vec<String>,
    quiet: bool,
    stdout: Box<dyn Write + Send>,
    stderr: Box<dyn Write + Send>,
    log: Option<RunLog>,
}

impl Transcript {
    /// Transcript echoing to the process stdout/stderr.
    pub fn new(quiet: bool) -> Self {
        Self::with_console(quiet, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Transcript echoing to the given writers instead of the process console.
    pub fn with_console(
        quiet: bool,
        stdout: Box<dyn Write + Send>,
        stderr: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            lines: Vec::new(),
            quiet,
            stdout,
            stderr,
            log: None,
        }
    }

    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    /// Attach the persistent run log. Subsequent messages are mirrored to it.
    pub fn attach_log(&mut self, log: RunLog) {
        self.log = Some(log);
    }

    /// Stop mirroring to the run log and close it.
    pub fn detach_log(&mut self) -> Option<RunLog> {
        self.log.take()
    }

    pub fn emit(&mut self, destination: Destination, message: &str) {
        if let Some(log) = self.log.as_mut() {
            log.append(message);
        }

        let text = format!("{} {}", Local::now().format("%H:%M:%S"), message);

        // Console writes are best effort, like any other terminal output.
        match destination {
            Destination::Normal if !self.quiet => {
                let _ = writeln!(self.stdout, "{text}");
                let _ = self.stdout.flush();
            }
            Destination::Normal => {}
            Destination::Error => {
                // Fatal text is forwarded verbatim, without the time prefix.
                let _ = writeln!(self.stderr, "{message}");
                let _ = self.stderr.flush();
            }
        }

        self.lines.push(text);
    }

    /// Print to stdout without recording or timestamping.
    pub fn echo(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{text}");
        let _ = self.stdout.flush();
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.emit(Destination::Normal, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.emit(Destination::Error, message.as_ref());
    }

    /// Timestamped lines in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Notification body: the transcript verbatim, one line per message.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

impl std::fmt::Debug for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcript")
            .field("lines", &self.lines.len())
            .field("quiet", &self.quiet)
            .field("log", &self.log)
            .finish()
    }
}
