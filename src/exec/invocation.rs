// src/exec/invocation.rs

//! Translate a requested operation into concrete engine command lines.

use std::fmt;

use crate::config::RunConfiguration;
use crate::types::Operation;

/// Engine-wide options that precede the sub-command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub verbose: bool,
    pub debug: bool,
}

impl EngineOptions {
    fn global_args(self) -> Vec<String> {
        let mut args = vec!["-log".to_string()];
        if self.debug {
            args.push("-debug".to_string());
        } else if self.verbose {
            args.push("-verbose".to_string());
        }
        args
    }
}

/// One call of the backup engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: Operation,
    /// Short human description, e.g. `backup to storage 'default'`.
    pub label: String,
    /// Full argument list, global options included.
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

/// Every invocation needed to perform `op` for `config`, in configuration
/// order.
pub fn plan(config: &RunConfiguration, op: Operation, options: EngineOptions) -> Vec<Invocation> {
    let entries: Vec<(String, Vec<String>)> = match op {
        Operation::Backup => config
            .storage
            .iter()
            .map(|s| {
                (
                    format!("backup to storage '{}'", s.name),
                    vec![
                        "-storage".to_string(),
                        s.name.clone(),
                        "-threads".to_string(),
                        s.threads.to_string(),
                        "-stats".to_string(),
                    ],
                )
            })
            .collect(),
        Operation::Copy => config
            .copy
            .iter()
            .map(|c| {
                (
                    format!("copy from '{}' to '{}'", c.from, c.to),
                    vec![
                        "-from".to_string(),
                        c.from.clone(),
                        "-to".to_string(),
                        c.to.clone(),
                        "-threads".to_string(),
                        c.threads.to_string(),
                    ],
                )
            })
            .collect(),
        Operation::Prune => config
            .prune
            .iter()
            .map(|p| {
                let mut args = vec!["-storage".to_string(), p.storage.clone()];
                for keep in p.keep.iter() {
                    args.push("-keep".to_string());
                    args.push(keep.clone());
                }
                if p.all {
                    args.push("-all".to_string());
                }
                (format!("prune of storage '{}'", p.storage), args)
            })
            .collect(),
        Operation::Check => config
            .check
            .iter()
            .map(|c| {
                let mut args = vec!["-storage".to_string(), c.storage.clone()];
                if c.all {
                    args.push("-all".to_string());
                }
                if c.tabular {
                    args.push("-tabular".to_string());
                }
                (format!("check of storage '{}'", c.storage), args)
            })
            .collect(),
    };

    entries
        .into_iter()
        .map(|(label, op_args)| {
            let mut args = options.global_args();
            args.push(op.command().to_string());
            args.extend(op_args);
            Invocation {
                operation: op,
                label,
                args,
            }
        })
        .collect()
}
