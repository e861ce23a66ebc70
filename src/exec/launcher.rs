use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;

use crate::fs::Fs;

use super::run_cmd::run_cmd;

/// A fully rendered command line for one work unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// unit name, for messages
    pub label: String,
    pub program: String,
    pub args: Vec<String>,
    /// stdout and stderr are captured to files named after this prefix
    pub log_prefix: PathBuf,
}

impl Invocation {
    pub fn new(label: &str, program: &str, args: Vec<String>, log_prefix: &Path) -> Self {
        Self {
            label: label.to_owned(),
            program: program.to_owned(),
            args,
            log_prefix: log_prefix.to_owned(),
        }
    }

    /// Prefix this invocation with a launch command, e.g. `srun`.
    /// The wrapped program and its args follow the launcher unchanged.
    /// An empty `launcher` leaves the invocation as it was.
    pub fn wrap(self, launcher: &[String]) -> Self {
        let Some((launch_program, launch_args)) = launcher.split_first() else {
            return self;
        };
        let mut args = Vec::with_capacity(launch_args.len() + 1 + self.args.len());
        args.extend_from_slice(launch_args);
        args.push(self.program);
        args.extend(self.args);
        Self {
            label: self.label,
            program: launch_program.clone(),
            args,
            log_prefix: self.log_prefix,
        }
    }

    /// Build a `Command` for this invocation.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs invocations to completion.
///
/// Shared by every worker of a concurrent stage, so implementations must be `Sync`.
pub trait Launcher: Send + Sync {
    /// Run `invocation` and wait for it to exit.
    /// Returns `Ok(false)` if it ran but exited unsuccessfully.
    fn launch(&self, invocation: &Invocation, fs: &Fs) -> Result<bool>;
}

/// Launches invocations as local child processes.
pub struct ProcessLauncher {
    /// echo child output to the terminal as well as the log files
    echo: bool,
}

impl ProcessLauncher {
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, invocation: &Invocation, fs: &Fs) -> Result<bool> {
        run_cmd(invocation, fs, self.echo)
    }
}
