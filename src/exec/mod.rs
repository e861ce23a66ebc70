/// Drives one pipeline stage over all its work units
mod stage_runner;
pub use stage_runner::{StageReport, StageRunner};

/// What it takes to run one command, and who runs it
mod launcher;
pub use launcher::{Invocation, Launcher, ProcessLauncher};

/// Run a subprocess
mod run_cmd;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to launch {0}")]
    Launch(String, #[source] std::io::Error),
    #[error("Cannot attach to child {0}")]
    Attach(&'static str),
    #[error("Thread copying child {0} panicked")]
    LogThread(&'static str),
    #[error("{0} exited unsuccessfully for {1}")]
    SubprocessFailed(String, String),
}
