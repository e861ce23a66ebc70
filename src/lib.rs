/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Stage execution
mod exec;
/// Filesystem operations
mod fs;
/// Per-unit preparation: receptor context and command lines
mod prep;
/// Combined command-line run settings
mod settings;
/// Text UI
mod ui;

// exported for tests:
pub use app::{App, PipelineReport};
pub use args::Args;
pub use exec::{Invocation, Launcher, StageReport};
pub use fs::{Completion, Fs};
pub use settings::{ExecutionContext, Settings};

#[derive(thiserror::Error, Debug)]
#[error("{0} units failed")]
pub struct UnitsFailed(pub usize);

/// Run the command-line app.
pub fn run() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    let log_level = match settings.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(log_level);

    // RUN THE THING /////////////////
    let strict = settings.strict;
    let report = App::new(settings).run()?;

    // per-unit failures only affect the exit status when asked to:
    if strict && report.failed() > 0 {
        return Err(UnitsFailed(report.failed()).into());
    }
    Ok(())
}
