use anyhow::Result;
use colored::Colorize;

use crate::exec::{Launcher, ProcessLauncher, StageReport, StageRunner};
use crate::fs::Fs;
use crate::settings::Settings;
use crate::ui::Ui;

/// Per-stage reports from one run of the pipeline.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    /// Failed units across every stage.
    pub fn failed(&self) -> usize {
        self.stages.iter().map(|s| s.failed).sum()
    }

    /// Units whose tool ran successfully across every stage.
    pub fn ran(&self) -> usize {
        self.stages.iter().map(|s| s.ran).sum()
    }

    /// Units skipped as already complete across every stage.
    pub fn skipped(&self) -> usize {
        self.stages.iter().map(|s| s.skipped).sum()
    }
}

/// This struct actually runs the command-line app.
///
/// Each requested stage runs once, in the fixed order
/// conformers, docking, optimize, entropy in solution, entropy bounded.
/// Nothing checks that a stage's predecessors have run: a stage whose
/// inputs don't exist yet simply finds no work.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// Filesystem interface
    fs: Fs,
    /// User interface
    ui: Ui,
    /// Runs each unit's command
    launcher: Box<dyn Launcher>,
}

impl App {
    /// Create a new `App` that runs tools as local child processes.
    pub fn new(settings: Settings) -> Self {
        let launcher = ProcessLauncher::new(settings.verbose > 0);
        Self::with_launcher(settings, Box::new(launcher))
    }

    /// Create a new `App` that hands every invocation to `launcher`.
    pub fn with_launcher(settings: Settings, launcher: Box<dyn Launcher>) -> Self {
        let fs = Fs::new(settings.context.layout.root(), settings.dry_run);
        let ui = Ui::new(&settings);
        Self {
            settings,
            fs,
            ui,
            launcher,
        }
    }

    /// Run every requested stage.
    pub fn run(self) -> Result<PipelineReport> {
        self.ui.print_settings(&self.settings);
        let mut report = PipelineReport::default();

        if self.settings.stages.is_empty() {
            println!("{}", "No stages requested; exiting.".green());
            return Ok(report);
        }

        self.fs.ensure_root_exists(self.ui.verbose)?;

        let runner = StageRunner::new(
            &self.settings.context,
            &self.fs,
            &self.ui,
            self.launcher.as_ref(),
            self.settings.dry_run,
        );
        for kind in self.settings.stages.iter() {
            self.ui.banner(kind);
            let stage_report = runner.run(kind);
            self.ui.summary(&stage_report);
            report.stages.push(stage_report);
        }

        println!(
            "\n{} {} run, {} skipped, {} failed.",
            "Completed pipeline:".green(),
            report.ran(),
            report.skipped(),
            report.failed(),
        );
        Ok(report)
    }
}
