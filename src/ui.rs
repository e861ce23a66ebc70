use std::path::Path;

use colored::Colorize;

use stages::StageKind;

use crate::exec::{Invocation, StageReport};
use crate::settings::Settings;

const BANNER: &str = "#############################################################";

/// All interactions with the text UI should go through this struct.
///
/// Narration goes to stdout; diagnostic logging goes to stderr through `log`.
/// Workers of a concurrent stage share one `Ui`, so it holds no mutable state.
pub struct Ui {
    /// -v setting, displays extra text info to user
    pub verbose: bool,
}

impl Ui {
    pub fn new(settings: &Settings) -> Self {
        Self {
            verbose: settings.verbose > 0,
        }
    }

    /// Echo the run configuration.
    pub fn print_settings(&self, settings: &Settings) {
        let ctx = &settings.context;
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        println!("Distributed execution? {}", ctx.distributed);
        println!("Ligands directory: {}", ctx.layout.ligands().display());
        println!("Receptors directory: {}", ctx.layout.receptors().display());
        println!("Output directory: {}", ctx.layout.root().display());
        for kind in StageKind::ALL {
            let requested = settings.stages.contains(kind);
            let mode = if ctx.concurrent.contains(kind) {
                "concurrent"
            } else {
                "sequential"
            };
            println!("{}? {requested} ({mode})", kind.title());
        }
        if self.verbose {
            println!("Completion policy: {:?}", ctx.completion);
            println!("Launcher: {}", ctx.launcher.join(" "));
            println!("Tuning: {:?}", ctx.tuning);
        }
        if settings.dry_run {
            println!("{}", "Dry run: nothing will be executed.".yellow());
        }
    }

    pub fn banner(&self, kind: StageKind) {
        println!("{BANNER}");
        println!("{}", kind.title().magenta());
    }

    pub fn warn(&self, msg: &str) {
        println!("{} {}", "WARN".yellow(), msg);
    }

    pub fn verbose_msg(&self, msg: &str) {
        if self.verbose {
            println!("{}", msg);
        }
    }

    pub fn run(&self, primary: &Path) {
        println!("{} {}", "RUN".green(), primary.display());
    }

    pub fn would_run(&self, invocation: &Invocation) {
        println!("{} {}", "WOULD RUN".cyan(), invocation);
    }

    pub fn skip(&self, primary: &Path) {
        println!(
            "{} {} (already complete)",
            "SKIP".green(),
            primary.display()
        );
    }

    pub fn fail(&self, label: &str, e: &anyhow::Error) {
        println!("{} {}: {}", "ERRO".red(), label, e);
    }

    pub fn summary(&self, report: &StageReport) {
        let failed = if report.failed > 0 {
            format!("{} failed", report.failed).red()
        } else {
            "0 failed".normal()
        };
        println!(
            "{} {}: {} units, {} run, {} skipped, {}, took {:.2?}",
            "DONE".green(),
            report.stage,
            report.units,
            report.ran,
            report.skipped,
            failed,
            report.elapsed,
        );
    }
}
