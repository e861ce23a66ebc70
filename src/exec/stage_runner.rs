use std::time::Duration;

use anyhow::Result;
use rayon::prelude::*;

use stages::{derive, StageKind, StageSpec, WorkUnit};
use util::{Errors, Timer};

use crate::fs::Fs;
use crate::prep::{best_receptor, InvocationBuilder};
use crate::settings::ExecutionContext;
use crate::ui::Ui;

use super::{Error, Launcher};

/// What happened to a single work unit.
enum Outcome {
    /// The tool ran and exited successfully.
    Ran,
    /// Output already complete; nothing was run.
    Skipped,
    /// Dry run; the command was printed instead of run.
    Planned,
    Failed(anyhow::Error),
}

/// Counts of what a stage did, for the summary line and the exit status.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: StageKind,
    /// inputs found
    pub units: usize,
    pub ran: usize,
    pub skipped: usize,
    pub planned: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl StageReport {
    fn new(stage: StageKind) -> Self {
        Self {
            stage,
            units: 0,
            ran: 0,
            skipped: 0,
            planned: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// `StageRunner` drives one stage over every input it can find.
///
/// For each input it derives the output paths, skips the unit if the
/// memoization gate says it is already complete, resolves the best receptor
/// when the stage needs one, and runs the stage's tool. Units are
/// independent: a failure is reported and counted, and never stops its
/// siblings. Concurrent stages spread units over a bounded worker pool and
/// return only once every unit has finished.
pub struct StageRunner<'a> {
    ctx: &'a ExecutionContext,
    fs: &'a Fs,
    ui: &'a Ui,
    launcher: &'a dyn Launcher,
    /// print commands instead of running them
    dry_run: bool,
}

impl<'a> StageRunner<'a> {
    pub fn new(
        ctx: &'a ExecutionContext,
        fs: &'a Fs,
        ui: &'a Ui,
        launcher: &'a dyn Launcher,
        dry_run: bool,
    ) -> Self {
        Self {
            ctx,
            fs,
            ui,
            launcher,
            dry_run,
        }
    }

    /// Run every unit of `kind`. Never fails; per-unit errors are
    /// printed in a recap and counted in the returned report.
    pub fn run(&self, kind: StageKind) -> StageReport {
        let timer = Timer::now();
        let stage = stages::spec(kind);
        let mut report = StageReport::new(kind);
        let mut errors = Errors::default();

        let units = self.work_units(stage, &mut report, &mut errors);

        if !units.is_empty() {
            let outcomes = match self.prepare(stage) {
                Ok(builder) => self.run_units(stage, &builder, units),
                Err(e) => {
                    errors.add_context(e, format!("while preparing stage {kind}"));
                    report.failed += units.len();
                    Vec::new()
                }
            };
            for outcome in outcomes {
                match outcome {
                    Outcome::Ran => report.ran += 1,
                    Outcome::Skipped => report.skipped += 1,
                    Outcome::Planned => report.planned += 1,
                    Outcome::Failed(e) => {
                        report.failed += 1;
                        errors.add(e);
                    }
                }
            }
        }

        errors.print_recap(&format!("running stage {kind}"));
        report.elapsed = timer.elapsed();
        report
    }

    /// Enumerate inputs and derive each unit's outputs.
    /// Inputs whose names can't be derived are counted as failures.
    fn work_units(
        &self,
        stage: &StageSpec,
        report: &mut StageReport,
        errors: &mut Errors,
    ) -> Vec<WorkUnit> {
        let layout = &self.ctx.layout;
        let input_dir = stage.input_dir(layout);
        let pattern = stage.input_pattern();

        let inputs = match self.fs.resolve(&input_dir, &pattern) {
            Ok(inputs) => inputs,
            Err(e) => {
                errors.add_context(e, format!("while listing inputs in {input_dir:?}"));
                report.failed += 1;
                return Vec::new();
            }
        };
        report.units = inputs.len();
        if inputs.is_empty() {
            let msg = format!(
                "No inputs for stage {} matching {:?} in {:?}",
                stage.kind, pattern, input_dir
            );
            log::warn!("{msg}");
            self.ui.warn(&msg);
        }

        let mut units = Vec::with_capacity(inputs.len());
        for input in inputs {
            match derive(stage, layout, &input) {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    errors.add_context(e.into(), format!("while naming outputs for {input:?}"));
                    report.failed += 1;
                }
            }
        }
        units
    }

    /// Create the output directory and the per-run invocation builder.
    fn prepare(&self, stage: &StageSpec) -> Result<InvocationBuilder<'a>> {
        let output_dir = stage.output_dir(&self.ctx.layout);
        if self.dry_run {
            self.ui
                .verbose_msg(&format!("Dry run. Not creating {}", output_dir.display()));
        } else {
            self.fs.create_dir(&output_dir)?;
        }
        InvocationBuilder::new(self.ctx)
    }

    fn run_units(
        &self,
        stage: &StageSpec,
        builder: &InvocationBuilder,
        units: Vec<WorkUnit>,
    ) -> Vec<Outcome> {
        if self.ctx.concurrent.contains(stage.kind) {
            match self.pool() {
                Ok(pool) => {
                    log::info!(
                        "running {} units of {} on {} workers",
                        units.len(),
                        stage.kind,
                        pool.current_num_threads()
                    );
                    // install() returns only once every unit has finished:
                    return pool.install(|| {
                        units
                            .into_par_iter()
                            .map(|unit| self.run_unit(stage, builder, unit))
                            .collect()
                    });
                }
                Err(e) => log::warn!("unable to start worker pool, running sequentially: {e}"),
            }
        }
        units
            .into_iter()
            .map(|unit| self.run_unit(stage, builder, unit))
            .collect()
    }

    fn pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.ctx.jobs)
            .thread_name(|i| format!("oepipe-worker-{i}"))
            .build()
    }

    fn run_unit(&self, stage: &StageSpec, builder: &InvocationBuilder, unit: WorkUnit) -> Outcome {
        if self.fs.is_complete(&unit.primary, self.ctx.completion) {
            self.ui.skip(&unit.primary);
            return Outcome::Skipped;
        }
        match self.launch_unit(stage, builder, &unit) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.ui.fail(&unit.name, &e);
                Outcome::Failed(e.context(format!("while running {} for {}", stage.kind, unit.name)))
            }
        }
    }

    fn launch_unit(
        &self,
        stage: &StageSpec,
        builder: &InvocationBuilder,
        unit: &WorkUnit,
    ) -> Result<Outcome> {
        let receptor = match stage.score_file(unit) {
            Some(score_file) => {
                let mut strbuf = String::with_capacity(256);
                Some(best_receptor(self.fs, &score_file, &mut strbuf)?)
            }
            None => None,
        };

        let invocation = builder.build(stage, unit, receptor.as_deref())?;
        if self.dry_run {
            self.ui.would_run(&invocation);
            return Ok(Outcome::Planned);
        }

        self.ui.run(&unit.primary);
        if !self.launcher.launch(&invocation, self.fs)? {
            return Err(Error::SubprocessFailed(invocation.program, unit.name.clone()).into());
        }
        self.fs.mark_complete(&unit.primary, self.ctx.completion)?;
        Ok(Outcome::Ran)
    }
}
