use anyhow::Result;

use stages::{Layout, StageKind, StageSet, Tuning};

use crate::args::Args;
use crate::fs::Completion;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Cluster launcher command is empty")]
    EmptyLauncher,
    #[error("Stage \"{0}\" was given to both --concurrent and --sequential")]
    ConflictingConcurrency(StageKind),
}

/// Run-wide configuration shared read-only by every stage.
#[derive(Debug)]
pub struct ExecutionContext {
    /// ligand, receptor and output locations
    pub layout: Layout,
    /// wrap each tool invocation in `launcher`
    pub distributed: bool,
    /// cluster launch program followed by its own fixed args
    pub launcher: Vec<String>,
    /// worker pool size for concurrent stages (0: rayon's default)
    pub jobs: usize,
    /// stages that fan out across the worker pool
    pub concurrent: StageSet,
    /// memoization policy
    pub completion: Completion,
    /// tool parameters
    pub tuning: Tuning,
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in.
#[derive(Debug)]
pub struct Settings {
    pub context: ExecutionContext,
    /// stages to run, in fixed order
    pub stages: StageSet,
    pub verbose: u8,
    pub dry_run: bool,
    pub strict: bool,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut stages = StageSet::default();
        stages.set(StageKind::Conformers, args.conformers);
        stages.set(StageKind::Docking, args.docking);
        stages.set(StageKind::Optimization, args.optimize);
        stages.set(StageKind::EntropyInSolution, args.eis);
        stages.set(StageKind::EntropyBounded, args.eb);

        let concurrent = concurrency(args.distributed, &args.concurrent, &args.sequential)?;

        let launcher: Vec<String> = args.launcher.split_whitespace().map(str::to_owned).collect();
        if launcher.is_empty() {
            return Err(Error::EmptyLauncher.into());
        }

        let layout = Layout::new(&args.output, &args.ligands, &args.receptors)?;

        let tuning = Tuning {
            ewindow: args.ewindow,
            max_confs: args.max_confs,
            rms: args.rms,
            dock_resolution: args.dock_resolution,
            num_poses: args.num_poses,
            residue: args.residue,
            protein_elec: args.protein_elec,
            entropy_method: args.entropy_method,
        };

        Ok(Self {
            context: ExecutionContext {
                layout,
                distributed: args.distributed,
                launcher,
                jobs: args.jobs,
                concurrent,
                completion: args.completion,
                tuning,
            },
            stages,
            verbose: args.verbose,
            dry_run: args.dry_run,
            strict: args.strict,
        })
    }
}

/// Start from each stage's default, then apply the explicit overrides.
fn concurrency(distributed: bool, on: &[String], off: &[String]) -> Result<StageSet> {
    let mut set: StageSet = StageKind::ALL
        .into_iter()
        .filter(|k| k.concurrent_by_default(distributed))
        .collect();

    let on: StageSet = on.iter().map(|s| s.parse::<StageKind>()).collect::<Result<_, _>>()?;
    let off: StageSet = off.iter().map(|s| s.parse::<StageKind>()).collect::<Result<_, _>>()?;

    for kind in on.iter() {
        if off.contains(kind) {
            return Err(Error::ConflictingConcurrency(kind).into());
        }
        set.insert(kind);
    }
    for kind in off.iter() {
        set.remove(kind);
    }
    Ok(set)
}
