use clap::{ArgAction, Parser};

use crate::fs::Completion;

const CMD_NAME: &str = "oepipe";
const DEFAULT_LIGANDS: &str = "../Project/ligands";
const DEFAULT_RECEPTORS: &str = "../Project/receptor/K";
const DEFAULT_OUTPUT: &str = ".";
const DEFAULT_LAUNCHER: &str = "srun";

/// Stores our command-line args format.
#[derive(Parser, Debug)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Wrap every tool invocation in the cluster launcher
    #[arg(short, long)]
    pub distributed: bool,

    /// Ligands directory (*.sdf)
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_LIGANDS)]
    #[arg(env = "OEPIPE_LIGANDS")]
    pub ligands: String,

    /// Receptors directory; its base name namespaces receptor-specific outputs
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_RECEPTORS)]
    #[arg(env = "OEPIPE_RECEPTORS")]
    pub receptors: String,

    /// Project directory that holds the stage output directories
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT)]
    #[arg(env = "OEPIPE_OUTPUT")]
    pub output: String,

    /// Generate conformers
    #[arg(long)]
    pub conformers: bool,

    /// Dock conformers
    #[arg(long)]
    pub docking: bool,

    /// Optimize docked conformers
    #[arg(long)]
    pub optimize: bool,

    /// Estimate entropy in solution
    #[arg(long, alias = "entropy-in-solution")]
    pub eis: bool,

    /// Estimate entropy bounded
    #[arg(long, alias = "entropy-bounded")]
    pub eb: bool,

    /// Worker pool size for concurrent stages (0: one per CPU)
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    #[arg(env = "OEPIPE_JOBS")]
    pub jobs: usize,

    /// Run this stage concurrently (repeatable)
    #[arg(long, value_name = "STAGE")]
    pub concurrent: Vec<String>,

    /// Run this stage one unit at a time (repeatable)
    #[arg(long, value_name = "STAGE")]
    pub sequential: Vec<String>,

    /// Cluster launch command used in distributed mode
    #[arg(long, value_name = "CMD", default_value = DEFAULT_LAUNCHER)]
    #[arg(env = "OEPIPE_LAUNCHER")]
    pub launcher: String,

    /// How to decide that a unit's output is already complete
    #[arg(long, value_enum, default_value_t = Completion::Exists)]
    pub completion: Completion,

    /// Exit with an error if any unit failed
    #[arg(long)]
    pub strict: bool,

    /// Dry run; print commands but don't run or create anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print additional debugging info (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// omega2 energy window
    #[arg(long, value_name = "KCAL", default_value_t = 25.0)]
    pub ewindow: f64,

    /// omega2 maximum conformers per ligand
    #[arg(long, value_name = "N", default_value_t = 100_000)]
    pub max_confs: u32,

    /// omega2 RMSD threshold
    #[arg(long, value_name = "ANGSTROM", default_value_t = 0.3)]
    pub rms: f64,

    /// hybrid docking resolution
    #[arg(long, value_name = "LEVEL", default_value = "High")]
    pub dock_resolution: String,

    /// hybrid poses kept per ligand
    #[arg(long, value_name = "N", default_value_t = 25)]
    pub num_poses: u32,

    /// szybki flexible residue shell
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub residue: u32,

    /// szybki protein electrostatics model
    #[arg(long, value_name = "MODEL", default_value = "PB")]
    pub protein_elec: String,

    /// szybki entropy method
    #[arg(long, value_name = "METHOD", default_value = "AN")]
    pub entropy_method: String,
}
