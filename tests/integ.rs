use anyhow::Result;
use oepipe::{App, Args, Completion, Fs, Invocation, Launcher, PipelineReport};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Stands in for omega2, hybrid and szybki: records every invocation and
/// writes the files each tool would have written.
#[derive(Clone, Default)]
struct FakeTools {
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeTools {
    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let i = args.iter().position(|a| a == flag)?;
    args.get(i + 1).map(String::as_str)
}

impl Launcher for FakeTools {
    fn launch(&self, invocation: &Invocation, _fs: &Fs) -> Result<bool> {
        self.calls.lock().unwrap().push(invocation.clone());
        let args = &invocation.args;
        if let Some(out) = arg_after(args, "-out").or(arg_after(args, "-docked_molecule_file")) {
            std::fs::write(out, "poses")?;
        } else if let Some(prefix) = arg_after(args, "-prefix") {
            // entropy runs are keyed on their bare prefix:
            std::fs::write(prefix, "entropy")?;
        }
        if let Some(score) = arg_after(args, "-score_file") {
            std::fs::write(score, format!("{}\t-10.2\tRecA_2.oeb\n", invocation.label))?;
        }
        Ok(true)
    }
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn new(ligands: &[&str]) -> Result<Self> {
        let dir = tempdir()?;
        std::fs::create_dir_all(dir.path().join("ligands"))?;
        std::fs::create_dir_all(dir.path().join("receptors/RecA"))?;
        for name in ligands {
            std::fs::write(dir.path().join(format!("ligands/{name}.sdf")), "")?;
        }
        Ok(Self { dir })
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn touch(&self, relative: &str) -> Result<()> {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(path, "")?;
        Ok(())
    }

    fn args(&self) -> Args {
        let stringify = |p: PathBuf| p.to_str().unwrap().to_owned();
        Args {
            distributed: false,
            ligands: stringify(self.path("ligands")),
            receptors: stringify(self.path("receptors/RecA")),
            output: stringify(self.path("project")),
            conformers: false,
            docking: false,
            optimize: false,
            eis: false,
            eb: false,
            jobs: 2,
            concurrent: Vec::with_capacity(0),
            sequential: Vec::with_capacity(0),
            launcher: "srun".to_owned(),
            completion: Completion::Exists,
            strict: false,
            dry_run: false,
            verbose: 0,
            ewindow: 25.0,
            max_confs: 100_000,
            rms: 0.3,
            dock_resolution: "High".to_owned(),
            num_poses: 25,
            residue: 2,
            protein_elec: "PB".to_owned(),
            entropy_method: "AN".to_owned(),
        }
    }

    fn run(&self, args: Args, tools: &FakeTools) -> Result<PipelineReport> {
        let settings = args.try_into()?;
        App::with_launcher(settings, Box::new(tools.clone())).run()
    }
}

fn exists(path: &Path) -> bool {
    path.exists()
}

#[test]
fn test_conformers_then_rerun() -> Result<()> {
    let project = Project::new(&["a", "b"])?;
    let mut args = project.args();
    args.conformers = true;

    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;
    assert_eq!(tools.calls().len(), 2);
    assert_eq!(report.ran(), 2);
    assert!(exists(&project.path("project/conformers/a.oeb.gz")));
    assert!(exists(&project.path("project/conformers/b.oeb.gz")));

    let mut args = project.args();
    args.conformers = true;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;
    assert!(tools.calls().is_empty(), "second run invokes nothing");
    assert_eq!(report.skipped(), 2);
    Ok(())
}

#[test]
fn test_docking_runs_only_missing_units() -> Result<()> {
    let project = Project::new(&[])?;
    project.touch("project/conformers/x.oeb.gz")?;
    project.touch("project/conformers/y.oeb.gz")?;
    project.touch("project/docking/RecA/x_docked.oeb.gz")?;

    let mut args = project.args();
    args.docking = true;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;

    let calls = tools.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "hybrid");
    assert_eq!(calls[0].label, "y");
    assert_eq!(report.skipped(), 1);
    assert!(exists(&project.path("project/docking/RecA/y_score.txt")));
    Ok(())
}

#[test]
fn test_optimize_without_docking_is_a_noop() -> Result<()> {
    let project = Project::new(&["a"])?;
    let mut args = project.args();
    args.optimize = true;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;

    assert!(tools.calls().is_empty());
    assert_eq!(report.stages.len(), 1);
    assert_eq!(report.stages[0].units, 0);
    assert_eq!(report.failed(), 0);
    Ok(())
}

#[test]
fn test_full_pipeline() -> Result<()> {
    let project = Project::new(&["a", "b"])?;
    let mut args = project.args();
    args.conformers = true;
    args.docking = true;
    args.optimize = true;
    args.eis = true;
    args.eb = true;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;

    assert_eq!(report.failed(), 0);
    assert_eq!(report.ran(), 10, "two ligands through five stages");
    for expected in [
        "project/conformers/a.oeb.gz",
        "project/docking/RecA/a_docked.oeb.gz",
        "project/docking/RecA/a_score.txt",
        "project/optimized/RecA/a_optimized.oeb.gz",
        "project/entropy_insolution/a",
        "project/entropy_bounded/RecA/b",
    ] {
        assert!(exists(&project.path(expected)), "{expected} exists");
    }

    // the receptor from the score file is passed to szybki:
    let calls = tools.calls();
    let optimize = calls
        .iter()
        .find(|c| c.program == "szybki" && c.args.contains(&"-out".to_owned()))
        .unwrap();
    assert_eq!(arg_after(&optimize.args, "-p"), Some("RecA_2.oeb"));
    Ok(())
}

#[test]
fn test_distributed_wraps_every_call() -> Result<()> {
    let project = Project::new(&["a", "b", "c"])?;
    let mut args = project.args();
    args.distributed = true;
    args.conformers = true;
    args.docking = true;
    args.launcher = "srun --exclusive".to_owned();
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;

    assert_eq!(report.ran(), 6);
    for call in tools.calls() {
        assert_eq!(call.program, "srun");
        assert_eq!(call.args[0], "--exclusive");
        assert!(call.args[1] == "omega2" || call.args[1] == "hybrid");
    }
    Ok(())
}

#[test]
fn test_concurrent_docking_matches_sequential() -> Result<()> {
    let names = ["l1", "l2", "l3", "l4", "l5"];

    let mut produced = Vec::with_capacity(2);
    for concurrent in [false, true] {
        let project = Project::new(&names)?;
        let mut args = project.args();
        args.conformers = true;
        args.docking = true;
        if concurrent {
            args.concurrent = vec!["docking".to_owned()];
        }
        let tools = FakeTools::default();
        project.run(args, &tools)?;

        let mut outputs: Vec<String> = std::fs::read_dir(project.path("project/docking/RecA"))?
            .map(|e| -> Result<String> { Ok(e?.file_name().to_string_lossy().into_owned()) })
            .collect::<Result<_>>()?;
        outputs.sort();
        produced.push(outputs);
    }
    assert_eq!(produced[0].len(), names.len() * 2);
    assert_eq!(produced[0], produced[1]);
    Ok(())
}

#[test]
fn test_marker_policy_reruns_unmarked_output() -> Result<()> {
    let project = Project::new(&["a"])?;
    // left behind by a crash mid-write:
    project.touch("project/conformers/a.oeb.gz")?;

    let mut args = project.args();
    args.conformers = true;
    args.completion = Completion::Marker;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;
    assert_eq!(report.ran(), 1);
    assert!(exists(&project.path("project/conformers/a.oeb.gz.done")));
    Ok(())
}

#[test]
fn test_missing_score_file_is_reported_not_fatal() -> Result<()> {
    let project = Project::new(&[])?;
    project.touch("project/docking/RecA/x_docked.oeb.gz")?;
    project.touch("project/docking/RecA/y_docked.oeb.gz")?;
    std::fs::write(
        project.path("project/docking/RecA/y_score.txt"),
        "y\t-7.7\tRecA_1.oeb\n",
    )?;

    let mut args = project.args();
    args.eb = true;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.ran(), 1);
    let calls = tools.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].label, "y");
    Ok(())
}

#[test]
fn test_dry_run_creates_nothing() -> Result<()> {
    let project = Project::new(&["a"])?;
    let mut args = project.args();
    args.conformers = true;
    args.dry_run = true;
    let tools = FakeTools::default();
    let report = project.run(args, &tools)?;
    assert!(tools.calls().is_empty());
    assert_eq!(report.stages[0].planned, 1);
    assert!(!exists(&project.path("project")));
    Ok(())
}
