use std::path::{Path, PathBuf};

use util::{append_suffix, PathEncodingError};

use crate::{Error, Knob, Layout, StageKind, Tuning, WorkUnit};

/// Where a stage finds its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRoot {
    /// The user-supplied ligand directory.
    Ligands,
    /// The output directory of an earlier stage.
    Stage(StageKind),
}

/// One slot in a stage's argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Fixed flag or value.
    Lit(&'static str),
    /// The work unit's source file.
    Input,
    /// Primary output path.
    Primary,
    /// Side-channel output path (docking score file).
    Side,
    /// Output prefix shared by every artifact the tool writes.
    Prefix,
    /// Best receptor, read from the docking score file.
    Context,
    /// `receptors/*`
    ReceptorGlob,
    /// A value from `Tuning`.
    Tune(Knob),
}

/// Values substituted into an argument template besides the unit's own paths.
pub struct Bindings<'a> {
    pub receptor_glob: &'a str,
    pub context: Option<&'a str>,
    pub tuning: &'a Tuning,
}

/// Static description of a pipeline stage.
#[derive(Debug)]
pub struct StageSpec {
    pub kind: StageKind,
    pub input_root: InputRoot,
    /// Input files are `*{input_suffix}`; the suffix is stripped to get the unit name.
    pub input_suffix: &'static str,
    /// Output directory name under the project root.
    pub output_dir: &'static str,
    /// Whether `output_dir` is namespaced by the receptor set.
    pub per_receptor_set: bool,
    /// Appended to `output_dir/name`. Empty for stages keyed on the bare prefix.
    pub primary_suffix: &'static str,
    pub side_suffix: Option<&'static str>,
    /// External binary.
    pub program: &'static str,
    pub args: &'static [Arg],
    /// Whether each unit needs the best receptor from the docking score file.
    pub needs_context: bool,
}

use Arg::*;

#[rustfmt::skip]
static CONFORMERS: StageSpec = StageSpec {
    kind: StageKind::Conformers,
    input_root: InputRoot::Ligands,
    input_suffix: ".sdf",
    output_dir: "conformers",
    per_receptor_set: false,
    primary_suffix: ".oeb.gz",
    side_suffix: None,
    program: "omega2",
    args: &[
        Lit("-in"), Input,
        Lit("-out"), Primary,
        Lit("-sdEnergy"),
        Lit("-ewindow"), Tune(Knob::Ewindow),
        Lit("-maxconfs"), Tune(Knob::MaxConfs),
        Lit("-rms"), Tune(Knob::Rms),
        Lit("-prefix"), Prefix,
    ],
    needs_context: false,
};

#[rustfmt::skip]
static DOCKING: StageSpec = StageSpec {
    kind: StageKind::Docking,
    input_root: InputRoot::Stage(StageKind::Conformers),
    input_suffix: ".oeb.gz",
    output_dir: "docking",
    per_receptor_set: true,
    primary_suffix: "_docked.oeb.gz",
    side_suffix: Some("_score.txt"),
    program: "hybrid",
    args: &[
        Lit("-receptor"), ReceptorGlob,
        Lit("-dbase"), Input,
        Lit("-docked_molecule_file"), Primary,
        Lit("-score_file"), Side,
        Lit("-dock_resolution"), Tune(Knob::DockResolution),
        Lit("-num_poses"), Tune(Knob::NumPoses),
        Lit("-save_component_scores"),
        Lit("-annotate_scores"),
        Lit("-prefix"), Prefix,
    ],
    needs_context: false,
};

#[rustfmt::skip]
static OPTIMIZATION: StageSpec = StageSpec {
    kind: StageKind::Optimization,
    input_root: InputRoot::Stage(StageKind::Docking),
    input_suffix: "_docked.oeb.gz",
    output_dir: "optimized",
    per_receptor_set: true,
    primary_suffix: "_optimized.oeb.gz",
    side_suffix: None,
    program: "szybki",
    args: &[
        Lit("-p"), Context,
        Lit("-in"), Input,
        Lit("-out"), Primary,
        Lit("-prefix"), Prefix,
        Lit("-residue"), Tune(Knob::Residue),
        Lit("-protein_elec"), Tune(Knob::ProteinElec),
    ],
    needs_context: true,
};

#[rustfmt::skip]
static ENTROPY_IN_SOLUTION: StageSpec = StageSpec {
    kind: StageKind::EntropyInSolution,
    input_root: InputRoot::Stage(StageKind::Conformers),
    input_suffix: ".oeb.gz",
    output_dir: "entropy_insolution",
    per_receptor_set: false,
    primary_suffix: "",
    side_suffix: None,
    program: "szybki",
    args: &[
        Lit("-entropy"), Tune(Knob::EntropyMethod),
        Lit("-sheffield"),
        Lit("-prefix"), Prefix,
        Input,
    ],
    needs_context: false,
};

#[rustfmt::skip]
static ENTROPY_BOUNDED: StageSpec = StageSpec {
    kind: StageKind::EntropyBounded,
    input_root: InputRoot::Stage(StageKind::Docking),
    input_suffix: "_docked.oeb.gz",
    output_dir: "entropy_bounded",
    per_receptor_set: true,
    primary_suffix: "",
    side_suffix: None,
    program: "szybki",
    args: &[
        Lit("-p"), Context,
        Lit("-entropy"), Tune(Knob::EntropyMethod),
        Lit("-prefix"), Prefix,
        Input,
    ],
    needs_context: true,
};

/// Look up the static spec for a stage.
pub fn spec(kind: StageKind) -> &'static StageSpec {
    match kind {
        StageKind::Conformers => &CONFORMERS,
        StageKind::Docking => &DOCKING,
        StageKind::Optimization => &OPTIMIZATION,
        StageKind::EntropyInSolution => &ENTROPY_IN_SOLUTION,
        StageKind::EntropyBounded => &ENTROPY_BOUNDED,
    }
}

impl StageSpec {
    /// Directory searched for this stage's inputs.
    pub fn input_dir(&self, layout: &Layout) -> PathBuf {
        match self.input_root {
            InputRoot::Ligands => layout.ligands().to_owned(),
            InputRoot::Stage(kind) => spec(kind).output_dir(layout),
        }
    }

    /// Glob pattern, relative to `input_dir`, matching this stage's inputs.
    pub fn input_pattern(&self) -> String {
        format!("*{}", self.input_suffix)
    }

    /// Directory this stage writes into.
    pub fn output_dir(&self, layout: &Layout) -> PathBuf {
        layout.stage_dir(self.output_dir, self.per_receptor_set)
    }

    /// Score file that records the best receptor for `unit`.
    /// It sits next to the unit's source, since the source is itself a docking output.
    /// Returns `None` for stages that don't need a context.
    pub fn score_file(&self, unit: &WorkUnit) -> Option<PathBuf> {
        if !self.needs_context {
            return None;
        }
        let side = DOCKING.side_suffix?;
        let dir = unit.source.parent().unwrap_or_else(|| Path::new(""));
        Some(append_suffix(&dir.join(&unit.name), side))
    }

    /// Substitute `unit`'s paths and `bindings` into the argument template.
    pub fn render(&self, unit: &WorkUnit, bindings: &Bindings) -> Result<Vec<String>, Error> {
        let mut args = Vec::with_capacity(self.args.len());
        for arg in self.args {
            let rendered = match *arg {
                Lit(s) => s.to_owned(),
                Input => path_str(&unit.source)?,
                Primary => path_str(&unit.primary)?,
                Side => match &unit.side {
                    Some(side) => path_str(side)?,
                    None => return Err(Error::MissingSideOutput(self.kind)),
                },
                Prefix => path_str(&unit.prefix)?,
                Context => bindings
                    .context
                    .ok_or(Error::MissingContext(self.kind))?
                    .to_owned(),
                ReceptorGlob => bindings.receptor_glob.to_owned(),
                Tune(knob) => bindings.tuning.value(knob),
            };
            args.push(rendered);
        }
        Ok(args)
    }
}

fn path_str(path: &Path) -> Result<String, PathEncodingError> {
    Ok(path.to_str().ok_or(PathEncodingError)?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive;

    fn layout() -> Layout {
        Layout::new("proj", "proj/ligands", "receptors/K").unwrap()
    }

    #[test]
    fn test_input_dirs_chain_stage_outputs() {
        let layout = layout();
        let docking = spec(StageKind::Docking);
        assert_eq!(docking.input_dir(&layout), PathBuf::from("proj/conformers"));
        assert_eq!(docking.input_pattern(), "*.oeb.gz");

        let optimize = spec(StageKind::Optimization);
        assert_eq!(optimize.input_dir(&layout), PathBuf::from("proj/docking/K"));
        assert_eq!(optimize.input_pattern(), "*_docked.oeb.gz");
        assert_eq!(optimize.output_dir(&layout), PathBuf::from("proj/optimized/K"));

        let conformers = spec(StageKind::Conformers);
        assert_eq!(conformers.input_dir(&layout), PathBuf::from("proj/ligands"));
    }

    #[test]
    fn test_every_kind_has_its_own_spec() {
        for kind in StageKind::ALL {
            assert_eq!(spec(kind).kind, kind);
            assert_eq!(spec(kind).needs_context, spec(kind).args.contains(&Context));
        }
    }

    #[test]
    fn test_render_conformers() -> Result<(), Error> {
        let layout = layout();
        let stage = spec(StageKind::Conformers);
        let unit = derive(stage, &layout, Path::new("proj/ligands/a.sdf"))?;
        let tuning = Tuning::default();
        let bindings = Bindings {
            receptor_glob: "receptors/K/*",
            context: None,
            tuning: &tuning,
        };
        let args = stage.render(&unit, &bindings)?;
        assert_eq!(
            args,
            [
                "-in",
                "proj/ligands/a.sdf",
                "-out",
                "proj/conformers/a.oeb.gz",
                "-sdEnergy",
                "-ewindow",
                "25.0",
                "-maxconfs",
                "100000",
                "-rms",
                "0.3",
                "-prefix",
                "proj/conformers/a",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_render_docking_includes_score_file() -> Result<(), Error> {
        let layout = layout();
        let stage = spec(StageKind::Docking);
        let unit = derive(stage, &layout, Path::new("proj/conformers/x.oeb.gz"))?;
        let tuning = Tuning {
            num_poses: 10,
            ..Tuning::default()
        };
        let glob = layout.receptor_glob()?;
        let bindings = Bindings {
            receptor_glob: &glob,
            context: None,
            tuning: &tuning,
        };
        let args = stage.render(&unit, &bindings)?;
        assert_eq!(&args[..2], ["-receptor", "receptors/K/*"]);
        let score = args.iter().position(|a| a == "-score_file").unwrap();
        assert_eq!(args[score + 1], "proj/docking/K/x_score.txt");
        let poses = args.iter().position(|a| a == "-num_poses").unwrap();
        assert_eq!(args[poses + 1], "10");
        Ok(())
    }

    #[test]
    fn test_render_requires_context() -> Result<(), Error> {
        let layout = layout();
        let stage = spec(StageKind::EntropyBounded);
        let unit = derive(stage, &layout, Path::new("proj/docking/K/x_docked.oeb.gz"))?;
        let tuning = Tuning::default();
        let mut bindings = Bindings {
            receptor_glob: "receptors/K/*",
            context: None,
            tuning: &tuning,
        };
        assert!(matches!(
            stage.render(&unit, &bindings),
            Err(Error::MissingContext(StageKind::EntropyBounded))
        ));

        bindings.context = Some("rec2.oeb");
        let args = stage.render(&unit, &bindings)?;
        assert_eq!(
            args,
            [
                "-p",
                "rec2.oeb",
                "-entropy",
                "AN",
                "-prefix",
                "proj/entropy_bounded/K/x",
                "proj/docking/K/x_docked.oeb.gz",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_score_file_is_docking_sibling() -> Result<(), Error> {
        let layout = layout();
        let stage = spec(StageKind::Optimization);
        let unit = derive(stage, &layout, Path::new("proj/docking/K/x_docked.oeb.gz"))?;
        assert_eq!(
            stage.score_file(&unit),
            Some(PathBuf::from("proj/docking/K/x_score.txt"))
        );

        let conformers = spec(StageKind::Conformers);
        let unit = derive(conformers, &layout, Path::new("proj/ligands/a.sdf"))?;
        assert_eq!(conformers.score_file(&unit), None);
        Ok(())
    }
}
