use std::path::{Path, PathBuf};

use util::{append_suffix, strip_name_suffix};

use crate::{Error, Layout, StageKind, StageSpec};

/// One input artifact for a stage, plus everything derived from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub stage: StageKind,
    /// The file the stage reads.
    pub source: PathBuf,
    /// Source file name with the stage's input suffix removed.
    pub name: String,
    /// `output_dir/name`, handed to tools that write several prefixed artifacts.
    pub prefix: PathBuf,
    /// The artifact whose presence marks this unit complete.
    pub primary: PathBuf,
    pub side: Option<PathBuf>,
}

/// Compute the output paths for `input` under `stage`'s naming convention.
///
/// This is a pure function of its arguments: the same input and layout
/// always produce the same paths, which is what lets the memoization gate
/// trust the filesystem as its record of completed work.
pub fn derive(stage: &StageSpec, layout: &Layout, input: &Path) -> Result<WorkUnit, Error> {
    let name = strip_name_suffix(input, stage.input_suffix)?;
    let prefix = stage.output_dir(layout).join(name);
    let primary = append_suffix(&prefix, stage.primary_suffix);
    let side = stage.side_suffix.map(|suffix| append_suffix(&prefix, suffix));
    Ok(WorkUnit {
        stage: stage.kind,
        source: input.to_owned(),
        name: name.to_owned(),
        prefix,
        primary,
        side,
    })
}
