use std::path::{Path, PathBuf};

use util::PathEncodingError;

use crate::Error;

/// Where a run reads its sources from and where stage directories live.
///
/// Stage output directories are fixed names under `root`; stages that depend
/// on a receptor set are further namespaced by the receptor directory's base
/// name, e.g. `docking/K/`.
#[derive(Debug, Clone)]
pub struct Layout {
    /// project directory holding `conformers/`, `docking/` etc.
    root: PathBuf,
    /// directory of `.sdf` ligand files
    ligands: PathBuf,
    /// directory of receptor structures
    receptors: PathBuf,
    /// base name of `receptors`
    receptor_set: String,
}

impl Layout {
    pub fn new<T, U, V>(root: T, ligands: U, receptors: V) -> Result<Self, Error>
    where
        T: Into<PathBuf>,
        U: Into<PathBuf>,
        V: Into<PathBuf>,
    {
        let receptors = receptors.into();
        let receptor_set = receptors
            .file_name()
            .ok_or_else(|| Error::NoReceptorSetName(receptors.clone()))?
            .to_str()
            .ok_or(PathEncodingError)?
            .to_owned();
        Ok(Self {
            root: root.into(),
            ligands: ligands.into(),
            receptors,
            receptor_set,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ligands(&self) -> &Path {
        &self.ligands
    }

    pub fn receptors(&self) -> &Path {
        &self.receptors
    }

    pub fn receptor_set(&self) -> &str {
        &self.receptor_set
    }

    /// $ROOT/dir, or $ROOT/dir/receptor_set if `per_receptor_set`
    pub fn stage_dir(&self, dir: &str, per_receptor_set: bool) -> PathBuf {
        let mut path = self.root.join(dir);
        if per_receptor_set {
            path.push(&self.receptor_set);
        }
        path
    }

    /// `receptors/*`, passed through to the docking engine as-is.
    pub fn receptor_glob(&self) -> Result<String, Error> {
        let glob = self.receptors.join("*");
        Ok(glob.to_str().ok_or(PathEncodingError)?.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receptor_set_is_base_name() -> Result<(), Error> {
        let layout = Layout::new(".", "../Project/ligands", "../Project/receptor/K")?;
        assert_eq!(layout.receptor_set(), "K");
        assert_eq!(
            layout.stage_dir("docking", true),
            PathBuf::from("./docking/K")
        );
        assert_eq!(
            layout.stage_dir("conformers", false),
            PathBuf::from("./conformers")
        );
        assert_eq!(layout.receptor_glob()?, "../Project/receptor/K/*");
        Ok(())
    }

    #[test]
    fn test_trailing_slash_still_has_name() -> Result<(), Error> {
        let layout = Layout::new("out", "lig", "receptors/RecA/")?;
        assert_eq!(layout.receptor_set(), "RecA");
        Ok(())
    }

    #[test]
    fn test_receptor_dir_without_name() {
        assert!(matches!(
            Layout::new(".", "lig", "/"),
            Err(Error::NoReceptorSetName(_))
        ));
    }
}
