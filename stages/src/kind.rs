use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The five pipeline stages, in the order the controller runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Conformers,
    Docking,
    Optimization,
    EntropyInSolution,
    EntropyBounded,
}

impl StageKind {
    /// Every stage, in fixed execution order.
    /// Conformers come first since both docking and entropy-in-solution read them;
    /// optimization and entropy-bounded read docking output.
    pub const ALL: [StageKind; 5] = [
        StageKind::Conformers,
        StageKind::Docking,
        StageKind::Optimization,
        StageKind::EntropyInSolution,
        StageKind::EntropyBounded,
    ];

    /// Short name, as used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Conformers => "conformers",
            Self::Docking => "docking",
            Self::Optimization => "optimize",
            Self::EntropyInSolution => "eis",
            Self::EntropyBounded => "eb",
        }
    }

    /// Banner text printed when the stage starts.
    pub fn title(self) -> &'static str {
        match self {
            Self::Conformers => "Generating conformers",
            Self::Docking => "Docking ligands",
            Self::Optimization => "Optimizing bound ligands",
            Self::EntropyInSolution => "Estimating entropy in solution",
            Self::EntropyBounded => "Estimating entropy bounded",
        }
    }

    /// Whether this stage fans out across the worker pool when nothing
    /// on the command line says otherwise.
    pub fn concurrent_by_default(self, distributed: bool) -> bool {
        match self {
            Self::Conformers | Self::EntropyInSolution => false,
            Self::Docking | Self::Optimization | Self::EntropyBounded => distributed,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conformers" => Ok(Self::Conformers),
            "docking" => Ok(Self::Docking),
            "optimize" | "optimization" => Ok(Self::Optimization),
            "eis" | "entropy-in-solution" => Ok(Self::EntropyInSolution),
            "eb" | "entropy-bounded" => Ok(Self::EntropyBounded),
            _ => Err(Error::UnknownStage(s.to_owned())),
        }
    }
}

/// Small set of stages, used for "which stages were requested"
/// and "which stages run concurrently".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageSet {
    mask: u8,
}

impl StageSet {
    pub fn insert(&mut self, kind: StageKind) {
        self.mask |= kind.bit();
    }

    pub fn remove(&mut self, kind: StageKind) {
        self.mask &= !kind.bit();
    }

    pub fn set(&mut self, kind: StageKind, on: bool) {
        if on {
            self.insert(kind)
        } else {
            self.remove(kind)
        }
    }

    pub fn contains(&self, kind: StageKind) -> bool {
        self.mask & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Iterate members in execution order.
    pub fn iter(&self) -> impl Iterator<Item = StageKind> + '_ {
        StageKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl FromIterator<StageKind> for StageSet {
    fn from_iter<I: IntoIterator<Item = StageKind>>(iter: I) -> Self {
        let mut set = Self::default();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}
