/// Tool parameters that historically differed between otherwise-identical
/// pipeline variants. Defaults are the values the production pipeline used.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// omega2 `-ewindow`: energy window (kcal/mol) for retained conformers
    pub ewindow: f64,
    /// omega2 `-maxconfs`
    pub max_confs: u32,
    /// omega2 `-rms`: RMSD threshold for duplicate conformers
    pub rms: f64,
    /// hybrid `-dock_resolution`
    pub dock_resolution: String,
    /// hybrid `-num_poses`
    pub num_poses: u32,
    /// szybki `-residue`
    pub residue: u32,
    /// szybki `-protein_elec`
    pub protein_elec: String,
    /// szybki `-entropy`
    pub entropy_method: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
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
}

/// Names a single `Tuning` value inside an argument template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knob {
    Ewindow,
    MaxConfs,
    Rms,
    DockResolution,
    NumPoses,
    Residue,
    ProteinElec,
    EntropyMethod,
}

impl Tuning {
    /// Render one value as a command-line argument.
    pub fn value(&self, knob: Knob) -> String {
        use Knob::*;
        match knob {
            // Debug keeps the decimal point ("25.0"), matching what the tools were given before.
            Ewindow => format!("{:?}", self.ewindow),
            MaxConfs => self.max_confs.to_string(),
            Rms => format!("{:?}", self.rms),
            DockResolution => self.dock_resolution.clone(),
            NumPoses => self.num_poses.to_string(),
            Residue => self.residue.to_string(),
            ProteinElec => self.protein_elec.clone(),
            EntropyMethod => self.entropy_method.clone(),
        }
    }
}
