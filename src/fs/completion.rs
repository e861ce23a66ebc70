use std::path::Path;

use super::Fs;

/// Policy for treating a unit's primary output as already produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Completion {
    /// The primary output exists, whatever its contents.
    Exists,
    /// The primary output exists and is not empty.
    NonEmpty,
    /// A `.done` marker, written after the tool exits successfully, exists.
    Marker,
}

impl Fs {
    /// Memoization gate: true if the unit owning `primary` needs no further work.
    ///
    /// The filesystem is the only record of completed work. With `Exists`, a file
    /// truncated by a crash mid-write still counts as done.
    pub fn is_complete(&self, primary: &Path, policy: Completion) -> bool {
        match policy {
            Completion::Exists => self.exists(primary),
            Completion::NonEmpty => self.file_len(primary).map(|len| len > 0).unwrap_or(false),
            Completion::Marker => self.exists(self.marker(primary)),
        }
    }

    /// Record successful completion of the unit owning `primary`, if the policy uses markers.
    pub fn mark_complete(&self, primary: &Path, policy: Completion) -> anyhow::Result<()> {
        if policy == Completion::Marker {
            self.write_file(self.marker(primary), "0")?;
        }
        Ok(())
    }
}
