use std::path::{Path, PathBuf};

use util::append_suffix;

use super::Fs;

/// Utility fns for making the bookkeeping paths that sit next to stage outputs.
/// None of these match any stage's input pattern, so they never become work units.
impl Fs {
    /// $PRIMARY.done
    pub fn marker(&self, primary: &Path) -> PathBuf {
        append_suffix(primary, ".done")
    }

    /// $PREFIX.stdout.txt
    pub fn stdout(&self, prefix: &Path) -> PathBuf {
        append_suffix(prefix, ".stdout.txt")
    }

    /// $PREFIX.stderr.txt
    pub fn stderr(&self, prefix: &Path) -> PathBuf {
        append_suffix(prefix, ".stderr.txt")
    }
}
