use std::io;
use std::path::{Path, PathBuf};

use crate::fs::Fs;

/// Field separator in docking score files.
const SCORE_DELIM: char = '\t';

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Unable to read score file {0:?}")]
    Unreadable(PathBuf, #[source] io::Error),
    #[error("Score file {0:?} names no receptor")]
    NoReceptor(PathBuf),
}

/// Read the score file written alongside a docked pose and return the
/// identifier of the receptor that scored best, i.e. its last field.
///
/// A missing or empty score file only affects the unit that needed it;
/// callers skip that unit and carry on.
pub fn best_receptor(
    fs: &Fs,
    score_file: &Path,
    strbuf: &mut String,
) -> Result<String, ContextError> {
    fs.read_to_buf(score_file, strbuf)
        .map_err(|e| ContextError::Unreadable(score_file.to_owned(), e))?;
    let receptor =
        last_field(strbuf.as_str()).ok_or_else(|| ContextError::NoReceptor(score_file.to_owned()))?;
    log::debug!("best receptor from {score_file:?}: {receptor}");
    Ok(receptor.to_owned())
}

/// Last tab-separated field of `contents`, without its line ending.
/// `None` if that field is empty.
pub fn last_field(contents: &str) -> Option<&str> {
    let line = contents.strip_suffix('\n').unwrap_or(contents);
    let line = line.strip_suffix('\r').unwrap_or(line);
    match line.rsplit(SCORE_DELIM).next() {
        Some(field) if !field.is_empty() => Some(field),
        _ => None,
    }
}
