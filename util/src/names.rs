use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::PathEncodingError;

#[derive(thiserror::Error, Debug)]
pub enum NameError {
    #[error(transparent)]
    Encoding(#[from] PathEncodingError),
    #[error("File name \"{0}\" does not end with \"{1}\"")]
    MissingSuffix(String, String),
    #[error("Path has no file name: {0:?}")]
    NoFileName(PathBuf),
}

/// Return the file name of `path` with `suffix` removed,
/// e.g. `docking/K/x_docked.oeb.gz` with suffix `_docked.oeb.gz` gives `x`.
pub fn strip_name_suffix<'a>(path: &'a Path, suffix: &str) -> Result<&'a str, NameError> {
    let name = path
        .file_name()
        .ok_or_else(|| NameError::NoFileName(path.to_owned()))?
        .to_str()
        .ok_or(PathEncodingError)?;
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => Ok(stem),
        _ => Err(NameError::MissingSuffix(name.to_owned(), suffix.to_owned())),
    }
}

/// Append `suffix` to the final component of `path` without inserting a separator.
/// An empty suffix returns `path` unchanged.
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::with_capacity(path.as_os_str().len() + suffix.len());
    s.push(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
