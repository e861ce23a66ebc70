use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};

use util::PathEncodingError;

/// Decide whether a unit's output is already complete
mod completion;
pub use completion::Completion;

/// Defines fns for creating common paths next to stage outputs
mod paths;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Specified output directory \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is not whitelisted")]
    NotWhitelisted(String),
    #[error("Invalid input pattern \"{0}\"")]
    InvalidPattern(String, #[source] glob::PatternError),
}

/// All file operations in the crate should go through this struct.
///
/// All destructive operations check that the path in question is a child of the
/// single whitelisted prefix (the project root holding the stage directories),
/// otherwise they will not be performed. The external tools themselves are not
/// bound by this rule; they write wherever their arguments tell them to.
#[derive(Debug)]
pub struct Fs {
    /// The directory we are allowed to modify
    root: PathBuf,
    /// if true, prevents all destructive operations
    dry_run: bool,
}

impl Fs {
    /// Create a new `Fs` rooted at the given project directory.
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
        }
    }

    /// Check whether the project root exists, and create it if not.
    pub fn ensure_root_exists(&self, verbose: bool) -> Result<()> {
        if !self.root.exists() {
            if self.dry_run {
                println!("Dry run. Not creating output directory {:?}", self.root);
            } else {
                println!("Output directory {:?} doesn't exist. Creating.", self.root);
                fs::create_dir_all(&self.root).context("creating output directory")?;
            }
        } else if !self.root.is_dir() {
            return Err(Error::NotDirectory(
                self.root.to_str().ok_or(PathEncodingError)?.to_string(),
            )
            .into());
        } else if verbose {
            println!("Output directory {:?} already exists. Not creating.", self.root);
        }
        Ok(())
    }

    /// List files in `dir` whose names match `pattern` (e.g. `*.sdf`).
    ///
    /// A missing or empty directory yields no paths rather than an error;
    /// only a malformed pattern fails. Unreadable entries are logged and skipped.
    pub fn resolve<T: AsRef<Path>>(&self, dir: T, pattern: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let dir_str = dir.to_str().ok_or(PathEncodingError)?;
        // the directory part is literal, only the file name part is a pattern:
        let full = format!(
            "{}{}{}",
            glob::Pattern::escape(dir_str),
            std::path::MAIN_SEPARATOR,
            pattern
        );
        let entries =
            glob::glob(&full).map_err(|e| Error::InvalidPattern(full.clone(), e))?;

        let mut paths = Vec::with_capacity(16);
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => log::warn!("skipping unreadable input {:?}: {}", e.path(), e.error()),
            }
        }
        log::debug!("{} inputs match {full}", paths.len());
        Ok(paths)
    }

    /// Check if path exists on disk.
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Size in bytes of the file at `path`.
    pub fn file_len<T: AsRef<Path>>(&self, path: T) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    /// Create a directory (uses `std::fs::create_dir_all`, so an entire tree of dirs can be created).
    pub fn create_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::create_dir_all(path).with_context(|| format!("creating dir {path:?}"))?;
        Ok(())
    }

    /// Create a file, and return a writable `File` handle.
    pub fn create_file<T: AsRef<Path>>(&self, path: T) -> Result<fs::File> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        let f = fs::File::create(path).with_context(|| format!("creating file {path:?}"))?;
        Ok(f)
    }

    /// Write entire str to a file.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::write(path, text).with_context(|| format!("writing file {path:?}"))?;
        Ok(())
    }

    /// Read entire file into `strbuf`, replacing its contents.
    pub fn read_to_buf<T: AsRef<Path>>(&self, path: T, strbuf: &mut String) -> io::Result<()> {
        use std::io::Read;
        let path = path.as_ref();
        strbuf.clear();
        let mut f = fs::File::open(path)?;
        let cap = f.metadata()?.len() as usize;
        if cap > strbuf.capacity() {
            strbuf.reserve(cap);
        }
        f.read_to_string(strbuf)?;
        Ok(())
    }

    fn is_whitelisted<T: AsRef<Path>>(&self, path: T) -> bool {
        path.as_ref().starts_with(&self.root)
    }

    fn check_whitelist(&self, path: &Path) -> Result<()> {
        if self.dry_run || !self.is_whitelisted(path) {
            Err(Error::NotWhitelisted(path.to_str().ok_or(PathEncodingError)?.to_owned()).into())
        } else {
            Ok(())
        }
    }
}
