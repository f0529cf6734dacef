use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Opens a file, annotating any failure with the kind of file (e.g.,
/// "metadata", "template") and its path.
pub fn open(path: &Path, kind: &'static str) -> Result<File, OpenError> {
    File::open(path).map_err(|err| OpenError {
        kind,
        path: path.to_owned(),
        err,
    })
}

/// Reads the whole file at `path` into a string. See [`open`].
pub fn read_to_string(path: &Path, kind: &'static str) -> Result<String, OpenError> {
    let mut contents = String::new();
    open(path, kind)?
        .read_to_string(&mut contents)
        .map_err(|err| OpenError {
            kind,
            path: path.to_owned(),
            err,
        })?;
    Ok(contents)
}

/// Returned when an input file can't be opened or read.
#[derive(Debug)]
pub struct OpenError {
    pub kind: &'static str,
    pub path: PathBuf,
    pub err: std::io::Error,
}

impl fmt::Display for OpenError {
    /// Displays an [`OpenError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Opening {} file `{}`: {}",
            self.kind,
            self.path.display(),
            self.err
        )
    }
}

impl std::error::Error for OpenError {
    /// Implements the [`std::error::Error`] trait for [`OpenError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
