//! Writes rendered documents to disk. All writes are started at once, and
//! [`write_all`] only returns after every one of them has finished.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

/// A rendered document and the file it belongs in.
pub struct Output<'a> {
    pub path: &'a Path,
    pub contents: &'a str,
}

/// Writes every [`Output`] concurrently, replacing existing files and
/// creating missing parent directories. Fails if any write fails; the other
/// writes still run to completion, so some files may have been written.
pub fn write_all(outputs: &[Output]) -> Result<()> {
    let mut failures: Vec<Error> = thread::scope(|scope| {
        let handles: Vec<_> = outputs
            .iter()
            .map(|output| (output.path, scope.spawn(move || write_output(output))))
            .collect();
        handles
            .into_iter()
            .filter_map(|(path, handle)| match handle.join() {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err),
                Err(_) => Some(Error::Panicked(path.to_owned())),
            })
            .collect()
    });

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(Error::Multiple(failures)),
    }
}

fn write_output(output: &Output) -> Result<()> {
    let annotate = |err| Error::Io {
        path: output.path.to_owned(),
        err,
    };
    if let Some(dir) = output.path.parent() {
        std::fs::create_dir_all(dir).map_err(annotate)?;
    }
    std::fs::write(output.path, output.contents).map_err(annotate)?;
    log::debug!(
        "wrote {} ({} bytes)",
        output.path.display(),
        output.contents.len()
    );
    Ok(())
}

/// The result of a fallible write operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing output files.
#[derive(Debug)]
pub enum Error {
    /// An error writing an output file.
    Io { path: PathBuf, err: io::Error },

    /// The thread writing an output file panicked.
    Panicked(PathBuf),

    /// More than one write failed.
    Multiple(Vec<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => write!(f, "Writing '{}': {}", path.display(), err),
            Error::Panicked(path) => write!(f, "Writing '{}': writer panicked", path.display()),
            Error::Multiple(errs) => {
                write!(f, "{} writes failed", errs.len())?;
                for err in errs {
                    write!(f, "; {}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::Panicked(_) => None,
            Error::Multiple(errs) => errs.first().map(|e| e as &(dyn std::error::Error + 'static)),
        }
    }
}
