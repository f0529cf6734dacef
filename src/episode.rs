//! Defines the input records, [`Metadata`] and [`Episode`], and the logic for
//! loading them from disk. Both files are parsed with [`serde_yaml`], so they
//! may be written as either JSON or YAML.

use crate::util::{self, OpenError};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_IMAGE: &str = "img/logo-transparent.jpg";

/// Show-wide information. There is exactly one of these per site.
#[derive(Clone, Debug, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,

    /// The default author for every episode which doesn't name its own.
    pub author: String,

    #[serde(default)]
    pub editor: String,

    #[serde(default, rename = "webMaster")]
    pub web_master: String,

    #[serde(default)]
    pub copyright: String,

    #[serde(default)]
    pub categories: Vec<String>,

    /// The owner's contact address, published in the iTunes owner block.
    #[serde(default)]
    pub email: String,

    /// The show artwork, relative to the site root.
    #[serde(default = "default_image")]
    pub image: String,

    #[serde(default)]
    pub itunes: ITunesTaxonomy,
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_owned()
}

/// The show's place in the iTunes category taxonomy: one primary category
/// and any number of its subcategories.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ITunesTaxonomy {
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// A single episode as written in the episode list.
#[derive(Clone, Debug, Deserialize)]
pub struct Episode {
    pub title: String,
    pub description: String,

    /// The backend-specific location of the episode's audio file. See
    /// [`crate::url::MediaHost::resolve`].
    #[serde(rename = "storagePath")]
    pub storage_path: String,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// The publication date, either `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,

    /// The size of the audio file in bytes, if known.
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}

impl Episode {
    /// Returns the episode's own author as written, falling back to `default`
    /// when the episode names none (or only whitespace).
    pub fn author_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.author.as_deref() {
            Some(author) if !author.trim().is_empty() => author,
            _ => default,
        }
    }
}

/// Loads the [`Metadata`] record from `path`.
pub fn load_metadata(path: &Path) -> Result<Metadata> {
    load(path, "metadata")
}

/// Loads the episode list from `path`, preserving its order.
pub fn load_episodes(path: &Path) -> Result<Vec<Episode>> {
    load(path, "episodes")
}

fn load<T: serde::de::DeserializeOwned>(path: &Path, kind: &'static str) -> Result<T> {
    let file = util::open(path, kind)?;
    serde_yaml::from_reader(file).map_err(|err| Error::Deserialize {
        path: path.to_owned(),
        err,
    })
}

/// Represents the result of loading input records.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading [`Metadata`] or [`Episode`] records.
#[derive(Debug)]
pub enum Error {
    /// Returned when an input file can't be opened or read.
    Open(OpenError),

    /// Returned when an input file doesn't have the expected shape.
    Deserialize {
        path: PathBuf,
        err: serde_yaml::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open(err) => err.fmt(f),
            Error::Deserialize { path, err } => {
                write!(f, "Parsing `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open(err) => Some(err),
            Error::Deserialize { path: _, err } => Some(err),
        }
    }
}

impl From<OpenError> for Error {
    /// Converts an [`OpenError`] into an [`Error`]. This allows us to use the
    /// `?` operator when opening input files.
    fn from(err: OpenError) -> Error {
        Error::Open(err)
    }
}
