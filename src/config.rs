//! Loads the project file (`podcast.yaml`) into a [`Config`]. Every relative
//! path in the project file is resolved against the directory which contains
//! it.

use crate::date::{self, DateStyle};
use crate::page::PageSource;
use crate::url::{self as resolve, MediaHost};
use crate::util::{self, OpenError};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "podcast.yaml";

#[derive(Deserialize)]
struct Ttl(u32);
impl Default for Ttl {
    fn default() -> Self {
        Ttl(60)
    }
}

#[derive(Deserialize)]
struct Project {
    site_url: Url,

    #[serde(default = "default_language")]
    language: String,

    #[serde(default)]
    ttl: Ttl,

    #[serde(default)]
    explicit: bool,

    #[serde(default)]
    date_style: DateStyle,

    #[serde(default)]
    pub_date: Option<String>,

    #[serde(default = "default_metadata")]
    metadata: PathBuf,

    #[serde(default = "default_episodes")]
    episodes: PathBuf,

    #[serde(default = "default_output_directory")]
    output_directory: PathBuf,

    #[serde(default = "default_feed_path")]
    feed_path: String,

    media: MediaHost,
    page: PageSource,
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_metadata() -> PathBuf {
    PathBuf::from("data/meta.json")
}

fn default_episodes() -> PathBuf {
    PathBuf::from("data/episodes.json")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("public")
}

fn default_feed_path() -> String {
    "rss.xml".to_owned()
}

/// Everything a build needs to know, with paths and URLs resolved.
#[derive(Debug)]
pub struct Config {
    pub site_url: Url,
    pub feed_url: Url,
    pub language: String,
    pub ttl: u32,
    pub explicit: bool,
    pub date_style: DateStyle,
    pub pub_date: Option<DateTime<FixedOffset>>,
    pub metadata_file: PathBuf,
    pub episodes_file: PathBuf,
    pub feed_output: PathBuf,
    pub page_output: PathBuf,
    pub media: MediaHost,
    pub page: PageSource,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a project file and
    /// loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let path = dir.join(PROJECT_FILE);
            if path.is_file() {
                log::debug!("using project file {}", path.display());
                return Config::from_project_file(&path);
            }
            current = dir.parent();
        }
        Err(Error::NotFound(dir.to_owned()))
    }

    /// Loads the project file at `path`.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = util::read_to_string(path, "project")?;
        let root = match path.parent() {
            Some(root) => root,
            None => return Err(Error::NoParent(path.to_owned())),
        };
        Config::from_yaml(root, &contents).map_err(|err| match err {
            Error::Deserialize { path: _, err } => Error::Deserialize {
                path: Some(path.to_owned()),
                err,
            },
            err => err,
        })
    }

    /// Parses project-file contents, resolving relative paths against
    /// `root`.
    pub fn from_yaml(root: &Path, contents: &str) -> Result<Config> {
        let project: Project =
            serde_yaml::from_str(contents).map_err(|err| Error::Deserialize { path: None, err })?;
        let output_directory = root.join(&project.output_directory);
        Ok(Config {
            feed_url: resolve::join(&project.site_url, &project.feed_path)?,
            site_url: project.site_url,
            language: project.language,
            ttl: project.ttl.0,
            explicit: project.explicit,
            date_style: project.date_style,
            pub_date: match &project.pub_date {
                Some(input) => Some(date::parse(input)?),
                None => None,
            },
            metadata_file: root.join(&project.metadata),
            episodes_file: root.join(&project.episodes),
            feed_output: output_directory.join(&project.feed_path),
            page_output: output_directory.join("index.html"),
            media: project.media,
            page: project.page.relative_to(root),
        })
    }
}

/// Represents the result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the project file.
#[derive(Debug)]
pub enum Error {
    /// Returned when no project file exists in the directory or any of its
    /// ancestors.
    NotFound(PathBuf),

    /// Returned when the project file path has no parent directory.
    NoParent(PathBuf),

    /// Returned when the project file can't be read.
    Open(OpenError),

    /// Returned when the project file isn't valid.
    Deserialize {
        path: Option<PathBuf>,
        err: serde_yaml::Error,
    },

    /// Returned when the feed path doesn't form a valid URL.
    Url(resolve::Error),

    /// Returned when `pub_date` can't be parsed.
    Date(date::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(dir) => write!(
                f,
                "Could not find `{}` in `{}` or any parent directory",
                PROJECT_FILE,
                dir.display()
            ),
            Error::NoParent(path) => write!(
                f,
                "Can't get parent directory for project file path `{}`",
                path.display()
            ),
            Error::Open(err) => err.fmt(f),
            Error::Deserialize { path: Some(path), err } => {
                write!(f, "Loading configuration `{}`: {}", path.display(), err)
            }
            Error::Deserialize { path: None, err } => write!(f, "Loading configuration: {}", err),
            Error::Url(err) => err.fmt(f),
            Error::Date(err) => write!(f, "pub_date: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::NoParent(_) => None,
            Error::Open(err) => Some(err),
            Error::Deserialize { path: _, err } => Some(err),
            Error::Url(err) => Some(err),
            Error::Date(err) => Some(err),
        }
    }
}

impl From<OpenError> for Error {
    fn from(err: OpenError) -> Error {
        Error::Open(err)
    }
}

impl From<resolve::Error> for Error {
    fn from(err: resolve::Error) -> Error {
        Error::Url(err)
    }
}

impl From<date::Error> for Error {
    fn from(err: date::Error) -> Error {
        Error::Date(err)
    }
}
