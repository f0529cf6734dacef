//! Resolves site-relative and storage-relative paths into absolute URLs. See
//! [`join`] for the joining rule and [`MediaHost`] for the media backends.

use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use url::{ParseError, Url};

/// The query parameter which asks a storage bucket for the object's bytes
/// rather than its metadata.
const RAW_MEDIA_PARAM: &str = "alt=media";

/// The hosting backends that episode media can live on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Host {
    /// Media is served as plain files next to the site (`{base}/{path}`).
    Web,

    /// Media lives in a Firebase storage bucket
    /// (`{base}/{path}?alt=media`).
    FirebaseStorage,
}

/// The URL-resolution policy for episode media: a backend plus the base URL
/// under which storage paths are resolved.
#[derive(Clone, Debug, Deserialize)]
pub struct MediaHost {
    pub host: Host,
    pub base_url: Url,
}

impl MediaHost {
    /// Resolves an episode's storage path into the absolute URL of its media
    /// file.
    pub fn resolve(&self, storage_path: &str) -> Result<Url> {
        match self.host {
            Host::Web => join(&self.base_url, storage_path),
            Host::FirebaseStorage => join(&self.base_url, &with_raw_media(storage_path)),
        }
    }
}

/// Joins `path` onto `base` with exactly one `/` between them, regardless of
/// trailing slashes on `base` or leading slashes on `path`.
///
/// Unlike [`Url::join`], the last segment of `base` is never replaced, and
/// percent-escapes already present in `path` (e.g., `%2F` in bucket object
/// names) are kept as they are.
pub fn join(base: &Url, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/'),
    );
    Url::parse(&joined).map_err(|err| Error { url: joined, err })
}

fn with_raw_media(path: &str) -> Cow<str> {
    match path.split_once('?') {
        None => Cow::Owned(format!("{}?{}", path, RAW_MEDIA_PARAM)),
        Some((_, query)) if query.split('&').any(|p| p == RAW_MEDIA_PARAM) => {
            Cow::Borrowed(path)
        }
        Some((_, query)) if query.is_empty() => Cow::Owned(format!("{}{}", path, RAW_MEDIA_PARAM)),
        Some(_) => Cow::Owned(format!("{}&{}", path, RAW_MEDIA_PARAM)),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returned when a joined URL isn't a valid absolute URL.
#[derive(Debug)]
pub struct Error {
    pub url: String,
    pub err: ParseError,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid URL `{}`: {}", self.url, self.err)
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_join_single_separator() -> Result<()> {
        fixture_join("https://example.org/media/ep1.mp3", "https://example.org/media", "ep1.mp3")
    }

    #[test]
    fn test_join_trailing_slash_base() -> Result<()> {
        fixture_join("https://example.org/media/ep1.mp3", "https://example.org/media/", "ep1.mp3")
    }

    #[test]
    fn test_join_leading_slash_path() -> Result<()> {
        fixture_join("https://example.org/media/ep1.mp3", "https://example.org/media/", "/ep1.mp3")
    }

    #[test]
    fn test_join_keeps_last_base_segment() -> Result<()> {
        // `Url::join` would drop `o` here.
        fixture_join(
            "https://storage.example.org/v0/b/bucket/o/ep1.mp3",
            "https://storage.example.org/v0/b/bucket/o",
            "ep1.mp3",
        )
    }

    #[test]
    fn test_join_empty_path() -> Result<()> {
        fixture_join("https://example.org/", "https://example.org", "")
    }

    #[test]
    fn test_join_no_double_encoding() -> Result<()> {
        fixture_join(
            "https://example.org/o/episodes%2Fep1.mp3",
            "https://example.org/o",
            "episodes%2Fep1.mp3",
        )
    }

    #[test]
    fn test_resolve_web() -> Result<()> {
        fixture_resolve(Host::Web, "https://example.org/audio/ep1.mp3", "ep1.mp3")
    }

    #[test]
    fn test_resolve_storage_appends_raw_media() -> Result<()> {
        fixture_resolve(
            Host::FirebaseStorage,
            "https://example.org/audio/ep1.mp3?alt=media",
            "ep1.mp3",
        )
    }

    #[test]
    fn test_resolve_storage_existing_query() -> Result<()> {
        fixture_resolve(
            Host::FirebaseStorage,
            "https://example.org/audio/ep1.mp3?token=abc&alt=media",
            "ep1.mp3?token=abc",
        )
    }

    #[test]
    fn test_resolve_storage_raw_media_once() -> Result<()> {
        fixture_resolve(
            Host::FirebaseStorage,
            "https://example.org/audio/ep1.mp3?alt=media",
            "ep1.mp3?alt=media",
        )
    }

    fn fixture_join(wanted: &str, base: &str, path: &str) -> Result<()> {
        let base = Url::parse(base).unwrap();
        assert_eq!(wanted, join(&base, path)?.as_str());
        Ok(())
    }

    fn fixture_resolve(host: Host, wanted: &str, storage_path: &str) -> Result<()> {
        let media = MediaHost {
            host,
            base_url: Url::parse("https://example.org/audio/").unwrap(),
        };
        assert_eq!(wanted, media.resolve(storage_path)?.as_str());
        Ok(())
    }
}
