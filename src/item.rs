//! Defines [`FeedItem`], the normalized form of an [`Episode`], and the
//! [`Mapper`] which produces them.

use crate::date;
use crate::episode::{Episode, Metadata};
use crate::url::{self as resolve, MediaHost};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use url::Url;

const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// An [`Episode`] with its author, date, and media URL resolved, ready for
/// the feed and the page.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedItem {
    /// The 1-based position of the episode in the episode list. This never
    /// changes with display order.
    pub number: usize,

    pub title: String,
    pub description: String,

    /// The single URL for the episode's audio. It serves as the item link,
    /// the guid, and the enclosure URL.
    pub url: Url,

    pub categories: Vec<String>,

    /// The episode's author, or the show's author if the episode names none.
    pub author: String,

    pub date: DateTime<FixedOffset>,

    /// The enclosure length in bytes (`0` when unknown).
    pub length: u64,

    pub mime_type: String,
}

impl FeedItem {
    pub fn enclosure_url(&self) -> &Url {
        &self.url
    }
}

/// Maps [`Episode`]s into [`FeedItem`]s against the show [`Metadata`] and a
/// media URL policy.
pub struct Mapper<'a> {
    metadata: &'a Metadata,
    media: &'a MediaHost,
}

impl<'a> Mapper<'a> {
    pub fn new(metadata: &'a Metadata, media: &'a MediaHost) -> Mapper<'a> {
        Mapper { metadata, media }
    }

    /// Maps every episode, preserving order. Numbers are assigned from the
    /// position in `episodes`.
    pub fn map_all(&self, episodes: &[Episode]) -> Result<Vec<FeedItem>> {
        episodes
            .iter()
            .enumerate()
            .map(|(index, episode)| self.map(index, episode))
            .collect()
    }

    /// Maps a single episode found at the 0-based `index` of the episode
    /// list.
    pub fn map(&self, index: usize, episode: &Episode) -> Result<FeedItem> {
        match self._map(index, episode) {
            Ok(item) => Ok(item),
            Err(e) => Err(Error::Annotated(
                format!("mapping episode {} `{}`", index + 1, episode.title),
                Box::new(e),
            )),
        }
    }

    fn _map(&self, index: usize, episode: &Episode) -> Result<FeedItem> {
        Ok(FeedItem {
            number: index + 1,
            title: episode.title.clone(),
            description: episode.description.clone(),
            url: self.media.resolve(&episode.storage_path)?,
            categories: episode.categories.clone(),
            author: episode.author_or(&self.metadata.author).to_owned(),
            date: date::parse(&episode.date)?,
            length: episode.size.unwrap_or(0),
            mime_type: episode
                .mime_type
                .clone()
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_owned()),
        })
    }
}

/// Represents the result of mapping episodes.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error mapping an [`Episode`] into a [`FeedItem`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the storage path doesn't resolve to a valid URL.
    Url(resolve::Error),

    /// Returned when the episode's date can't be parsed.
    Date(date::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Url(err) => err.fmt(f),
            Error::Date(err) => err.fmt(f),
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Url(err) => Some(err),
            Error::Date(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<resolve::Error> for Error {
    /// Converts a [`resolve::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when resolving media URLs.
    fn from(err: resolve::Error) -> Error {
        Error::Url(err)
    }
}

impl From<date::Error> for Error {
    /// Converts a [`date::Error`] into an [`Error`]. It allows us to use the
    /// `?` operator when parsing dates.
    fn from(err: date::Error) -> Error {
        Error::Date(err)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::episode::ITunesTaxonomy;
    use crate::url::Host;

    pub(crate) fn metadata() -> Metadata {
        Metadata {
            title: "T".to_owned(),
            description: "About T".to_owned(),
            author: "A".to_owned(),
            editor: "editor@example.org (Ed)".to_owned(),
            web_master: "web@example.org (Web)".to_owned(),
            copyright: "2020 A".to_owned(),
            categories: vec!["Religion".to_owned()],
            email: "a@example.org".to_owned(),
            image: "img/logo.jpg".to_owned(),
            itunes: ITunesTaxonomy {
                category: "Religion & Spirituality".to_owned(),
                subcategories: vec!["Christianity".to_owned()],
            },
        }
    }

    pub(crate) fn storage() -> MediaHost {
        MediaHost {
            host: Host::FirebaseStorage,
            base_url: Url::parse("https://storage.example.org/v0/b/bucket/o").unwrap(),
        }
    }

    pub(crate) fn episode(title: &str, storage_path: &str, date: &str) -> Episode {
        Episode {
            title: title.to_owned(),
            description: format!("About {}", title),
            storage_path: storage_path.to_owned(),
            categories: vec!["c".to_owned()],
            author: None,
            date: date.to_owned(),
            size: None,
            mime_type: None,
        }
    }

    #[test]
    fn test_map_single() -> Result<()> {
        let (metadata, media) = (metadata(), storage());
        let item = Mapper::new(&metadata, &media).map(0, &episode("E1", "p1", "2020-01-01"))?;
        assert_eq!(1, item.number);
        assert_eq!("E1", item.title);
        assert_eq!("A", item.author);
        assert_eq!(
            "https://storage.example.org/v0/b/bucket/o/p1?alt=media",
            item.url.as_str()
        );
        assert_eq!(vec!["c".to_owned()], item.categories);
        assert_eq!(0, item.length);
        assert_eq!(DEFAULT_MIME_TYPE, item.mime_type);
        Ok(())
    }

    #[test]
    fn test_map_author_override() -> Result<()> {
        let (metadata, media) = (metadata(), storage());
        let mut ep = episode("E1", "p1", "2020-01-01");
        ep.author = Some("B".to_owned());
        assert_eq!("B", Mapper::new(&metadata, &media).map(0, &ep)?.author);
        Ok(())
    }

    #[test]
    fn test_map_single_canonical_url() -> Result<()> {
        let (metadata, media) = (metadata(), storage());
        let item = Mapper::new(&metadata, &media).map(3, &episode("E4", "p4", "2020-01-22"))?;
        assert_eq!(&item.url, item.enclosure_url());
        assert_eq!(4, item.number);
        Ok(())
    }

    #[test]
    fn test_map_all_preserves_order() -> Result<()> {
        let (metadata, media) = (metadata(), storage());
        let items = Mapper::new(&metadata, &media).map_all(&[
            episode("E1", "p1", "2020-01-01"),
            episode("E2", "p2", "2020-01-08"),
            episode("E3", "p3", "2020-01-15"),
        ])?;
        let found: Vec<(usize, &str)> = items.iter().map(|i| (i.number, i.title.as_str())).collect();
        assert_eq!(vec![(1, "E1"), (2, "E2"), (3, "E3")], found);
        Ok(())
    }

    #[test]
    fn test_map_bad_date_is_annotated() {
        let (metadata, media) = (metadata(), storage());
        let err = Mapper::new(&metadata, &media)
            .map(1, &episode("E2", "p2", "someday"))
            .unwrap_err();
        assert!(matches!(err, Error::Annotated(_, _)));
        assert!(err.to_string().starts_with("mapping episode 2 `E2`"));
    }
}
