//! Support for creating an RSS 2.0 podcast feed (with the iTunes extension)
//! from a list of [`FeedItem`]s.

use crate::date::DateStyle;
use crate::episode::{ITunesTaxonomy, Metadata};
use crate::item::FeedItem;
use chrono::{DateTime, FixedOffset};
use rss::extension::atom::{AtomExtension, AtomExtensionBuilder, Link};
use rss::extension::itunes::{
    ITunesCategory, ITunesCategoryBuilder, ITunesChannelExtensionBuilder,
    ITunesItemExtensionBuilder, ITunesOwnerBuilder,
};
use rss::validation::{Validate, ValidationError};
use rss::{
    CategoryBuilder, Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, Item,
    ItemBuilder,
};
use std::fmt;
use url::Url;

const GENERATOR: &str = concat!("podsite ", env!("CARGO_PKG_VERSION"));

/// Bundled configuration for creating a feed.
pub struct FeedConfig<'a> {
    pub metadata: &'a Metadata,
    pub site_url: Url,
    pub feed_url: Url,
    pub image_url: Url,
    pub language: String,
    pub ttl: u32,
    pub explicit: bool,
    pub date_style: DateStyle,

    /// The channel's publication date. When unset, the newest item date is
    /// used.
    pub pub_date: Option<DateTime<FixedOffset>>,
}

/// Accumulates [`FeedItem`]s in the order they're added and serializes them
/// into an RSS document. Nothing is rendered until [`FeedBuilder::to_xml`].
pub struct FeedBuilder<'a> {
    config: FeedConfig<'a>,
    items: Vec<Item>,
    newest: Option<DateTime<FixedOffset>>,
}

impl<'a> FeedBuilder<'a> {
    pub fn new(config: FeedConfig<'a>) -> FeedBuilder<'a> {
        FeedBuilder {
            config,
            items: Vec::new(),
            newest: None,
        }
    }

    /// Appends an item to the feed.
    pub fn add_item(&mut self, item: &FeedItem) {
        if self.newest.map_or(true, |newest| item.date > newest) {
            self.newest = Some(item.date);
        }
        let item = self.rss_item(item);
        self.items.push(item);
    }

    fn rss_item(&self, item: &FeedItem) -> Item {
        let explicit = explicit_flag(self.config.explicit);
        ItemBuilder::default()
            .title(item.title.clone())
            .description(item.description.clone())
            .link(item.url.to_string())
            .guid(
                GuidBuilder::default()
                    .value(item.url.to_string())
                    .permalink(true)
                    .build(),
            )
            .enclosure(
                EnclosureBuilder::default()
                    .url(item.enclosure_url().to_string())
                    .length(item.length.to_string())
                    .mime_type(item.mime_type.clone())
                    .build(),
            )
            .author(item.author.clone())
            .categories(
                item.categories
                    .iter()
                    .map(|c| CategoryBuilder::default().name(c.clone()).build())
                    .collect::<Vec<_>>(),
            )
            .pub_date(self.config.date_style.format(&item.date))
            .itunes_ext(
                ITunesItemExtensionBuilder::default()
                    .author(item.author.clone())
                    .summary(item.description.clone())
                    .explicit(explicit)
                    .build(),
            )
            .build()
    }

    /// Builds the [`Channel`] from the configuration and the items added so
    /// far.
    pub fn build(&self) -> Channel {
        let config = &self.config;
        let meta = config.metadata;
        let pub_date = config
            .pub_date
            .or(self.newest)
            .map(|date| config.date_style.format(&date));

        ChannelBuilder::default()
            .title(meta.title.clone())
            .description(meta.description.clone())
            .link(config.site_url.to_string())
            .language(config.language.clone())
            .copyright(non_empty(&meta.copyright))
            .managing_editor(non_empty(&meta.editor))
            .webmaster(non_empty(&meta.web_master))
            .categories(
                meta.categories
                    .iter()
                    .map(|c| CategoryBuilder::default().name(c.clone()).build())
                    .collect::<Vec<_>>(),
            )
            .pub_date(pub_date.clone())
            .last_build_date(pub_date)
            .generator(GENERATOR.to_owned())
            .ttl(config.ttl.to_string())
            .image(
                ImageBuilder::default()
                    .url(config.image_url.to_string())
                    .title(meta.title.clone())
                    .link(config.site_url.to_string())
                    .build(),
            )
            .itunes_ext(
                ITunesChannelExtensionBuilder::default()
                    .author(meta.author.clone())
                    .summary(meta.description.clone())
                    .explicit(explicit_flag(config.explicit))
                    .image(config.image_url.to_string())
                    .owner(
                        ITunesOwnerBuilder::default()
                            .name(meta.author.clone())
                            .email(non_empty(&meta.email))
                            .build(),
                    )
                    .categories(itunes_categories(&meta.itunes))
                    .build(),
            )
            .atom_ext(self_link(&config.feed_url))
            .items(self.items.clone())
            .build()
    }

    /// Builds the channel and serializes it as XML. Feeds with RFC 2822 dates
    /// are validated first; legacy dates never pass validation, so those
    /// feeds are written as-is.
    pub fn to_xml(&self) -> Result<String> {
        let channel = self.build();
        match self.config.date_style {
            DateStyle::Rfc2822 => validate(&channel)?,
            DateStyle::Legacy => log::debug!("skipping feed validation for legacy dates"),
        }
        let buf = channel.pretty_write_to(Vec::new(), b' ', 2)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Validates `channel`. An unknown enclosure length is written as `0`, which
/// `rss` rejects, so those enclosures are left out of the check.
fn validate(channel: &Channel) -> std::result::Result<(), ValidationError> {
    let mut checked = channel.clone();
    for item in checked.items_mut() {
        if item.enclosure().map_or(false, |e| e.length() == "0") {
            item.set_enclosure(None);
        }
    }
    checked.validate()
}

/// The `atom:link` by which the feed names its own location.
fn self_link(feed_url: &Url) -> AtomExtension {
    AtomExtensionBuilder::default()
        .link(Link {
            href: feed_url.to_string(),
            rel: "self".to_owned(),
            hreflang: None,
            mime_type: Some("application/rss+xml".to_owned()),
            title: None,
            length: None,
        })
        .build()
}

/// Expands the taxonomy into one iTunes category per subcategory, each nested
/// under the primary category.
fn itunes_categories(taxonomy: &ITunesTaxonomy) -> Vec<ITunesCategory> {
    if taxonomy.category.is_empty() {
        return Vec::new();
    }
    if taxonomy.subcategories.is_empty() {
        return vec![ITunesCategoryBuilder::default()
            .text(taxonomy.category.clone())
            .build()];
    }
    taxonomy
        .subcategories
        .iter()
        .map(|sub| {
            ITunesCategoryBuilder::default()
                .text(taxonomy.category.clone())
                .subcategory(Box::new(
                    ITunesCategoryBuilder::default().text(sub.clone()).build(),
                ))
                .build()
        })
        .collect()
}

fn explicit_flag(explicit: bool) -> String {
    let flag = if explicit { "true" } else { "false" };
    flag.to_owned()
}

fn non_empty(s: &str) -> Option<String> {
    match s.trim() {
        "" => None,
        s => Some(s.to_owned()),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include validation,
/// serialization, and encoding issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when the built channel isn't a valid RSS document.
    Validation(ValidationError),

    /// Returned when the channel can't be serialized.
    Rss(rss::Error),

    /// Returned when the serialized feed isn't UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Validation(err) => write!(f, "RSS validation failed: {}", err),
            Error::Rss(err) => err.fmt(f),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(err) => Some(err),
            Error::Rss(err) => Some(err),
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<ValidationError> for Error {
    /// Converts [`ValidationError`]s into [`Error`]. This allows us to use the
    /// `?` operator when validating the channel.
    fn from(err: ValidationError) -> Error {
        Error::Validation(err)
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator when writing the channel.
    fn from(err: rss::Error) -> Error {
        Error::Rss(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    /// Converts [`std::string::FromUtf8Error`]s into [`Error`].
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}
