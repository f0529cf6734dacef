//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the site: loading the metadata and episode list
//! ([`crate::episode`]), mapping episodes into feed items ([`crate::item`]),
//! rendering the feed ([`crate::feed`]) and the index page
//! ([`crate::page`]), and writing both to disk ([`crate::write`]).

use crate::config::Config;
use crate::episode::{self, load_episodes, load_metadata};
use crate::feed::{self, FeedBuilder, FeedConfig};
use crate::item::{self, Mapper};
use crate::page::{self, PageTemplate, SiteContext};
use crate::url as resolve;
use crate::write::{self, write_all, Output};
use std::fmt;

/// The two rendered documents of a site.
pub struct Site {
    pub feed: String,
    pub page: String,
}

/// Builds the site from a [`Config`] object: renders it with
/// [`render_site`] and writes the feed and the page concurrently. Both
/// files are replaced on every build.
pub fn build_site(config: &Config) -> Result<()> {
    let site = render_site(config)?;
    write_all(&[
        Output {
            path: &config.feed_output,
            contents: &site.feed,
        },
        Output {
            path: &config.page_output,
            contents: &site.page,
        },
    ])?;
    log::info!(
        "wrote {} and {}",
        config.feed_output.display(),
        config.page_output.display()
    );
    Ok(())
}

/// Renders the feed and the page without touching the output directory.
pub fn render_site(config: &Config) -> Result<Site> {
    let metadata = load_metadata(&config.metadata_file)?;
    let episodes = load_episodes(&config.episodes_file)?;
    log::info!(
        "loaded {} episodes from {}",
        episodes.len(),
        config.episodes_file.display()
    );

    let items = Mapper::new(&metadata, &config.media).map_all(&episodes)?;
    let image_url = resolve::join(&config.site_url, &metadata.image)?;

    let mut feed = FeedBuilder::new(FeedConfig {
        metadata: &metadata,
        site_url: config.site_url.clone(),
        feed_url: config.feed_url.clone(),
        image_url: image_url.clone(),
        language: config.language.clone(),
        ttl: config.ttl,
        explicit: config.explicit,
        date_style: config.date_style,
        pub_date: config.pub_date,
    });
    for item in &items {
        feed.add_item(item);
    }
    let feed = feed.to_xml()?;
    log::debug!("rendered feed with {} items", items.len());

    let template = PageTemplate::load(&config.page)?;
    let page = template.render(
        &SiteContext {
            metadata: &metadata,
            site_url: &config.site_url,
            feed_url: &config.feed_url,
            image_url: &image_url,
        },
        &items,
    )?;
    log::debug!("rendered page with {} episodes", items.len());

    Ok(Site { feed, page })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site: any failure while loading inputs,
/// rendering, or writing outputs.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the metadata or episode list.
    Load(episode::Error),

    /// Returned for errors mapping episodes into feed items.
    Map(item::Error),

    /// Returned when the show image doesn't resolve to a valid URL.
    Url(resolve::Error),

    /// Returned for errors rendering the feed.
    Feed(feed::Error),

    /// Returned for errors rendering the page.
    Page(page::Error),

    /// Returned for errors writing the output files.
    Write(write::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load(err) => err.fmt(f),
            Error::Map(err) => err.fmt(f),
            Error::Url(err) => write!(f, "show image: {}", err),
            Error::Feed(err) => err.fmt(f),
            Error::Page(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Map(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Page(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<episode::Error> for Error {
    /// Converts [`episode::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: episode::Error) -> Error {
        Error::Load(err)
    }
}

impl From<item::Error> for Error {
    /// Converts [`item::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: item::Error) -> Error {
        Error::Map(err)
    }
}

impl From<resolve::Error> for Error {
    /// Converts [`resolve::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: resolve::Error) -> Error {
        Error::Url(err)
    }
}

impl From<feed::Error> for Error {
    /// Converts [`feed::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: feed::Error) -> Error {
        Error::Feed(err)
    }
}

impl From<page::Error> for Error {
    /// Converts [`page::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: page::Error) -> Error {
        Error::Page(err)
    }
}

impl From<write::Error> for Error {
    /// Converts [`write::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: write::Error) -> Error {
        Error::Write(err)
    }
}
