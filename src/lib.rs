//! The library code for the `podsite` static site generator. A site is a
//! podcast's RSS feed and its index page, both built from a metadata file and
//! an episode list. The architecture can be broken down into three steps:
//!
//! 1. Loading the inputs ([`crate::config`], [`crate::episode`])
//! 2. Mapping each episode into a feed item ([`crate::item`]), resolving its
//!    media URL ([`crate::url`]) and its author
//! 3. Rendering the feed ([`crate::feed`]) and the page ([`crate::page`]) and
//!    writing both to disk ([`crate::write`])
//!
//! The feed keeps the episode-list order. The page lists episodes newest
//! first, but each episode keeps the number of its position in the episode
//! list.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod episode;
pub mod feed;
pub mod item;
pub mod markdown;
pub mod page;
pub mod url;
pub mod util;
mod value;
pub mod write;
