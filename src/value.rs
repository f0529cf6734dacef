//! Conversions from page data into [`Value`]s for templating. Every text
//! field is HTML-escaped here, so templates interpolate it as-is.

use crate::item::FeedItem;
use crate::markdown;
use crate::page::SiteContext;
use gtmpl_value::Value;
use std::collections::HashMap;

impl From<&FeedItem> for Value {
    /// Converts a [`FeedItem`] into the episode context. Fields: `number`,
    /// `title`, `description` (rendered Markdown), `summary` (the escaped
    /// description text), `audio_url`, `author`, `date`, `categories`, and
    /// `tags` (title, URL, and categories joined by commas).
    fn from(item: &FeedItem) -> Value {
        let tags = std::iter::once(item.title.as_str())
            .chain(std::iter::once(item.url.as_str()))
            .chain(item.categories.iter().map(String::as_str))
            .collect::<Vec<&str>>()
            .join(",");

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("number".to_owned(), Value::from(item.number as u64));
        m.insert("title".to_owned(), escaped(&item.title));
        m.insert(
            "description".to_owned(),
            Value::String(markdown::to_html(&item.description)),
        );
        m.insert("summary".to_owned(), escaped(&item.description));
        m.insert("audio_url".to_owned(), escaped(item.url.as_str()));
        m.insert("author".to_owned(), escaped(&item.author));
        m.insert(
            "date".to_owned(),
            Value::String(item.date.format("%-d %B %Y").to_string()),
        );
        m.insert(
            "categories".to_owned(),
            Value::Array(item.categories.iter().map(|c| escaped(c)).collect()),
        );
        m.insert("tags".to_owned(), escaped(&tags));
        Value::Object(m)
    }
}

impl From<&SiteContext<'_>> for Value {
    /// Converts the show-wide data into the site context. The `episodes`
    /// field is left for the caller.
    fn from(site: &SiteContext) -> Value {
        let meta = site.metadata;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), escaped(&meta.title));
        m.insert("description".to_owned(), escaped(&meta.description));
        m.insert(
            "description_html".to_owned(),
            Value::String(markdown::to_html(&meta.description)),
        );
        m.insert("author".to_owned(), escaped(&meta.author));
        m.insert("email".to_owned(), escaped(&meta.email));
        m.insert("copyright".to_owned(), escaped(&meta.copyright));
        m.insert("site_url".to_owned(), escaped(site.site_url.as_str()));
        m.insert("feed_url".to_owned(), escaped(site.feed_url.as_str()));
        m.insert("image_url".to_owned(), escaped(site.image_url.as_str()));
        Value::Object(m)
    }
}

fn escaped(text: &str) -> Value {
    Value::String(markdown::escape(text))
}
