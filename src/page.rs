//! Renders the index page. Two strategies are supported (see
//! [`PageTemplate`]); both are [`gtmpl`] templates executed against typed
//! context values (see [`crate::value`]), and both list episodes newest first
//! while keeping each episode's original number.

use crate::episode::Metadata;
use crate::item::FeedItem;
use crate::util::{self, OpenError};
use gtmpl::{Context, Template, Value};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where the page templates live, as written in the project file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSource {
    /// A single template which receives the site context with the full
    /// episode list under `episodes`.
    Template(PathBuf),

    /// A head and foot fragment rendered with the site context, and an
    /// episode fragment rendered once per episode.
    Fragments {
        head: PathBuf,
        episode: PathBuf,
        foot: PathBuf,
    },
}

impl PageSource {
    /// Resolves relative template paths against `root`.
    pub fn relative_to(&self, root: &Path) -> PageSource {
        match self {
            PageSource::Template(path) => PageSource::Template(root.join(path)),
            PageSource::Fragments {
                head,
                episode,
                foot,
            } => PageSource::Fragments {
                head: root.join(head),
                episode: root.join(episode),
                foot: root.join(foot),
            },
        }
    }
}

/// Show-wide data made available to the page templates.
pub struct SiteContext<'a> {
    pub metadata: &'a Metadata,
    pub site_url: &'a Url,
    pub feed_url: &'a Url,
    pub image_url: &'a Url,
}

/// A parsed page-rendering strategy.
pub enum PageTemplate {
    Single(Template),
    Fragments {
        head: Template,
        episode: Template,
        foot: Template,
    },
}

impl PageTemplate {
    /// Reads and parses the templates named by `source`.
    pub fn load(source: &PageSource) -> Result<PageTemplate> {
        Ok(match source {
            PageSource::Template(path) => PageTemplate::Single(parse_template(path)?),
            PageSource::Fragments {
                head,
                episode,
                foot,
            } => PageTemplate::Fragments {
                head: parse_template(head)?,
                episode: parse_template(episode)?,
                foot: parse_template(foot)?,
            },
        })
    }

    /// Renders the page for `items`, which must be in episode-list order.
    /// The page shows them in reverse.
    pub fn render(&self, site: &SiteContext, items: &[FeedItem]) -> Result<String> {
        let newest_first = items.iter().rev().map(Value::from);
        match self {
            PageTemplate::Single(template) => {
                let mut context = Value::from(site);
                if let Value::Object(obj) = &mut context {
                    obj.insert("episodes".to_owned(), Value::Array(newest_first.collect()));
                }
                execute(template, context)
            }
            PageTemplate::Fragments {
                head,
                episode,
                foot,
            } => {
                let episodes = newest_first
                    .map(|item| execute(episode, item))
                    .collect::<Result<Vec<String>>>()?;
                Ok(format!(
                    "{}\n{}\n{}",
                    execute(head, Value::from(site))?,
                    episodes.join("\n"),
                    execute(foot, Value::from(site))?,
                ))
            }
        }
    }
}

fn execute(template: &Template, value: Value) -> Result<String> {
    let context = Context::from(value).map_err(Error::Template)?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context).map_err(Error::Template)?;
    Ok(String::from_utf8(out)?)
}

fn parse_template(path: &Path) -> Result<Template> {
    let contents = util::read_to_string(path, "template")?;
    let mut template = Template::default();
    template
        .parse(contents.as_str())
        .map_err(|err| Error::ParseTemplate {
            path: path.to_owned(),
            err,
        })?;
    Ok(template)
}

/// The result of a fallible page-rendering operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-rendering operation.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    Open(OpenError),

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// An error during templating.
    Template(String),

    /// Returned when a template produces output that isn't UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open(err) => err.fmt(f),
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Template(err) => err.fmt(f),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open(err) => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Template(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<OpenError> for Error {
    /// Converts an [`OpenError`] into an [`Error`]. This allows us to use the
    /// `?` operator when reading template files.
    fn from(err: OpenError) -> Error {
        Error::Open(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    /// Converts a [`std::string::FromUtf8Error`] into an [`Error`].
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::item::test::{episode, metadata, storage};
    use crate::item::Mapper;

    const EPISODE: &str = r#"<article id="ep-{{.number}}" data-tags="{{.tags}}"><h2>{{.number}}. {{.title}}</h2><audio src="{{.audio_url}}"></audio>{{.description}}</article>"#;

    fn compile(text: &str) -> Template {
        let mut template = Template::default();
        template.parse(text).unwrap();
        template
    }

    fn fragments() -> PageTemplate {
        PageTemplate::Fragments {
            head: compile(r#"<html><head><meta name="description" content="{{.description}}"></head><body>"#),
            episode: compile(EPISODE),
            foot: compile("</body></html>"),
        }
    }

    fn single() -> PageTemplate {
        PageTemplate::Single(compile(&format!(
            "<h1>{{{{.title}}}}</h1>{{{{range .episodes}}}}{}{{{{end}}}}",
            EPISODE
        )))
    }

    fn render(page: &PageTemplate, titles: &[&str]) -> Result<String> {
        let (metadata, media) = (metadata(), storage());
        let site_url = Url::parse("https://example.org/").unwrap();
        let feed_url = site_url.join("rss.xml").unwrap();
        let image_url = site_url.join("img/logo.jpg").unwrap();
        let episodes: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| episode(title, &format!("p{}", i + 1), "2020-01-01"))
            .collect();
        let items = Mapper::new(&metadata, &media).map_all(&episodes).unwrap();
        page.render(
            &SiteContext {
                metadata: &metadata,
                site_url: &site_url,
                feed_url: &feed_url,
                image_url: &image_url,
            },
            &items,
        )
    }

    #[test]
    fn test_fragments_newest_first_with_original_numbers() -> Result<()> {
        let html = render(&fragments(), &["E1", "E2", "E3"])?;
        let e3 = html.find("<h2>3. E3</h2>").expect("E3");
        let e2 = html.find("<h2>2. E2</h2>").expect("E2");
        let e1 = html.find("<h2>1. E1</h2>").expect("E1");
        assert!(e3 < e2 && e2 < e1);
        assert!(html.starts_with("<html><head><meta name=\"description\" content=\"About T\"></head><body>\n"));
        assert!(html.ends_with("\n</body></html>"));
        Ok(())
    }

    #[test]
    fn test_single_newest_first_with_original_numbers() -> Result<()> {
        let html = render(&single(), &["E1", "E2"])?;
        assert!(html.starts_with("<h1>T</h1>"));
        let e2 = html.find("<h2>2. E2</h2>").expect("E2");
        let e1 = html.find("<h2>1. E1</h2>").expect("E1");
        assert!(e2 < e1);
        Ok(())
    }

    #[test]
    fn test_single_episode_block() -> Result<()> {
        let html = render(&fragments(), &["E1"])?;
        assert_eq!(1, html.matches("<article").count());
        assert!(html.contains(r#"id="ep-1""#));
        assert!(html.contains(
            r#"data-tags="E1,https://storage.example.org/v0/b/bucket/o/p1?alt=media,c""#
        ));
        assert!(html.contains("<p>About E1</p>"));
        Ok(())
    }

    #[test]
    fn test_placeholder_in_data_is_literal() -> Result<()> {
        let html = render(&fragments(), &["{{.audio_url}} & <b>"])?;
        assert!(html.contains("<h2>1. {{.audio_url}} &amp; &lt;b&gt;</h2>"));
        Ok(())
    }

    #[test]
    fn test_no_episodes() -> Result<()> {
        let html = render(&fragments(), &[])?;
        assert!(!html.contains("<article"));
        Ok(())
    }

    #[test]
    fn test_load_missing_template() {
        match PageTemplate::load(&PageSource::Template(PathBuf::from("./testdata/missing.html"))) {
            Err(Error::Open(err)) => assert_eq!("template", err.kind),
            Err(err) => panic!("wanted open error; found {}", err),
            Ok(_) => panic!("wanted open error; found a template"),
        }
    }

    #[test]
    fn test_relative_to() {
        let source = PageSource::Fragments {
            head: PathBuf::from("data/head.html"),
            episode: PathBuf::from("data/episode.html"),
            foot: PathBuf::from("data/foot.html"),
        };
        match source.relative_to(Path::new("/site")) {
            PageSource::Fragments { episode, .. } => {
                assert_eq!(PathBuf::from("/site/data/episode.html"), episode)
            }
            PageSource::Template(_) => panic!("wanted fragments"),
        }
    }
}
