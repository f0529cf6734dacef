use clap::App;
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};
use podsite::build::build_site;
use podsite::config::Config;
use std::error::Error;
use std::path::Path;
use std::process;

fn main() {
    App::new("podsite")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Builds a podcast's RSS feed and index page from the `podcast.yaml` \
             project in the current directory or the nearest parent directory",
        )
        .get_matches();

    let _logger = match init_log() {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("initializing logger: {}", e);
            process::exit(1);
        }
    };

    let result = std::env::current_dir()
        .map_err(Box::<dyn Error>::from)
        .and_then(|dir| run(&dir));
    process::exit(exit_code(&result));
}

fn run(dir: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::from_directory(dir)?;
    build_site(&config)?;
    Ok(())
}

/// Logs the outcome of a build and returns the process exit code for it.
fn exit_code(result: &Result<(), Box<dyn Error>>) -> i32 {
    match result {
        Ok(()) => {
            log::info!("site built");
            0
        }
        Err(e) => {
            log::error!("unable to build site: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                log::debug!("caused by: {}", cause);
                source = cause.source();
            }
            1
        }
    }
}

fn init_log() -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_str("info")?.start()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    /// Lays out a one-episode project whose output directory is `output`.
    fn project(output: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(
            root.join("podcast.yaml"),
            format!(
                "site_url: https://example.org
output_directory: {}
media:
  host: web
  base_url: https://example.org/audio
page:
  template: index.html
",
                output
            ),
        )
        .unwrap();
        fs::write(
            root.join("data/meta.json"),
            r#"{"title": "T", "description": "D", "author": "A"}"#,
        )
        .unwrap();
        fs::write(
            root.join("data/episodes.json"),
            r#"[{"title": "E1", "description": "d", "storagePath": "p1", "date": "2020-01-01"}]"#,
        )
        .unwrap();
        fs::write(
            root.join("index.html"),
            "{{range .episodes}}<p>{{.number}}</p>{{end}}",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_exit_code_success() {
        let dir = project("public");
        assert_eq!(0, exit_code(&run(dir.path())));
        assert!(dir.path().join("public/rss.xml").is_file());
        assert!(dir.path().join("public/index.html").is_file());
    }

    #[test]
    fn test_exit_code_unwritable_output() {
        let dir = project("blocker");
        // A regular file where the output directory should be.
        fs::write(dir.path().join("blocker"), "").unwrap();
        let result = run(dir.path());
        let message = result.as_ref().unwrap_err().to_string();
        assert!(message.contains("blocker"), "{}", message);
        assert_eq!(1, exit_code(&result));
    }

    #[test]
    fn test_exit_code_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        // Assumes no `podcast.yaml` above the system temp directory.
        assert_eq!(1, exit_code(&run(dir.path())));
    }
}
