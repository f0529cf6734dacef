//! Publication dates: parsing the dates written in the episode list and
//! formatting them for the feed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::Deserialize;
use std::fmt;

const RFC2822: &str = "%a, %d %b %Y %H:%M:%S %z";

/// How dates are written into the feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateStyle {
    /// RFC 2822, as RSS 2.0 requires (`Wed, 01 Jan 2020 00:00:00 +0000`).
    Rfc2822,

    /// Day, month name, and year (`1 January 2020`). Readers are lenient
    /// about this, but it doesn't validate.
    Legacy,
}

impl Default for DateStyle {
    fn default() -> Self {
        DateStyle::Rfc2822
    }
}

impl DateStyle {
    pub fn format(self, date: &DateTime<FixedOffset>) -> String {
        match self {
            DateStyle::Rfc2822 => date.format(RFC2822).to_string(),
            DateStyle::Legacy => date.format("%-d %B %Y").to_string(),
        }
    }
}

/// Parses a date from the episode list. Plain calendar dates (`2020-01-01`)
/// are taken as midnight UTC; full RFC 3339 timestamps keep their offset.
pub fn parse(input: &str) -> Result<DateTime<FixedOffset>, Error> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let naive = date.and_time(NaiveTime::from_hms(0, 0, 0));
        return Ok(FixedOffset::east(0).from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(input).map_err(|err| Error {
        input: input.to_owned(),
        err,
    })
}

/// Returned when a date can't be parsed.
#[derive(Debug)]
pub struct Error {
    pub input: String,
    pub err: chrono::ParseError,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid date `{}`: {}", self.input, self.err)
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
