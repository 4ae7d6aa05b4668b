//! Date-range extraction over dated remote file listings.
//!
//! Every listed path is expected to embed one ISO `YYYY-MM-DD` date. A
//! requested window must lie inside the span of dates the listing actually
//! covers; the paths whose date falls inside the window (both ends
//! inclusive) are returned in listing order.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use comma_core::errors::{CommaError, ErrorInfo};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Format of embedded and requested dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn embedded_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("embedded date regex must compile"))
}

/// Closed interval of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    /// Builds a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CommaError> {
        if start > end {
            return Err(CommaError::Range(
                ErrorInfo::new(
                    "comma_data.window_inverted",
                    format!("time_period ({start} - {end}) ends before it starts"),
                )
                .with_context("start", start.to_string())
                .with_context("end", end.to_string()),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parses a `(start, end)` pair of `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, CommaError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// True when `date` lies inside the window, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when `other` lies entirely inside this window.
    pub fn covers(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, CommaError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|err| {
        CommaError::Range(
            ErrorInfo::new(
                "comma_data.date_parse",
                format!("'{text}' is not a {DATE_FORMAT} date"),
            )
            .with_hint(err.to_string()),
        )
    })
}

/// The first `YYYY-MM-DD` substring of `path`, if it is a real calendar date.
pub fn embedded_date(path: &str) -> Option<NaiveDate> {
    let matched = embedded_date_re().find(path)?;
    match NaiveDate::parse_from_str(matched.as_str(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(path, date = matched.as_str(), %err, "ignoring invalid embedded date");
            None
        }
    }
}

/// Span of dates covered by `paths`. Paths without a date are skipped.
pub fn available_window<S: AsRef<str>>(paths: &[S]) -> Result<TimeWindow, CommaError> {
    let mut dates = paths.iter().filter_map(|path| embedded_date(path.as_ref()));
    let Some(first) = dates.next() else {
        return Err(CommaError::Range(
            ErrorInfo::new(
                "comma_data.no_dates",
                "no embedded dates could be parsed from the file listing",
            )
            .with_context("paths", paths.len().to_string()),
        ));
    };
    let (min, max) = dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    });
    Ok(TimeWindow { start: min, end: max })
}

/// Paths whose embedded date lies inside `window`, in listing order.
///
/// Fails with a range error when the listing has no dates or when `window`
/// reaches outside the listing's span. Paths without a date never appear in
/// the result.
pub fn filter_in_window<S: AsRef<str>>(
    paths: &[S],
    window: &TimeWindow,
) -> Result<Vec<String>, CommaError> {
    let available = available_window(paths)?;
    if !available.covers(window) {
        return Err(CommaError::Range(
            ErrorInfo::new(
                "comma_data.window_outside",
                format!(
                    "time_period ({window}) is outside available dates that go from ({} to {})",
                    available.start, available.end
                ),
            )
            .with_context("requested", window.to_string())
            .with_context("available", available.to_string()),
        ));
    }
    let selected: Vec<String> = paths
        .iter()
        .filter_map(|path| {
            let path: &str = path.as_ref();
            let date = embedded_date(path)?;
            window.contains(date).then(|| path.to_string())
        })
        .collect();
    debug!(listed = paths.len(), selected = selected.len(), %window, "filtered listing");
    Ok(selected)
}

/// [`filter_in_window`] for a window given as `YYYY-MM-DD` strings.
pub fn filter_dates<S: AsRef<str>>(
    paths: &[S],
    start: &str,
    end: &str,
) -> Result<Vec<String>, CommaError> {
    let window = TimeWindow::parse(start, end)?;
    filter_in_window(paths, &window)
}
