//! Timestamp parsing and formatting for titles.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Outcome of reading an ISO-8601 timestamp in a target zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimestamp {
    At(DateTime<Tz>),
    /// Well-formed, but skipped by a daylight-saving transition.
    Nonexistent,
    Invalid,
}

/// ISO-8601 forms RFC 3339 rejects: basic (`+0000`) or hour-only (`-05`)
/// offsets, and times without seconds.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

const FLOATING_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse `raw` into `zone`.
///
/// Timestamps carrying an offset are converted. Floating timestamps (no
/// offset, as Socrata emits them) are read as wall-clock time in `zone`.
pub fn parse_in_zone(raw: &str, zone: Tz) -> LocalTimestamp {
    let raw = raw.trim();
    let with_offset = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    });
    if let Some(dt) = with_offset {
        return LocalTimestamp::At(dt.with_timezone(&zone));
    }

    let naive = FLOATING_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok());
    match naive {
        Some(naive) => match zone.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => LocalTimestamp::At(dt),
            LocalResult::None => LocalTimestamp::Nonexistent,
        },
        None => LocalTimestamp::Invalid,
    }
}

/// `MM/DD  HH:MM AM` with two spaces before the time.
pub fn format_for_title(dt: &DateTime<Tz>) -> String {
    dt.format("%m/%d  %I:%M %p").to_string()
}
