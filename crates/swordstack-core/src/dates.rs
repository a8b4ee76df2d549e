//! Timestamp formatting for HTTP headers and Atom documents.

use chrono::{DateTime, NaiveDateTime, Utc};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an RFC 7231 HTTP-date (`Last-Modified`, `Date`).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use swordstack_core::dates::format_http_date;
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(format_http_date(&ts), "Tue, 02 Jan 2024 03:04:05 GMT");
/// ```
#[must_use]
pub fn format_http_date(ts: &DateTime<Utc>) -> String {
    ts.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP-date produced by [`format_http_date`].
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp for an Atom `updated` element (RFC 3339, second precision).
#[must_use]
pub fn format_atom_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
