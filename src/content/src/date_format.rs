// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The date formats used on the wire.
//!
//! Entity fields use ISO-8601 date-times with a `+hh:mm` offset. Response
//! headers, such as `Date` and `Expiration`, use the RFC 2822 form.

use chrono::{DateTime, FixedOffset};

/// The format for dates in JSON payloads and query parameters.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Parses a date-time in JSON payloads.
///
/// Accepts the `+hh:mm`, `+hhmm`, and `Z` offset forms, with optional
/// fractional seconds.
///
/// # Example
/// ```
/// # use cloud_content::date_format::{format, parse};
/// let date = parse("2012-12-12T10:53:43-08:00").unwrap();
/// assert_eq!(format(&date), "2012-12-12T10:53:43-08:00");
/// ```
pub fn parse(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Formats a date-time for JSON payloads and query parameters.
pub fn format(value: &DateTime<FixedOffset>) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Parses a date in response headers, e.g. `Fri, 06 Mar 2015 11:17:57 GMT`.
pub fn parse_header_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(value.trim()).ok()
}

/// Formats a date range as used by the search filters: `from,to`.
///
/// Either end may be open. Returns `None` if both are.
pub fn format_range(
    from: Option<&DateTime<FixedOffset>>,
    to: Option<&DateTime<FixedOffset>>,
) -> Option<String> {
    if from.is_none() && to.is_none() {
        return None;
    }
    Some(format!(
        "{},{}",
        from.map(format).unwrap_or_default(),
        to.map(format).unwrap_or_default()
    ))
}

/// Parses a date range in the `from,to` form.
///
/// Ends that fail to parse are `None`.
pub fn parse_range(
    value: &str,
) -> Option<(Option<DateTime<FixedOffset>>, Option<DateTime<FixedOffset>>)> {
    if value.is_empty() {
        return None;
    }
    let mut split = value.splitn(2, ',');
    let from = split.next().and_then(parse);
    let to = split.next().and_then(parse);
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("2012-12-12T10:53:43-08:00", "2012-12-12T10:53:43-08:00")]
    #[test_case("2012-12-12T10:53:43-0800", "2012-12-12T10:53:43-08:00")]
    #[test_case("2012-12-12T18:53:43Z", "2012-12-12T18:53:43+00:00")]
    #[test_case("2012-12-12T18:53:43.250Z", "2012-12-12T18:53:43+00:00")]
    fn parse_and_format(input: &str, want: &str) {
        let got = parse(input).unwrap_or_else(|| panic!("cannot parse {input}"));
        assert_eq!(format(&got), want);
    }

    #[test_case("")]
    #[test_case("yesterday")]
    #[test_case("2012-12-12")]
    fn parse_failures(input: &str) {
        assert_eq!(parse(input), None);
    }

    #[test]
    fn header_date() {
        let got = parse_header_date("Fri, 06 Mar 2015 11:17:57 GMT").expect("valid header date");
        assert_eq!(format(&got), "2015-03-06T11:17:57+00:00");
        assert_eq!(parse_header_date("not a date"), None);
    }

    #[test]
    fn ranges() {
        let from = parse("2014-05-01T00:00:00-07:00");
        let to = parse("2014-06-01T00:00:00-07:00");
        assert_eq!(format_range(None, None), None);
        assert_eq!(
            format_range(from.as_ref(), None).as_deref(),
            Some("2014-05-01T00:00:00-07:00,")
        );
        let both = format_range(from.as_ref(), to.as_ref()).expect("non-empty range");
        assert_eq!(both, "2014-05-01T00:00:00-07:00,2014-06-01T00:00:00-07:00");
        assert_eq!(parse_range(&both), Some((from, to)));
        assert_eq!(parse_range(",2014-06-01T00:00:00-07:00"), Some((None, to)));
        assert_eq!(parse_range(""), None);
    }
}
