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

//! Parse the `Retry-After` header.

use http::HeaderMap;
use std::time::Duration;

/// The name of the header used by the service to request a delay.
pub const RETRY_AFTER: &str = "retry-after";

/// Returns the delay requested by the service, if any.
///
/// The service sends the delay as a number of whole seconds. Values that are
/// zero or negative are treated as one second. Returns `None` if the header is
/// missing or cannot be parsed, the caller should use its default delay in
/// that case.
///
/// # Example
/// ```
/// # use cloud_content_gax::retry_after::retry_after;
/// # use std::time::Duration;
/// let mut headers = http::HeaderMap::new();
/// headers.insert("retry-after", http::HeaderValue::from_static("2"));
/// assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));
/// ```
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds = value.trim().parse::<i64>().ok()?;
    Some(Duration::from_secs(seconds.max(1) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use test_case::test_case;

    #[test_case("2", Some(2))]
    #[test_case(" 30 ", Some(30))]
    #[test_case("0", Some(1))]
    #[test_case("-5", Some(1))]
    #[test_case("soon", None)]
    #[test_case("1.5", None)]
    #[test_case("Fri, 06 Mar 2015 11:17:57 GMT", None)]
    fn parse(input: &'static str, want: Option<u64>) {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(input));
        assert_eq!(retry_after(&headers), want.map(Duration::from_secs));
    }

    #[test]
    fn missing() {
        assert_eq!(retry_after(&HeaderMap::new()), None);
    }
}
