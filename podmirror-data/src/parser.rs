// parser.rs
//
// Copyright 2025 podmirror contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Small parsers for the fields a feed item carries.

use chrono::NaiveDate;
use rfc822_sanitizer::parse_from_rfc2822_with_fallback as parse_rfc822;

use crate::errors::DataError;

/// Validate a feed-declared duration against the strict `HH:MM:SS` shape,
/// hours 00-23, minutes and seconds 00-59.
///
/// Items declaring anything else (`25:00:00`, `12:60:00`, `1:2:3`, plain
/// seconds) are skipped by the ingest job.
pub fn validate_duration_format(duration: &str) -> bool {
    let fields: Vec<&str> = duration.split(':').collect();
    if fields.len() != 3 {
        return false;
    }

    if fields
        .iter()
        .any(|f| f.len() != 2 || !f.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    let hours: u32 = fields[0].parse().unwrap_or(99);
    let minutes: u32 = fields[1].parse().unwrap_or(99);
    let seconds: u32 = fields[2].parse().unwrap_or(99);

    hours <= 23 && minutes <= 59 && seconds <= 59
}

/// Convert a validated `HH:MM:SS` duration into total seconds.
pub fn convert_in_seconds(duration: &str) -> Result<i64, DataError> {
    if !validate_duration_format(duration) {
        return Err(DataError::parse_episode(format!(
            "Invalid duration format: {}. Expected HH:MM:SS",
            duration
        )));
    }

    let fields: Vec<i64> = duration.split(':').map(|f| f.parse().unwrap_or(0)).collect();
    Ok(fields[0] * 3600 + fields[1] * 60 + fields[2])
}

/// Normalize an RSS `pubDate` to a plain date.
///
/// Feeds are sloppy about rfc2822, so go through the sanitizer fallback the
/// same way the episode epoch parsing always has.
pub fn parse_pub_date(pub_date: &str) -> Option<NaiveDate> {
    parse_rfc822(pub_date.trim()).ok().map(|d| d.date_naive())
}

/// Truncate an item description at its first paragraph or line break.
///
/// Descriptions come in as either plain text or loose html, take the first
/// non-empty `<p>` chunk, then the first line of it.
pub fn first_paragraph(description: &str) -> String {
    let chunk = description
        .split("<p>")
        .map(|s| s.split("</p>").next().unwrap_or(""))
        .find(|s| !s.trim().is_empty())
        .unwrap_or("");

    chunk.lines().next().unwrap_or("").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_validate_duration_format() {
        assert!(validate_duration_format("00:00:00"));
        assert!(validate_duration_format("01:02:03"));
        assert!(validate_duration_format("23:59:59"));

        assert!(!validate_duration_format("24:00:00"));
        assert!(!validate_duration_format("25:00:00"));
        assert!(!validate_duration_format("12:60:00"));
        assert!(!validate_duration_format("12:00:60"));
        assert!(!validate_duration_format("1:2:3"));
        assert!(!validate_duration_format("1:02:03"));
        assert!(!validate_duration_format("01:02"));
        assert!(!validate_duration_format("3370"));
        assert!(!validate_duration_format(""));
        assert!(!validate_duration_format("aa:bb:cc"));
    }

    #[test]
    fn test_convert_in_seconds() -> Result<()> {
        assert_eq!(convert_in_seconds("01:02:03")?, 3723);
        assert_eq!(convert_in_seconds("00:00:00")?, 0);
        assert_eq!(convert_in_seconds("23:59:59")?, 86399);

        assert!(convert_in_seconds("1:2:3").is_err());
        assert!(convert_in_seconds("25:00:00").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_pub_date() {
        assert_eq!(
            parse_pub_date("Tue, 05 Aug 2025 04:00:00 GMT"),
            NaiveDate::from_ymd_opt(2025, 8, 5)
        );
        // Sloppy feeds, wrong weekday included.
        assert_eq!(
            parse_pub_date("Thu, 05 Aug 2016 06:00:00 -0400"),
            NaiveDate::from_ymd_opt(2016, 8, 5)
        );
        assert_eq!(parse_pub_date("not a date"), None);
    }

    #[test]
    fn test_first_paragraph() {
        assert_eq!(first_paragraph("plain text"), "plain text");
        assert_eq!(first_paragraph("first line\nsecond line"), "first line");
        assert_eq!(
            first_paragraph("Intro line.<p>More detail.</p>"),
            "Intro line."
        );
        assert_eq!(
            first_paragraph("<p>Leading paragraph.</p><p>Second.</p>"),
            "Leading paragraph."
        );
        assert_eq!(first_paragraph(""), "");
    }
}
