// new_episode.rs
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

use chrono::NaiveDate;
use rss;
use serde::Serialize;

use crate::errors::DataError;
use crate::parser;
use crate::utils::{filename_from_url, url_cleaner};

/// The insertable form of an episode row.
///
/// Parsed straight from an `rss::Item`; `duration` starts out as the
/// feed-declared value in seconds and is overwritten once the downloaded
/// file has been probed, `mp3_link` is set once the upload yields a public
/// url.
#[derive(Debug, Clone, Default, Builder, PartialEq, Serialize)]
#[builder(default)]
#[builder(derive(Debug))]
#[builder(setter(into))]
pub struct NewEpisode {
    title: String,
    description: String,
    publication_date: NaiveDate,
    duration: i64,
    original_mp3_link: String,
    mp3_link: String,
}

impl NewEpisode {
    /// Parses an `rss::Item` into a `NewEpisode` Struct.
    ///
    /// Data-shape failures (missing fields, malformed declared duration,
    /// an enclosure that isn't an mp3) come back as
    /// [`DataError::ParseEpisode`] and make the caller skip the item.
    pub fn new(item: &rss::Item) -> Result<Self, DataError> {
        let title = item
            .title()
            .ok_or_else(|| DataError::parse_episode("No title specified for this episode."))?
            .trim()
            .to_owned();

        let declared = item
            .itunes_ext()
            .and_then(|ext| ext.duration())
            .ok_or_else(|| DataError::parse_episode("No duration declared for this episode."))?;
        // Also rejects the malformed shapes (`1:2:3`, `25:00:00`, plain
        // seconds) the feed occasionally throws at us.
        let duration = parser::convert_in_seconds(declared.trim())?;

        let pub_date = item
            .pub_date()
            .ok_or_else(|| DataError::parse_episode("No pubDate specified for this episode."))?;
        let publication_date = parser::parse_pub_date(pub_date).ok_or_else(|| {
            DataError::parse_episode(format!("Could not parse pubDate '{}'.", pub_date))
        })?;

        let description = item
            .description()
            .map(parser::first_paragraph)
            .ok_or_else(|| DataError::parse_episode("No description for this episode."))?;

        let enclosure = item
            .enclosure()
            .ok_or_else(|| DataError::parse_episode("No enclosure specified for the item."))?;
        let original_mp3_link = url_cleaner(enclosure.url().trim());
        if !original_mp3_link.ends_with(".mp3") {
            return Err(DataError::parse_episode(format!(
                "Not an mp3 url: {}",
                original_mp3_link
            )));
        }

        NewEpisodeBuilder::default()
            .title(title)
            .description(description)
            .publication_date(publication_date)
            .duration(duration)
            .original_mp3_link(original_mp3_link)
            .build()
            .map_err(|err| DataError::Bail(err.to_string()))
    }

    /// Local and in-bucket file name, the final path segment of the
    /// query-stripped source url.
    pub fn filename(&self) -> Option<String> {
        filename_from_url(&self.original_mp3_link)
    }

    /// Overwrite the feed-declared duration with the measured one.
    pub fn set_duration(&mut self, seconds: i64) {
        self.duration = seconds;
    }

    pub fn set_mp3_link<S: Into<String>>(&mut self, url: S) {
        self.mp3_link = url.into();
    }
}

impl NewEpisode {
    pub fn title(&self) -> &str {
        self.title.as_ref()
    }

    pub fn description(&self) -> &str {
        self.description.as_ref()
    }

    pub fn publication_date(&self) -> NaiveDate {
        self.publication_date
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn original_mp3_link(&self) -> &str {
        self.original_mp3_link.as_ref()
    }

    pub fn mp3_link(&self) -> &str {
        self.mp3_link.as_ref()
    }
}
