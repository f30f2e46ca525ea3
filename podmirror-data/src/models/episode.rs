// episode.rs
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
use serde::Deserialize;

/// An episode row as the relational store returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Episode {
    id: i64,
    title: String,
    description: String,
    publication_date: NaiveDate,
    duration: i64,
    original_mp3_link: String,
    mp3_link: String,
}

impl Episode {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn publication_date(&self) -> NaiveDate {
        self.publication_date
    }

    /// Duration in seconds.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn original_mp3_link(&self) -> &str {
        &self.original_mp3_link
    }

    /// Public url of the re-hosted copy.
    pub fn mp3_link(&self) -> &str {
        &self.mp3_link
    }
}

#[cfg(test)]
impl Episode {
    pub(crate) fn from_new(new: &super::NewEpisode, id: i64) -> Self {
        Episode {
            id,
            title: new.title().to_owned(),
            description: new.description().to_owned(),
            publication_date: new.publication_date(),
            duration: new.duration(),
            original_mp3_link: new.original_mp3_link().to_owned(),
            mp3_link: new.mp3_link().to_owned(),
        }
    }
}

/// The narrow projection the cleaner asks the store for, it never needs the
/// full row to decide what to delete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpisodeCleanerModel {
    id: i64,
    mp3_link: String,
}

impl EpisodeCleanerModel {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn mp3_link(&self) -> &str {
        &self.mp3_link
    }
}

#[cfg(test)]
impl EpisodeCleanerModel {
    pub(crate) fn new(id: i64, mp3_link: &str) -> Self {
        EpisodeCleanerModel {
            id,
            mp3_link: mp3_link.to_owned(),
        }
    }
}
