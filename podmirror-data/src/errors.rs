// errors.rs
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

use thiserror::Error;

use std::io;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request to {url} returned {status}. Context: {context}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        context: String,
    },
    #[error("Failed to parse a url: {0}")]
    Url(#[from] url::ParseError),
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
    #[error("RSS Error: {0}")]
    Rss(#[from] rss::Error),
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Error occurred while parsing an episode. Reason: {reason}")]
    ParseEpisode { reason: String },
    #[error("No feed url was found on the landing page")]
    FeedNotDiscovered,
    #[error("Episode {episode_id} is not safe to delete, watched rows remain")]
    NotSafeToDelete { episode_id: i64 },
    #[error("Error: {0}")]
    Bail(String),
}

impl DataError {
    /// Shorthand for the item-skipping parse failures of the ingest path.
    pub(crate) fn parse_episode<S: Into<String>>(reason: S) -> Self {
        DataError::ParseEpisode {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Reqwest error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Io error: {0}")]
    Io(#[from] io::Error),
    #[error("Unexpected server response: {0}")]
    UnexpectedResponse(reqwest::StatusCode),
    #[error("Url does not point to an mp3 file: {0}")]
    NotAnMp3(String),
    #[error("Could not derive a file name from: {0}")]
    NoFileName(String),
    #[error("Audio probe error: {0}")]
    AudioProbe(#[from] symphonia::core::errors::Error),
}
