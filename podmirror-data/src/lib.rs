// lib.rs
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

//! Core library of the podmirror worker.
//!
//! Two entry points, one per batch job: [`pipeline::ingest`] mirrors new
//! episodes out of an RSS feed into the object store and the episode table,
//! and [`cleaner::cleanup`] purges episodes that outlived the retention
//! window. Both talk to the external stores through the traits in [`store`].

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod cleaner;
pub mod config;
pub mod downloader;
#[allow(missing_docs)]
pub mod errors;
pub mod feed;
pub(crate) mod models;
pub mod parser;
pub mod pipeline;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use models::{Episode, EpisodeCleanerModel, NewEpisode, WatchedEpisode};

/// The user-agent used for all requests.
///
/// Some feed hosts refuse requests that don't look like they come from a
/// browser.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 podmirror/0.1";
