// mod.rs
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

//! Clients for the two external stores.
//!
//! Both stores are remote services consumed over their REST surfaces; the
//! traits here are the seam the workflows are written against, so tests can
//! run them against in-memory fakes.

mod object;
mod rest;

pub use self::object::BucketStore;
pub use self::rest::RestStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use std::path::Path;

use crate::errors::DataError;
use crate::models::{Episode, EpisodeCleanerModel, NewEpisode};

/// Table-scoped access to the hosted relational store.
///
/// The store offers no transactions; every operation is a single remote
/// call and the workflows layer their own ordering and verification on top.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Whether an episode with this publication date is already recorded.
    async fn episode_exists_by_date(&self, date: NaiveDate) -> Result<bool, DataError>;

    /// Whether an episode with this original source url is already recorded.
    async fn episode_exists_by_url(&self, original_url: &str) -> Result<bool, DataError>;

    /// Insert an episode row and return it as the store recorded it.
    async fn insert_episode(&self, episode: &NewEpisode) -> Result<Episode, DataError>;

    /// All episodes with `publication_date` strictly before `cutoff`,
    /// projected down to what the cleaner needs.
    async fn old_episodes(&self, cutoff: NaiveDate) -> Result<Vec<EpisodeCleanerModel>, DataError>;

    /// Number of watched rows still pointing at the episode.
    async fn count_watched(&self, episode_id: i64) -> Result<usize, DataError>;

    /// Delete all watched rows pointing at the episode.
    async fn delete_watched(&self, episode_id: i64) -> Result<(), DataError>;

    /// Delete the episode row itself.
    async fn delete_episode(&self, episode_id: i64) -> Result<(), DataError>;
}

/// Bucket-scoped blob access to the object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file to `object_path` inside the bucket.
    async fn upload(&self, local_path: &Path, object_path: &str) -> Result<(), DataError>;

    /// Whether an object exists at `object_path`.
    async fn exists(&self, object_path: &str) -> Result<bool, DataError>;

    /// Delete the object at `object_path`.
    async fn delete(&self, object_path: &str) -> Result<(), DataError>;

    /// Public url under which the object is served.
    fn public_url(&self, object_path: &str) -> String;
}
