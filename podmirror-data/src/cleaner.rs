// cleaner.rs
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

//! The retention workflow.
//!
//! Episodes older than the configured retention window are torn down in a
//! fixed order: watched rows first, then the episode row, then the audio
//! object. An episode row must never outlive its watched rows, and an
//! orphaned audio object is the least harmful leftover if a run dies
//! midway, it costs storage but breaks nothing.

use backoff::ExponentialBackoff;

use std::time::Duration;

use crate::config::Config;
use crate::errors::DataError;
use crate::models::EpisodeCleanerModel;
use crate::store::{DataStore, ObjectStore};
use crate::utils::{cutoff_date, filename_from_url};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanupSummary {
    /// Episodes past the retention window at the start of the run.
    pub found: usize,
    /// Episodes fully torn down by this run.
    pub cleaned: usize,
}

/// Run a full retention pass.
///
/// One stuck episode never aborts the run; its failure is logged and the
/// next episode is attempted. It stays in the store and the next scheduled
/// run picks it up again.
pub async fn cleanup(
    config: &Config,
    store: &dyn DataStore,
    objects: &dyn ObjectStore,
) -> Result<CleanupSummary, DataError> {
    let cutoff = cutoff_date(config.retention_days);
    let old = store.old_episodes(cutoff).await?;
    if old.is_empty() {
        info!("No episodes published before {}, nothing to clean", cutoff);
        return Ok(CleanupSummary {
            found: 0,
            cleaned: 0,
        });
    }

    let found = old.len();
    let mut cleaned = 0;
    for episode in &old {
        match clean_episode(config, store, objects, episode).await {
            Ok(()) => cleaned += 1,
            Err(err) => error!("Could not clean up episode {}: {}", episode.id(), err),
        }
    }

    info!("Cleanup finished, removed {} of {} old episodes", cleaned, found);
    Ok(CleanupSummary { found, cleaned })
}

async fn clean_episode(
    config: &Config,
    store: &dyn DataStore,
    objects: &dyn ObjectStore,
    episode: &EpisodeCleanerModel,
) -> Result<(), DataError> {
    store.delete_watched(episode.id()).await?;
    verify_watched_deleted(store, episode.id()).await?;
    store.delete_episode(episode.id()).await?;
    delete_audio(config, objects, episode).await?;
    debug!("Episode {} cleaned up", episode.id());
    Ok(())
}

/// Confirm the watched rows are really gone before the episode row falls.
///
/// The store offers no transactions and replicas may serve a slightly stale
/// read right after the delete, so a non-zero count is retried with backoff
/// for a few seconds before the episode is declared stuck.
async fn verify_watched_deleted(store: &dyn DataStore, episode_id: i64) -> Result<(), DataError> {
    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(100),
        max_elapsed_time: Some(Duration::from_secs(3)),
        ..ExponentialBackoff::default()
    };

    backoff::future::retry(policy, || async {
        match store.count_watched(episode_id).await {
            Ok(0) => Ok(()),
            Ok(n) => {
                debug!("{} watched rows still present for episode {}", n, episode_id);
                Err(backoff::Error::transient(DataError::NotSafeToDelete {
                    episode_id,
                }))
            }
            Err(err) => Err(backoff::Error::permanent(err)),
        }
    })
    .await
}

/// Drop the audio object and any local copy left from the ingest run.
///
/// An object that is already gone is only worth a warning, a previous run
/// may have died between the row delete and this point. A failed delete of
/// a present object is an error so the episode does not count as cleaned
/// and the leftover shows up in the summary.
async fn delete_audio(
    config: &Config,
    objects: &dyn ObjectStore,
    episode: &EpisodeCleanerModel,
) -> Result<(), DataError> {
    let filename = match filename_from_url(episode.mp3_link()) {
        Some(name) => name,
        None => {
            warn!(
                "No file name in '{}', leaving the object alone",
                episode.mp3_link()
            );
            return Ok(());
        }
    };
    let object_path = format!("{}/{}", config.bucket_folder, filename);

    if objects.exists(&object_path).await? {
        objects.delete(&object_path).await?;
    } else {
        warn!("Object '{}' was already gone", object_path);
    }

    let local = config.download_dir.join(&filename);
    if local.exists() {
        if let Err(err) = std::fs::remove_file(&local) {
            warn!("Could not remove local copy '{}': {}", local.display(), err);
        }
    }
    Ok(())
}
