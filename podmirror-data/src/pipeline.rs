// pipeline.rs
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

//! The ingest workflow.
//!
//! Walks the feed newest-first and mirrors episodes that are not recorded
//! yet: download, measure, upload, insert. Per-item failures skip the item;
//! a store failure aborts the run, without the store there is no way to
//! tell what has already been mirrored.

use rss::Channel;

use crate::config::Config;
use crate::downloader;
use crate::errors::DownloadError;
use crate::feed;
use crate::models::{Episode, NewEpisode};
use crate::store::{DataStore, ObjectStore};

/// Run a full ingest pass and return the episodes that were recorded.
pub async fn ingest(
    config: &Config,
    store: &dyn DataStore,
    objects: &dyn ObjectStore,
) -> Result<Vec<Episode>, DownloadError> {
    let client = downloader::client_builder().build()?;
    let feed_url = feed::discover_feed_url(&client, &config.feed_source_url).await?;
    let channel = feed::fetch_feed(&client, &feed_url).await?;
    ingest_channel(&client, &channel, config, store, objects).await
}

/// Mirror the items of an already fetched feed.
///
/// At most `max_episodes` items are considered per run. Items that are
/// already recorded count against the cap, they are the common case on a
/// daily schedule and bound how deep a run looks into the feed. Items that
/// fail to parse or download do not count, a transient cdn hiccup should
/// not eat the budget of the items behind it.
pub async fn ingest_channel(
    client: &reqwest::Client,
    channel: &Channel,
    config: &Config,
    store: &dyn DataStore,
    objects: &dyn ObjectStore,
) -> Result<Vec<Episode>, DownloadError> {
    let mut recorded = Vec::new();
    let mut considered = 0;

    for item in channel.items() {
        if considered >= config.max_episodes {
            break;
        }

        let mut episode = match NewEpisode::new(item) {
            Ok(ep) => ep,
            Err(err) => {
                warn!("Skipping a feed item: {}", err);
                continue;
            }
        };

        if store
            .episode_exists_by_date(episode.publication_date())
            .await?
            || store.episode_exists_by_url(episode.original_mp3_link()).await?
        {
            info!("'{}' is already recorded, skipping", episode.title());
            considered += 1;
            continue;
        }

        let path = match downloader::download_audio(
            client,
            episode.original_mp3_link(),
            &config.download_dir,
        )
        .await
        {
            Ok(path) => path,
            Err(err) => {
                warn!("Could not download '{}': {}", episode.title(), err);
                continue;
            }
        };

        match downloader::probe_duration(&path) {
            Ok(Some(seconds)) => episode.set_duration(seconds),
            Ok(None) => warn!(
                "No measurable duration in '{}', keeping the declared {}s",
                path.display(),
                episode.duration()
            ),
            Err(err) => warn!(
                "Could not probe '{}' ({}), keeping the declared {}s",
                path.display(),
                err,
                episode.duration()
            ),
        }

        let filename = match episode.filename() {
            Some(name) => name,
            None => {
                warn!(
                    "No file name in '{}', skipping",
                    episode.original_mp3_link()
                );
                continue;
            }
        };
        let object_path = format!("{}/{}", config.bucket_folder, filename);

        if let Err(err) = objects.upload(&path, &object_path).await {
            error!("Could not upload '{}': {}", episode.title(), err);
            considered += 1;
            continue;
        }
        episode.set_mp3_link(objects.public_url(&object_path));

        // A concurrent run may have recorded the same date while this one
        // was downloading. The window between this check and the insert is
        // accepted; duplicate rows are cheaper than a locking scheme the
        // store does not offer.
        if store
            .episode_exists_by_date(episode.publication_date())
            .await?
        {
            info!(
                "'{}' appeared in the store mid-run, skipping insert",
                episode.title()
            );
            considered += 1;
            continue;
        }

        let row = store.insert_episode(&episode).await?;
        info!(
            "Recorded '{}' ({}, {}s)",
            row.title(),
            row.publication_date(),
            row.duration()
        );
        recorded.push(row);
        considered += 1;
    }

    info!(
        "Ingest finished, {} new episodes out of {} considered",
        recorded.len(),
        considered
    );
    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fakes;
    use anyhow::Result;
    use chrono::NaiveDate;

    use std::fs::File;
    use std::io::BufReader;

    const FEED: &str = "tests/feeds/2025-08-12-TheMorningShow.xml";

    fn feed_channel() -> Result<Channel> {
        let file = File::open(FEED)?;
        Ok(Channel::read_from(BufReader::new(file))?)
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() -> Result<()> {
        let channel = feed_channel()?;
        let (store, objects, events) = fakes();
        let config = Config::default();
        let client = downloader::client_builder().build()?;

        // Both parseable items are already recorded.
        for item in &channel.items()[..2] {
            store.seed_episode(&NewEpisode::new(item)?);
        }

        let recorded = ingest_channel(&client, &channel, &config, &store, &objects).await?;
        assert!(recorded.is_empty());
        // Skips never touch the stores.
        assert!(events.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_skips_unparseable_items() -> Result<()> {
        let mut channel = feed_channel()?;
        // Only the malformed tail of the fixture: bad duration, wrong
        // codec, missing enclosure.
        let items = channel.items()[2..].to_vec();
        channel.set_items(items);

        let (store, objects, events) = fakes();
        let config = Config::default();
        let client = downloader::client_builder().build()?;

        let recorded = ingest_channel(&client, &channel, &config, &store, &objects).await?;
        assert!(recorded.is_empty());
        assert!(events.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_recorded_items_count_against_the_cap() -> Result<()> {
        let channel = feed_channel()?;
        let (store, objects, events) = fakes();
        let mut config = Config::default();
        config.max_episodes = 1;
        let client = downloader::client_builder().build()?;

        store.seed_episode(&NewEpisode::new(&channel.items()[0])?);

        // The single slot goes to the already-recorded first item, the
        // second item is never looked at (its host does not resolve, an
        // attempt would surface as a download skip, not an insert).
        let recorded = ingest_channel(&client, &channel, &config, &store, &objects).await?;
        assert!(recorded.is_empty());
        assert!(events.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_upload_counts_but_inserts_nothing() -> Result<()> {
        let channel = feed_channel()?;
        let (store, objects, events) = fakes();
        let dir = tempfile::tempdir()?;
        // Pre-seeded local copies make the download a no-op.
        std::fs::write(dir.path().join("ep-one.mp3"), b"audio")?;
        std::fs::write(dir.path().join("ep-two.mp3"), b"audio")?;

        let mut config = Config::default();
        config.download_dir = dir.path().to_path_buf();
        config.max_episodes = 1;
        objects.make_uploads_fail();
        let client = downloader::client_builder().build()?;

        let recorded = ingest_channel(&client, &channel, &config, &store, &objects).await?;
        assert!(recorded.is_empty());
        assert!(store.episode_ids().is_empty());
        // The failed item consumed the single slot, the second item was
        // never attempted.
        assert_eq!(
            *events.lock().unwrap(),
            vec!["upload_failed:mp3/ep-one.mp3".to_owned()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_date_appearing_mid_run_skips_the_insert() -> Result<()> {
        let channel = feed_channel()?;
        let (store, objects, events) = fakes();
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("ep-one.mp3"), b"audio")?;

        let mut config = Config::default();
        config.download_dir = dir.path().to_path_buf();
        config.max_episodes = 1;
        // Absent at the first check, present at the re-check before the
        // insert, as if another run recorded it in between.
        store.make_date_appear_late(NaiveDate::from_ymd_opt(2025, 8, 5).unwrap());
        let client = downloader::client_builder().build()?;

        let recorded = ingest_channel(&client, &channel, &config, &store, &objects).await?;
        assert!(recorded.is_empty());
        assert!(store.episode_ids().is_empty());
        // The upload went through, the insert did not.
        assert_eq!(
            *events.lock().unwrap(),
            vec!["upload:mp3/ep-one.mp3".to_owned()]
        );
        Ok(())
    }
}
