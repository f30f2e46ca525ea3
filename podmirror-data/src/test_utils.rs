// test_utils.rs
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

//! In-memory store fakes for the workflow tests.
//!
//! Both fakes append every mutating call to a shared event log so tests can
//! assert call ordering, not only end state.

use async_trait::async_trait;
use chrono::NaiveDate;

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::DataError;
use crate::models::{Episode, EpisodeCleanerModel, NewEpisode, NewEpisodeBuilder, WatchedEpisode};
use crate::store::{DataStore, ObjectStore};

pub(crate) type EventLog = Arc<Mutex<Vec<String>>>;

pub(crate) struct MemDataStore {
    episodes: Mutex<Vec<Episode>>,
    watched: Mutex<Vec<WatchedEpisode>>,
    next_id: AtomicI64,
    // When set, delete_watched returns Ok but leaves the rows in place.
    sticky_watched: AtomicBool,
    // A date reported absent on its first existence check and present on
    // every later one, standing in for a concurrent run inserting the same
    // episode mid-flight.
    appearing_date: Mutex<Option<(NaiveDate, bool)>>,
    events: EventLog,
}

impl MemDataStore {
    pub(crate) fn new(events: EventLog) -> Self {
        MemDataStore {
            episodes: Mutex::new(Vec::new()),
            watched: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            sticky_watched: AtomicBool::new(false),
            appearing_date: Mutex::new(None),
            events,
        }
    }

    pub(crate) fn seed_episode(&self, new: &NewEpisode) -> Episode {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let episode = Episode::from_new(new, id);
        self.episodes.lock().unwrap().push(episode.clone());
        episode
    }

    pub(crate) fn seed_watched(&self, episode_id: i64) {
        let mut watched = self.watched.lock().unwrap();
        let id = watched.len() as i64 + 1;
        watched.push(WatchedEpisode::new(id, episode_id));
    }

    pub(crate) fn make_watched_sticky(&self) {
        self.sticky_watched.store(true, Ordering::SeqCst);
    }

    pub(crate) fn make_date_appear_late(&self, date: NaiveDate) {
        *self.appearing_date.lock().unwrap() = Some((date, false));
    }

    pub(crate) fn episode_ids(&self) -> Vec<i64> {
        self.episodes.lock().unwrap().iter().map(Episode::id).collect()
    }
}

#[async_trait]
impl DataStore for MemDataStore {
    async fn episode_exists_by_date(&self, date: NaiveDate) -> Result<bool, DataError> {
        let mut appearing = self.appearing_date.lock().unwrap();
        if let Some((late_date, seen)) = appearing.as_mut() {
            if *late_date == date {
                let present = *seen;
                *seen = true;
                return Ok(present);
            }
        }

        let episodes = self.episodes.lock().unwrap();
        Ok(episodes.iter().any(|ep| ep.publication_date() == date))
    }

    async fn episode_exists_by_url(&self, original_url: &str) -> Result<bool, DataError> {
        let episodes = self.episodes.lock().unwrap();
        Ok(episodes.iter().any(|ep| ep.original_mp3_link() == original_url))
    }

    async fn insert_episode(&self, episode: &NewEpisode) -> Result<Episode, DataError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = Episode::from_new(episode, id);
        self.episodes.lock().unwrap().push(row.clone());
        self.events.lock().unwrap().push(format!("insert:{}", id));
        Ok(row)
    }

    async fn old_episodes(&self, cutoff: NaiveDate) -> Result<Vec<EpisodeCleanerModel>, DataError> {
        let episodes = self.episodes.lock().unwrap();
        Ok(episodes
            .iter()
            .filter(|ep| ep.publication_date() < cutoff)
            .map(|ep| EpisodeCleanerModel::new(ep.id(), ep.mp3_link()))
            .collect())
    }

    async fn count_watched(&self, episode_id: i64) -> Result<usize, DataError> {
        let watched = self.watched.lock().unwrap();
        Ok(watched.iter().filter(|w| w.episode_id() == episode_id).count())
    }

    async fn delete_watched(&self, episode_id: i64) -> Result<(), DataError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("delete_watched:{}", episode_id));
        if !self.sticky_watched.load(Ordering::SeqCst) {
            let mut watched = self.watched.lock().unwrap();
            watched.retain(|w| w.episode_id() != episode_id);
        }
        Ok(())
    }

    async fn delete_episode(&self, episode_id: i64) -> Result<(), DataError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("delete_episode:{}", episode_id));
        let mut episodes = self.episodes.lock().unwrap();
        episodes.retain(|ep| ep.id() != episode_id);
        Ok(())
    }
}

pub(crate) struct MemObjectStore {
    objects: Mutex<HashSet<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
    events: EventLog,
}

impl MemObjectStore {
    pub(crate) fn new(events: EventLog) -> Self {
        MemObjectStore {
            objects: Mutex::new(HashSet::new()),
            fail_uploads: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            events,
        }
    }

    pub(crate) fn make_uploads_fail(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub(crate) fn make_deletes_fail(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn seed_object(&self, object_path: &str) {
        self.objects.lock().unwrap().insert(object_path.to_owned());
    }

    pub(crate) fn contains(&self, object_path: &str) -> bool {
        self.objects.lock().unwrap().contains(object_path)
    }
}

#[async_trait]
impl ObjectStore for MemObjectStore {
    async fn upload(&self, _local_path: &Path, object_path: &str) -> Result<(), DataError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            self.events
                .lock()
                .unwrap()
                .push(format!("upload_failed:{}", object_path));
            return Err(DataError::Bail("upload refused".to_owned()));
        }
        self.objects.lock().unwrap().insert(object_path.to_owned());
        self.events
            .lock()
            .unwrap()
            .push(format!("upload:{}", object_path));
        Ok(())
    }

    async fn exists(&self, object_path: &str) -> Result<bool, DataError> {
        Ok(self.objects.lock().unwrap().contains(object_path))
    }

    async fn delete(&self, object_path: &str) -> Result<(), DataError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DataError::Bail("object delete refused".to_owned()));
        }
        self.objects.lock().unwrap().remove(object_path);
        self.events
            .lock()
            .unwrap()
            .push(format!("object_delete:{}", object_path));
        Ok(())
    }

    fn public_url(&self, object_path: &str) -> String {
        format!(
            "http://bucket.invalid/storage/v1/object/public/audio/{}",
            object_path
        )
    }
}

pub(crate) fn fakes() -> (MemDataStore, MemObjectStore, EventLog) {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    (
        MemDataStore::new(events.clone()),
        MemObjectStore::new(events.clone()),
        events,
    )
}

/// A fully populated insertable episode, mirroring what the ingest workflow
/// produces right before the insert call.
pub(crate) fn sample_new_episode(title: &str, date: NaiveDate, slug: &str) -> NewEpisode {
    NewEpisodeBuilder::default()
        .title(title)
        .description("A line of description.")
        .publication_date(date)
        .duration(1800)
        .original_mp3_link(format!("https://cdn.example.com/audio/{}.mp3", slug))
        .mp3_link(format!(
            "http://bucket.invalid/storage/v1/object/public/audio/mp3/{}.mp3",
            slug
        ))
        .build()
        .unwrap()
}
