// config.rs
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

//! Runtime configuration.
//!
//! Built once from the environment by the worker binary and passed by
//! reference into the workflow entry points. The library itself never reads
//! environment variables.

use std::env;
use std::path::PathBuf;

use crate::errors::DataError;

/// Everything the two jobs need to know about the outside world.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the hosted relational store's REST surface.
    pub store_url: String,
    /// Service key for the relational store.
    pub store_key: String,
    /// Base url of the object store's REST surface.
    pub bucket_url: String,
    /// Service key for the object store.
    pub bucket_key: String,
    /// Bucket holding the re-hosted audio.
    pub bucket_name: String,
    /// Folder inside the bucket, audio objects live at `{folder}/{filename}`.
    pub bucket_folder: String,
    /// Landing page from which the feed url is discovered.
    pub feed_source_url: String,
    /// Episodes older than this many days are eligible for deletion.
    pub retention_days: i64,
    /// Upper bound of feed items considered per ingest run.
    pub max_episodes: usize,
    /// Directory for transient local audio copies.
    pub download_dir: PathBuf,
}

fn required(name: &'static str) -> Result<String, DataError> {
    env::var(name).map_err(|_| DataError::MissingEnvVar(name))
}

impl Config {
    pub fn from_env() -> Result<Self, DataError> {
        let store_url = required("PODMIRROR_STORE_URL")?;
        let store_key = required("PODMIRROR_STORE_KEY")?;
        // The bucket often lives on the same host as the relational store.
        let bucket_url =
            required("PODMIRROR_BUCKET_URL").or_else(|_| required("PODMIRROR_STORE_URL"))?;
        let bucket_key =
            required("PODMIRROR_BUCKET_KEY").or_else(|_| required("PODMIRROR_STORE_KEY"))?;
        let bucket_name = required("PODMIRROR_BUCKET")?;
        let bucket_folder =
            env::var("PODMIRROR_BUCKET_FOLDER").unwrap_or_else(|_| "mp3".to_string());
        let feed_source_url = required("PODMIRROR_FEED_SOURCE_URL")?;
        let retention_days = env::var("PODMIRROR_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        let max_episodes = env::var("PODMIRROR_MAX_EPISODES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        let download_dir = env::var("PODMIRROR_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./downloads"));

        Ok(Config {
            store_url,
            store_key,
            bucket_url,
            bucket_key,
            bucket_name,
            bucket_folder,
            feed_source_url,
            retention_days,
            max_episodes,
            download_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_names_the_missing_variable() {
        env::remove_var("PODMIRROR_STORE_URL");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, DataError::MissingEnvVar("PODMIRROR_STORE_URL")));
        assert!(err.to_string().contains("PODMIRROR_STORE_URL"));
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Config {
            store_url: "http://store.invalid".into(),
            store_key: "secret".into(),
            bucket_url: "http://bucket.invalid".into(),
            bucket_key: "secret".into(),
            bucket_name: "audio".into(),
            bucket_folder: "mp3".into(),
            feed_source_url: "http://feed.invalid/show".into(),
            retention_days: 15,
            max_episodes: 15,
            download_dir: PathBuf::from("./downloads"),
        }
    }
}
