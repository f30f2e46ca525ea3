// rest.rs
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

//! PostgREST-style client for the hosted relational store.
//!
//! Tables are addressed by name, rows are filtered with `column=eq.value` /
//! `column=lt.value` query pairs and travel as json. The service key goes
//! out both as the `apikey` header and as a bearer token.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use std::time::Duration;

use crate::errors::DataError;
use crate::models::{Episode, EpisodeCleanerModel, NewEpisode, WatchedEpisode};
use crate::store::DataStore;

const EPISODES_TABLE: &str = "episodes";
const WATCHED_TABLE: &str = "watched_episodes";

pub struct RestStore {
    client: Client,
    base_url: String,
    key: String,
}

impl RestStore {
    pub fn new(base_url: &str, key: &str) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(RestStore {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            key: key.to_owned(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }

    async fn check(resp: Response, context: &str) -> Result<Response, DataError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(DataError::HttpStatus {
                url: resp.url().to_string(),
                status: resp.status(),
                context: context.to_owned(),
            })
        }
    }

    async fn select(&self, table: &str, query: &[(&str, &str)]) -> Result<Response, DataError> {
        let resp = self
            .auth(self.client.get(self.table_url(table)).query(query))
            .send()
            .await?;
        Self::check(resp, "select").await
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn episode_exists_by_date(&self, date: NaiveDate) -> Result<bool, DataError> {
        let filter = format!("eq.{}", date.format("%Y-%m-%d"));
        let rows: Vec<Value> = self
            .select(
                EPISODES_TABLE,
                &[("select", "id"), ("publication_date", &filter)],
            )
            .await?
            .json()
            .await?;
        Ok(!rows.is_empty())
    }

    async fn episode_exists_by_url(&self, original_url: &str) -> Result<bool, DataError> {
        let filter = format!("eq.{}", original_url);
        let rows: Vec<Value> = self
            .select(
                EPISODES_TABLE,
                &[("select", "id"), ("original_mp3_link", &filter)],
            )
            .await?
            .json()
            .await?;
        Ok(!rows.is_empty())
    }

    async fn insert_episode(&self, episode: &NewEpisode) -> Result<Episode, DataError> {
        let resp = self
            .auth(self.client.post(self.table_url(EPISODES_TABLE)))
            .header("Prefer", "return=representation")
            .json(episode)
            .send()
            .await?;
        let mut rows: Vec<Episode> = Self::check(resp, "insert episode").await?.json().await?;

        rows.pop().ok_or_else(|| {
            DataError::Bail(format!(
                "Store returned no row for inserted episode '{}'",
                episode.title()
            ))
        })
    }

    async fn old_episodes(&self, cutoff: NaiveDate) -> Result<Vec<EpisodeCleanerModel>, DataError> {
        let filter = format!("lt.{}", cutoff.format("%Y-%m-%d"));
        let rows = self
            .select(
                EPISODES_TABLE,
                &[("select", "id,mp3_link"), ("publication_date", &filter)],
            )
            .await?
            .json()
            .await?;
        Ok(rows)
    }

    async fn count_watched(&self, episode_id: i64) -> Result<usize, DataError> {
        let filter = format!("eq.{}", episode_id);
        let rows: Vec<WatchedEpisode> = self
            .select(
                WATCHED_TABLE,
                &[("select", "id,episode_id"), ("episode_id", &filter)],
            )
            .await?
            .json()
            .await?;
        Ok(rows.len())
    }

    async fn delete_watched(&self, episode_id: i64) -> Result<(), DataError> {
        let filter = format!("eq.{}", episode_id);
        let resp = self
            .auth(
                self.client
                    .delete(self.table_url(WATCHED_TABLE))
                    .query(&[("episode_id", filter.as_str())]),
            )
            .send()
            .await?;
        Self::check(resp, "delete watched rows").await?;
        Ok(())
    }

    async fn delete_episode(&self, episode_id: i64) -> Result<(), DataError> {
        let filter = format!("eq.{}", episode_id);
        let resp = self
            .auth(
                self.client
                    .delete(self.table_url(EPISODES_TABLE))
                    .query(&[("id", filter.as_str())]),
            )
            .send()
            .await?;
        Self::check(resp, "delete episode row").await?;
        Ok(())
    }
}
