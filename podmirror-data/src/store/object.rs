// object.rs
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

//! REST client for the object store.
//!
//! Blobs live at `{bucket}/{object_path}`. The bucket is public-read, so
//! "make public" is nothing more than formatting the public url; writes and
//! deletes carry the service key.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tokio::fs;

use std::path::Path;
use std::time::Duration;

use crate::errors::DataError;
use crate::store::ObjectStore;

pub struct BucketStore {
    client: Client,
    base_url: String,
    key: String,
    bucket: String,
}

impl BucketStore {
    pub fn new(base_url: &str, key: &str, bucket: &str) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(BucketStore {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            key: key.to_owned(),
            bucket: bucket.to_owned(),
        })
    }

    fn object_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_path
        )
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
}

#[async_trait]
impl ObjectStore for BucketStore {
    async fn upload(&self, local_path: &Path, object_path: &str) -> Result<(), DataError> {
        let body = fs::read(local_path).await?;
        let resp = self
            .client
            .post(self.object_url(object_path))
            .bearer_auth(&self.key)
            .header("Content-Type", "audio/mpeg")
            // Re-running over a partially mirrored feed overwrites silently.
            .header("x-upsert", "true")
            .body(body)
            .send()
            .await?;
        Self::check(resp, "upload object").await?;

        info!(
            "Uploaded '{}' to '{}/{}'",
            local_path.display(),
            self.bucket,
            object_path
        );
        Ok(())
    }

    async fn exists(&self, object_path: &str) -> Result<bool, DataError> {
        let resp = self
            .client
            .head(self.object_url(object_path))
            .bearer_auth(&self.key)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(DataError::HttpStatus {
                url: resp.url().to_string(),
                status,
                context: "object existence check".to_owned(),
            }),
        }
    }

    async fn delete(&self, object_path: &str) -> Result<(), DataError> {
        let resp = self
            .client
            .delete(self.object_url(object_path))
            .bearer_auth(&self.key)
            .send()
            .await?;
        Self::check(resp, "delete object").await?;

        info!("Deleted object '{}/{}'", self.bucket, object_path);
        Ok(())
    }

    fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_path
        )
    }
}
