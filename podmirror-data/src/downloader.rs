// downloader.rs
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

//! Fetching audio files and measuring their real duration.

use futures_util::StreamExt;
use reqwest::redirect;
use reqwest::{Client, ClientBuilder};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tempfile::NamedTempFile;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::DownloadError;
use crate::utils::{filename_from_url, url_cleaner};

/// Client builder for audio downloads.
///
/// Cdns bounce audio requests through several trackers before handing out
/// the real file, so redirects are followed generously but loops and
/// run-away chains are cut off.
pub fn client_builder() -> ClientBuilder {
    let policy = redirect::Policy::custom(|attempt| {
        debug!("Redirect attempt: {}", attempt.url());
        if attempt.previous().len() > 20 {
            attempt.error("too many redirects")
        } else if attempt.previous().last() == Some(attempt.url()) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .redirect(policy)
        .referer(false)
        .user_agent(crate::USER_AGENT)
}

/// Download the audio behind `url` into `dir` and return the local path.
///
/// The file lands under its source file name, the query-stripped last path
/// segment of the url. An already present file short-circuits the fetch so
/// re-runs over a partially mirrored feed stay cheap. The body streams into
/// a tempfile inside `dir` first, a half-written file never sits at the
/// final path.
pub async fn download_audio(
    client: &Client,
    url: &str,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let url = url_cleaner(url);
    let filename =
        filename_from_url(&url).ok_or_else(|| DownloadError::NoFileName(url.clone()))?;
    if !filename.ends_with(".mp3") {
        return Err(DownloadError::NotAnMp3(url));
    }

    std::fs::create_dir_all(dir)?;
    let target = dir.join(&filename);
    if target.exists() {
        info!("'{}' already downloaded, skipping fetch", target.display());
        return Ok(target);
    }

    info!("GET request to: {}", url);
    let resp = client.get(&url).send().await?;
    debug!("Status Resp: {}", resp.status());
    if !resp.status().is_success() {
        return Err(DownloadError::UnexpectedResponse(resp.status()));
    }

    // `new_in` rather than `new`, persist can't move across filesystems.
    let tempfile = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(tempfile);
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        writer.write_all(&chunk?)?;
    }
    let tempfile = writer.into_inner().map_err(|err| err.into_error())?;
    tempfile.persist(&target).map_err(|err| err.error)?;

    info!("Downloaded '{}'", target.display());
    Ok(target)
}

/// Measure the duration of a local audio file, in whole seconds.
///
/// Feeds routinely declare durations that drift from the shipped audio, so
/// the stored value comes from the file itself. `Ok(None)` means the file
/// decoded fine but carries no frame count to derive a duration from.
pub fn probe_duration(path: &Path) -> Result<Option<i64>, DownloadError> {
    let file = File::open(path)?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");
    let probed = symphonia::default::get_probe().format(
        &hint,
        source,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let duration = probed.format.default_track().and_then(|track| {
        let params = &track.codec_params;
        let time_base = params.time_base?;
        let frames = params.n_frames?;
        Some(time_base.calc_time(frames).seconds as i64)
    });
    Ok(duration)
}
