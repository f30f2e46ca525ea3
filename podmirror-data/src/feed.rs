// feed.rs
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

//! Feed url discovery and fetching.
//!
//! The configured source url points at a landing page (a pod.link page, a
//! Podcast Addict page, or the publisher's own site), not at the feed
//! itself. The feed url is dug out of the page source with a set of known
//! hoster patterns, falling back to the html metadata the page may carry.

use regex::Regex;
use reqwest::Client;
use rss::Channel;
use scraper::{Html, Selector};

use crate::errors::DataError;

lazy_static! {
    // Known hoster url shapes, most specific first. The generic pattern
    // stays last so an exact hoster match always wins.
    static ref FEED_URL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"https://feeds\.audiomeans\.fr/feed/[a-f0-9-]+\.xml").unwrap(),
        Regex::new(r#"https://feeds\.megaphone\.fm/[^"'\s<>]+"#).unwrap(),
        Regex::new(r#"https://podcast\.ausha\.co/rss/[^"'\s<>]+"#).unwrap(),
        Regex::new(r#"(?i)https?://[^"'\s<>]*(?:rss|feed)[^"'\s<>]*\.xml"#).unwrap(),
    ];
    // Embedded in json or markup, matches drag along closing punctuation.
    static ref TRAILING_JUNK: Regex = Regex::new(r#"[,;)\]}"'\\]+$"#).unwrap();
}

/// Discover the feed url behind a landing page.
///
/// Every candidate found in the page source is probed with a `HEAD` request
/// and the first live one wins. Pages that embed no recognizable feed url
/// are searched for a `<meta name="rss">` tag and then for anchors pointing
/// at a known hoster; if everything comes up empty this is
/// [`DataError::FeedNotDiscovered`].
pub async fn discover_feed_url(client: &Client, page_url: &str) -> Result<String, DataError> {
    info!("Looking for a feed url on {}", page_url);
    let resp = client.get(page_url).send().await?;
    if !resp.status().is_success() {
        return Err(DataError::HttpStatus {
            url: page_url.to_owned(),
            status: resp.status(),
            context: "fetch landing page".to_owned(),
        });
    }
    let body = resp.text().await?;

    for candidate in scan_page_source(&body) {
        if probe_feed_url(client, &candidate).await {
            info!("Found live feed url {}", candidate);
            return Ok(candidate);
        }
        debug!("Candidate {} did not answer, moving on", candidate);
    }

    if let Some(url) = scan_html_metadata(&body) {
        info!("Falling back to html metadata, feed url {}", url);
        return Ok(url);
    }

    Err(DataError::FeedNotDiscovered)
}

/// Fetch and parse the feed itself.
pub async fn fetch_feed(client: &Client, feed_url: &str) -> Result<Channel, DataError> {
    let resp = client.get(feed_url).send().await?;
    if !resp.status().is_success() {
        return Err(DataError::HttpStatus {
            url: feed_url.to_owned(),
            status: resp.status(),
            context: "fetch feed".to_owned(),
        });
    }
    let bytes = resp.bytes().await?;
    let channel = Channel::read_from(&bytes[..])?;
    info!(
        "Fetched feed '{}' with {} items",
        channel.title(),
        channel.items().len()
    );
    Ok(channel)
}

/// All feed url candidates embedded in the raw page source, pattern order
/// preserved and duplicates dropped.
fn scan_page_source(body: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    for pattern in FEED_URL_PATTERNS.iter() {
        for m in pattern.find_iter(body) {
            let url = TRAILING_JUNK.replace(m.as_str(), "").into_owned();
            if !candidates.contains(&url) {
                candidates.push(url);
            }
        }
    }
    candidates
}

/// `<meta name="rss" content="...">` first, then anchors pointing at a
/// known hoster.
fn scan_html_metadata(body: &str) -> Option<String> {
    let document = Html::parse_document(body);

    // The selectors are static strings, parse cannot fail.
    let meta = Selector::parse(r#"meta[name="rss"]"#).ok()?;
    if let Some(content) = document
        .select(&meta)
        .find_map(|el| el.value().attr("content"))
    {
        return Some(content.to_owned());
    }

    let anchor = Selector::parse("a[href]").ok()?;
    document
        .select(&anchor)
        .filter_map(|el| el.value().attr("href"))
        .find(|href| FEED_URL_PATTERNS.iter().any(|p| p.is_match(href)))
        .map(str::to_owned)
}

async fn probe_feed_url(client: &Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}
