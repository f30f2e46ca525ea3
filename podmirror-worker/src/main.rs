// main.rs
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

//! Scheduler-facing binary. Each subcommand is one batch job, runs to
//! completion and exits, non-zero on failure.

use clap::{Parser, Subcommand};
use log::info;

use podmirror_data::store::{BucketStore, RestStore};
use podmirror_data::{cleaner, pipeline, Config};

#[derive(Debug, Parser)]
#[command(name = "podmirror", version, about = "Mirrors a podcast feed into own storage")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discover the feed and mirror episodes that are not recorded yet.
    Ingest,
    /// Purge episodes that outlived the retention window.
    Cleanup,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init_timed();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = RestStore::new(&config.store_url, &config.store_key)?;
    let objects = BucketStore::new(&config.bucket_url, &config.bucket_key, &config.bucket_name)?;

    match cli.command {
        Command::Ingest => {
            let recorded = pipeline::ingest(&config, &store, &objects).await?;
            info!("Run complete, {} new episodes recorded", recorded.len());
        }
        Command::Cleanup => {
            let summary = cleaner::cleanup(&config, &store, &objects).await?;
            info!(
                "Run complete, {} of {} old episodes cleaned",
                summary.cleaned, summary.found
            );
        }
    }
    Ok(())
}
