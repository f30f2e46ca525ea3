// watched.rs
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

use serde::Deserialize;

/// Watch-state row tying a viewer session to an [`Episode`].
///
/// These rows are created by the application serving the mirror, which is
/// out of scope here. The cleaner only ever reads and deletes them, before
/// it is allowed to touch the parent episode row.
///
/// [`Episode`]: super::Episode
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchedEpisode {
    id: i64,
    episode_id: i64,
}

impl WatchedEpisode {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn episode_id(&self) -> i64 {
        self.episode_id
    }
}

#[cfg(test)]
impl WatchedEpisode {
    pub(crate) fn new(id: i64, episode_id: i64) -> Self {
        WatchedEpisode { id, episode_id }
    }
}
