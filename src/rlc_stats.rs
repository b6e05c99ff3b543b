// AQM-Plots: Post-Processing of RLC and Flow-Monitor Results from DualPI2 Simulations
// Copyright (C) 2024-2025 Roland Schmid <roschmi@ethz.ch> and Tibor Schneider <sctibor@ethz.ch>
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
//! Scraper for the RLC statistics blocks printed by the DualPI2 RLC entity.
//!
//! A block looks like this:
//!
//! ```text
//! RLC Stats
//! MAC credits: 100 bytes
//! Queue size: 50 bytes
//! Queue delay: 5 ms
//! ```
//!
//! Each value line is optional. Missing lines or values that cannot be parsed are skipped.

use serde::{Deserialize, Serialize};

use crate::util::mean_or_zero;

/// Line that opens a block.
pub const BLOCK_MARKER: &str = "RLC Stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RlcField {
    MacCredits,
    QueueSize,
    QueueDelay,
}

impl RlcField {
    pub const ALL: [RlcField; 3] = [Self::MacCredits, Self::QueueSize, Self::QueueDelay];

    /// Text that must appear in the value line.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::MacCredits => "MAC credits:",
            Self::QueueSize => "Queue size:",
            Self::QueueDelay => "Queue delay:",
        }
    }

    /// Position of the value line, relative to the block marker.
    pub fn offset(&self) -> usize {
        match self {
            Self::MacCredits => 1,
            Self::QueueSize => 2,
            Self::QueueDelay => 3,
        }
    }

    /// Extract the value of this field from `line`: the first token after the first colon.
    pub fn parse_value(&self, line: &str) -> Option<u64> {
        if !line.contains(self.marker()) {
            return None;
        }
        line.split(':').nth(1)?.split_whitespace().next()?.parse().ok()
    }
}

/// All samples found in one log file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RlcStats {
    /// MAC credits in bytes
    pub mac_credits: Vec<u64>,
    /// Queue size in bytes
    pub buffer_sizes: Vec<u64>,
    /// Queue delay in ms
    pub queue_delays: Vec<u64>,
}

/// Mean values of one log file, or of a set of log files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RlcAverages {
    pub queue_delay: f64,
    pub buffer_size: f64,
    pub mac_credits: f64,
}

impl RlcStats {
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut stats = Self::default();

        for (i, _) in lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.trim() == BLOCK_MARKER)
        {
            for field in RlcField::ALL {
                let Some(value) = lines
                    .get(i + field.offset())
                    .and_then(|l| field.parse_value(l))
                else {
                    continue;
                };
                stats.samples_mut(field).push(value);
            }
        }

        stats
    }

    pub fn samples(&self, field: RlcField) -> &[u64] {
        match field {
            RlcField::MacCredits => &self.mac_credits,
            RlcField::QueueSize => &self.buffer_sizes,
            RlcField::QueueDelay => &self.queue_delays,
        }
    }

    fn samples_mut(&mut self, field: RlcField) -> &mut Vec<u64> {
        match field {
            RlcField::MacCredits => &mut self.mac_credits,
            RlcField::QueueSize => &mut self.buffer_sizes,
            RlcField::QueueDelay => &mut self.queue_delays,
        }
    }

    /// Number of samples of the least frequent field.
    pub fn num_blocks(&self) -> usize {
        RlcField::ALL
            .iter()
            .map(|f| self.samples(*f).len())
            .min()
            .unwrap_or_default()
    }

    /// Means of all three fields. Returns `None` unless every field has at least one sample.
    pub fn averages(&self) -> Option<RlcAverages> {
        if self.num_blocks() == 0 {
            return None;
        }
        let mean = |field| mean_or_zero(self.samples(field).iter().map(|x| *x as f64));
        Some(RlcAverages {
            queue_delay: mean(RlcField::QueueDelay),
            buffer_size: mean(RlcField::QueueSize),
            mac_credits: mean(RlcField::MacCredits),
        })
    }
}

impl RlcAverages {
    /// Field-wise mean over several averages. Yields zeros if `averages` is empty.
    pub fn mean_of<'a>(averages: impl IntoIterator<Item = &'a RlcAverages> + Clone) -> Self {
        let field = |f: fn(&RlcAverages) -> f64| mean_or_zero(averages.clone().into_iter().map(f));
        Self {
            queue_delay: field(|a| a.queue_delay),
            buffer_size: field(|a| a.buffer_size),
            mac_credits: field(|a| a.mac_credits),
        }
    }
}
