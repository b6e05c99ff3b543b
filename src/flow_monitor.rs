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
//! Extract the downlink throughput from the flow-monitor summary of a run.
//!
//! Downlink flows go from the remote host (`7.0.0.0/8`) to a UE (`1.0.0.0/8` or `2.0.0.0/8`).

use std::{fs, io, path::Path};

use lazy_static::lazy_static;
use regex::Regex;

use crate::util::mean_or_zero;

/// Number of lines following a flow header that are searched for its throughput.
pub const THROUGHPUT_LOOKAHEAD: usize = 4;

lazy_static! {
    static ref DOWNLINK_FLOW: Regex =
        Regex::new(r"^Flow \d+ \(7\.0\.0\.\d+:\d+ -> (1|2)\.0\.0\.\d+:\d+\)").unwrap();
    static ref THROUGHPUT: Regex = Regex::new(r"Throughput: ([\d.]+) Mbps").unwrap();
}

/// Whether `line` is the header of a downlink flow.
pub fn is_downlink_flow(line: &str) -> bool {
    DOWNLINK_FLOW.is_match(line.trim())
}

/// Throughput in Mbps reported on `line`, if any.
pub fn parse_throughput(line: &str) -> Option<f64> {
    THROUGHPUT.captures(line)?.get(1)?.as_str().parse().ok()
}

/// All downlink throughput values (in Mbps), in file order.
pub fn downlink_throughputs(text: &str) -> Vec<f64> {
    let lines: Vec<&str> = text.lines().collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_downlink_flow(line))
        .filter_map(|(i, _)| {
            lines
                .iter()
                .skip(i + 1)
                .take(THROUGHPUT_LOOKAHEAD)
                .find_map(|l| parse_throughput(l))
        })
        .collect()
}

/// Mean downlink throughput in Mbps, `0.0` if no downlink flow was found.
pub fn mean_downlink_throughput(text: &str) -> f64 {
    mean_or_zero(downlink_throughputs(text))
}

pub fn read_mean_downlink_throughput(path: impl AsRef<Path>) -> Result<f64, io::Error> {
    let text = fs::read_to_string(path.as_ref())?;
    let throughputs = downlink_throughputs(&text);
    log::debug!(
        "Found {} downlink flows in {:?}",
        throughputs.len(),
        path.as_ref()
    );
    Ok(mean_or_zero(throughputs))
}
