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
//! Aggregation of the RLC logs and flow-monitor summaries of whole result folders.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    experiments::Variant,
    flow_monitor,
    rlc_stats::{RlcAverages, RlcStats},
    util::PathBufExt,
};

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Glob Error: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Metrics of a single run (one variant, one UE count).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FolderMetrics {
    pub rlc: RlcAverages,
    /// Mean downlink throughput in Mbps
    pub throughput: f64,
    /// Number of log files that contained at least one complete RLC block
    pub log_files: usize,
}

/// Metrics of one variant, with one entry per UE count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariantMetrics {
    pub label: String,
    pub ue_counts: Vec<usize>,
    pub queue_delays: Vec<f64>,
    pub buffer_sizes: Vec<f64>,
    pub mac_credits: Vec<f64>,
    pub throughputs: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drops: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<f64>>,
}

impl VariantMetrics {
    fn push(&mut self, ue: usize, metrics: FolderMetrics) {
        self.ue_counts.push(ue);
        self.queue_delays.push(metrics.rlc.queue_delay);
        self.buffer_sizes.push(metrics.rlc.buffer_size);
        self.mac_credits.push(metrics.rlc.mac_credits);
        self.throughputs.push(metrics.throughput);
    }
}

/// Name of the flow-monitor summary of the run with `ue` UEs.
pub fn flow_monitor_file(ue: usize) -> String {
    format!("default-{ue}")
}

/// All `*.log` files directly inside `folder`, in natural order of their file names.
pub fn log_files(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>, MetricsError> {
    let folder = folder.as_ref();
    let pattern = Path::new(&glob::Pattern::escape(&folder.to_string_lossy())).then("*.log");
    let files = glob::glob(&pattern.to_string_lossy())?.collect::<Result<Vec<_>, _>>()?;

    Ok(files
        .into_iter()
        .filter(|p| p.is_file())
        .sorted_by(|a, b| human_sort::compare(&file_name(a), &file_name(b)))
        .collect())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn read(path: &Path) -> Result<String, MetricsError> {
    fs::read_to_string(path).map_err(|source| MetricsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Average RLC metrics of all log files in `folder`: the mean of the per-file means. Files without
/// a complete RLC block are ignored. Returns zeros (and a count of zero) if no file contributes.
pub fn process_rlc_logs(folder: impl AsRef<Path>) -> Result<(RlcAverages, usize), MetricsError> {
    let files = log_files(folder.as_ref())?;
    log::debug!("Processing {} log files in {:?}", files.len(), folder.as_ref());

    let per_file = files
        .par_iter()
        .map(|path| -> Result<Option<RlcAverages>, MetricsError> {
            let averages = RlcStats::parse(&read(path)?).averages();
            if averages.is_none() {
                log::debug!("No RLC stats found in {path:?}");
            }
            Ok(averages)
        })
        .collect::<Result<Vec<_>, MetricsError>>()?
        .into_iter()
        .flatten()
        .collect_vec();

    Ok((RlcAverages::mean_of(&per_file), per_file.len()))
}

/// Collect the metrics of the run with `ue` UEs stored in `folder`. A missing flow-monitor summary
/// results in a throughput of zero.
pub fn process_folder(folder: impl AsRef<Path>, ue: usize) -> Result<FolderMetrics, MetricsError> {
    let folder = folder.as_ref();
    let (rlc, log_files) = process_rlc_logs(folder)?;

    let flow_monitor_path = folder.then(flow_monitor_file(ue));
    let throughput = if flow_monitor_path.is_file() {
        flow_monitor::read_mean_downlink_throughput(&flow_monitor_path).map_err(|source| {
            MetricsError::Io {
                path: flow_monitor_path.clone(),
                source,
            }
        })?
    } else {
        log::warn!("Flow monitor output {flow_monitor_path:?} not found!");
        0.0
    };

    Ok(FolderMetrics {
        rlc,
        throughput,
        log_files,
    })
}

/// Collect the metrics of `variant` for all `ue_counts`. Missing result folders yield zeros, such
/// that every series has one value per UE count.
pub fn collect_variant(
    variant: &Variant,
    ue_counts: &[usize],
) -> Result<VariantMetrics, MetricsError> {
    let mut result = VariantMetrics {
        label: variant.label.clone(),
        drops: variant.drops.clone(),
        marks: variant.marks.clone(),
        ..Default::default()
    };

    for &ue in ue_counts {
        let folder = variant.folder(ue);
        let metrics = if folder.is_dir() {
            let metrics = process_folder(&folder, ue)?;
            log::info!(
                "{} with {ue} UEs: {} log files, queue delay {:.2} ms, throughput {:.2} Mbps",
                variant.label,
                metrics.log_files,
                metrics.rlc.queue_delay,
                metrics.throughput
            );
            metrics
        } else {
            log::warn!("Folder {folder:?} not found!");
            FolderMetrics::default()
        };
        result.push(ue, metrics);
    }

    Ok(result)
}
