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
//! Library for post-processing the results of ns-3 simulations comparing an RLC with DualPI2 AQM
//! against a baseline without AQM.

pub mod charts;
pub mod experiments;
pub mod flow_monitor;
pub mod histogram;
pub mod metrics;
pub mod rlc_stats;
pub mod util;

pub mod prelude {
    pub use super::{
        experiments::{ExperimentConfig, Variant},
        histogram::{Histogram, HistogramBin},
        metrics::{collect_variant, FolderMetrics, VariantMetrics},
        rlc_stats::{RlcAverages, RlcStats},
    };
}
