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
//! Description of the compared experiments: which UE counts were simulated, and where the results
//! of each variant are stored.
//!
//! Results of a variant are expected at `<path>/<ue>-ue/`, containing the RLC logs (`*.log`) and
//! the flow-monitor summary `default-<ue>`.

pub mod experiment_serde;

pub use experiment_serde::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::PathBufExt;

/// Simulated numbers of UEs.
pub const DEFAULT_UE_COUNTS: [usize; 4] = [2, 5, 7, 10];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No UE counts configured")]
    NoUeCounts,
    #[error("No variants configured")]
    NoVariants,
    #[error("Variant {variant:?} has {got} {series} values, but there are {want} UE counts")]
    SeriesLength {
        variant: String,
        series: &'static str,
        got: usize,
        want: usize,
    },
}

/// One experimental condition, e.g., the RLC with DualPI2 AQM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Name shown in the legends.
    pub label: String,
    /// Folder containing one `<ue>-ue` sub-folder per UE count.
    pub path: PathBuf,
    /// Average number of dropped packets per UE count, taken from the simulation logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drops: Option<Vec<f64>>,
    /// Average number of ECN-marked packets per UE count, taken from the simulation logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<f64>>,
}

impl Variant {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            drops: None,
            marks: None,
        }
    }

    /// Folder holding the results of the run with `ue` UEs.
    pub fn folder(&self, ue: usize) -> PathBuf {
        self.path.clone().then(format!("{ue}-ue"))
    }

    /// Variant with DualPI2 enabled in the RLC, as used in the evaluation.
    pub fn dualpi2() -> Self {
        Self {
            drops: Some(vec![272.0, 185.2, 176.14, 113.8]),
            marks: Some(vec![2504.0, 1760.0, 1327.85, 1141.0]),
            ..Self::new("DualPi2 AQM", "../results/aqm")
        }
    }

    /// Baseline variant without AQM, as used in the evaluation.
    pub fn no_aqm() -> Self {
        Self {
            drops: Some(vec![336.0, 230.6, 128.3, 105.8]),
            ..Self::new("No-AQM", "../results/no-aqm")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default = "default_ue_counts")]
    pub ue_counts: Vec<usize>,
    #[serde(default = "default_variants")]
    pub variants: Vec<Variant>,
}

fn default_ue_counts() -> Vec<usize> {
    DEFAULT_UE_COUNTS.to_vec()
}

fn default_variants() -> Vec<Variant> {
    vec![Variant::dualpi2(), Variant::no_aqm()]
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            ue_counts: default_ue_counts(),
            variants: default_variants(),
        }
    }
}

impl ExperimentConfig {
    /// Check that the drop and mark series match the number of UE counts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ue_counts.is_empty() {
            return Err(ConfigError::NoUeCounts);
        }
        if self.variants.is_empty() {
            return Err(ConfigError::NoVariants);
        }
        let want = self.ue_counts.len();
        for variant in &self.variants {
            for (series, values) in [("drop", &variant.drops), ("mark", &variant.marks)] {
                match values {
                    Some(values) if values.len() != want => {
                        return Err(ConfigError::SeriesLength {
                            variant: variant.label.clone(),
                            series,
                            got: values.len(),
                            want,
                        })
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn variant_mut(&mut self, label: &str) -> Option<&mut Variant> {
        self.variants.iter_mut().find(|v| v.label == label)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.ue_counts, vec![2, 5, 7, 10]);
        assert_eq!(config.variants.len(), 2);
        assert_eq!(config.variants[0].path, PathBuf::from("../results/aqm"));
        assert_eq!(
            config.variants[1].folder(7),
            PathBuf::from("../results/no-aqm/7-ue")
        );
        assert!(config.variants[1].marks.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: ExperimentConfig = serde_json::from_str(r#"{"ue_counts": [1, 2, 3, 4]}"#).unwrap();
        assert_eq!(config.ue_counts, vec![1, 2, 3, 4]);
        assert_eq!(config.variants, default_variants());

        let config: ExperimentConfig =
            serde_json::from_str(r#"{"variants": [{"label": "x", "path": "/tmp/x"}]}"#).unwrap();
        assert_eq!(config.ue_counts, DEFAULT_UE_COUNTS.to_vec());
        assert_eq!(config.variants, vec![Variant::new("x", "/tmp/x")]);
    }

    #[test]
    fn series_length_mismatch() {
        let mut config = ExperimentConfig::default();
        config.ue_counts = vec![2, 5];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeriesLength { series: "drop", got: 4, want: 2, .. })
        ));
        config.ue_counts.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoUeCounts)));
    }

    #[test]
    fn override_variant_path() {
        let mut config = ExperimentConfig::default();
        config.variant_mut("No-AQM").unwrap().path = "/data/no-aqm".into();
        assert_eq!(config.variants[1].folder(2), PathBuf::from("/data/no-aqm/2-ue"));
        assert!(config.variant_mut("RED").is_none());
    }
}
