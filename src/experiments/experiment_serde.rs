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
//! Allows to (de-)serialize experiment configurations and collected metrics to and from a file.

use std::{io::Write, path::Path};

use serde::Serialize;

use super::{ConfigError, ExperimentConfig};

impl ExperimentConfig {
    /// Read a JSON configuration and check it with [`ExperimentConfig::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let serialized_config = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&serialized_config)?;
        log::debug!("Loaded experiment configuration from {path:?}");
        config.validate()?;
        Ok(config)
    }
}

/// Serialize `value` as pretty JSON and store it at the given file location.
pub fn serialize_to_file(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), ConfigError> {
    let serialized = serde_json::to_string_pretty(value)?;

    // open file, ensuring that an existing file is overwritten
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;

    file.write_all(serialized.as_bytes())?;

    Ok(())
}
