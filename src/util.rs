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
//! Utility module collection of functions

use std::{
    borrow::Borrow,
    env,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use statrs::statistics::Statistics;

/// Location of the log4rs configuration, relative to the working directory.
pub const LOG_CONFIG: &str = "log4rs.yml";

/// Initialize logging from `log4rs.yml` if it exists. Otherwise, log to stderr with
/// `pretty_env_logger`, defaulting to level `info` and honouring `RUST_LOG`.
///
/// Calling this function more than once is allowed; only the first call has an effect.
pub fn init_logging() {
    if Path::new(LOG_CONFIG).exists() {
        match log4rs::init_file(LOG_CONFIG, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Cannot use {LOG_CONFIG} ({e}), falling back to stderr logging"),
        }
    }

    let _ = pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_filters(&env::var("RUST_LOG").unwrap_or_default())
        .try_init();
}

/// Arithmetic mean of all values, or `0.0` if there are none.
pub fn mean_or_zero<I>(values: I) -> f64
where
    I: IntoIterator,
    I::Item: Borrow<f64>,
{
    let mut values = values.into_iter().peekable();
    if values.peek().is_none() {
        return 0.0;
    }
    values.mean()
}

pub trait PathBufExt: Sized {
    fn then(self, p: impl AsRef<Path>) -> PathBuf;
}

impl PathBufExt for PathBuf {
    fn then(mut self, p: impl AsRef<Path>) -> PathBuf {
        self.push(p);
        self
    }
}

impl PathBufExt for &Path {
    fn then(self, p: impl AsRef<Path>) -> PathBuf {
        let mut path = self.to_path_buf();
        path.push(p);
        path
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean_or_zero(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean_or_zero([1.0, 2.0, 6.0]), 3.0);
        assert_eq!(mean_or_zero(&vec![12.5]), 12.5);
    }

    #[test]
    fn then_joins_paths() {
        let p = Path::new("../results").then("aqm").then("2-ue");
        assert_eq!(p, PathBuf::from("../results/aqm/2-ue"));
    }
}
