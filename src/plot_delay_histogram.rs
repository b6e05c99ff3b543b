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
use std::{io, path::PathBuf, process};

use clap::Parser;

use aqm_plots::{
    charts::{self, ChartError},
    histogram::{Histogram, HistogramError},
    util,
};

/// Plot the delay histogram exported by the flow monitor.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Path to the histogram XML file.
    file: PathBuf,
    /// Also write the plot to this file. The extension selects the format (html, or png and svg
    /// with the `png` feature).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Do not open the plot in the browser.
    #[arg(long)]
    no_show: bool,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("Error: File '{0}' not found!")]
    NotFound(String),
    #[error("Error: Cannot read file '{file}': {source}")]
    Read { file: String, source: io::Error },
    #[error("Error: Failed to parse XML file '{file}'. {source}")]
    Parse {
        file: String,
        source: HistogramError,
    },
    #[error("Error: Cannot write the plot: {0}")]
    Save(#[from] ChartError),
}

fn run(args: &Args) -> Result<(), RunError> {
    let file = args.file.display().to_string();

    let hist = Histogram::from_file(&args.file).map_err(|e| match e {
        HistogramError::NotFound(_) => RunError::NotFound(file.clone()),
        HistogramError::Io(source) => RunError::Read {
            file: file.clone(),
            source,
        },
        source => RunError::Parse {
            file: file.clone(),
            source,
        },
    })?;

    if hist.is_empty() {
        log::warn!("Histogram in '{file}' has no bins!");
    }
    log::info!(
        "Loaded {} bins ({} samples, bin width {}s) from '{file}'",
        hist.bins.len(),
        hist.total_count(),
        hist.bin_width()
    );

    let plot = charts::delay_histogram(&hist);

    if let Some(output) = &args.output {
        charts::save_as(&plot, output)?;
    }

    if !args.no_show {
        plot.show();
    }

    Ok(())
}

fn main() {
    util::init_logging();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        // printed directly, such that the message does not depend on the log filter
        eprintln!("{e}");
        log::debug!("{e:?}");
        process::exit(1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(cli: &[&str]) -> Args {
        Args::try_parse_from(["plot_delay_histogram"].iter().chain(cli)).unwrap()
    }

    #[test]
    fn missing_file() {
        let err = run(&args(&["./src/test/nope.xml", "--no-show"])).unwrap_err();
        assert!(matches!(err, RunError::NotFound(_)));
        assert_eq!(err.to_string(), "Error: File './src/test/nope.xml' not found!");
    }

    #[test]
    fn malformed_file() {
        let err = run(&args(&["./src/test/malformed-histogram.xml", "--no-show"])).unwrap_err();
        assert!(matches!(
            err,
            RunError::Parse {
                source: HistogramError::Xml(_),
                ..
            }
        ));
        assert!(err
            .to_string()
            .starts_with("Error: Failed to parse XML file './src/test/malformed-histogram.xml'."));
    }

    #[test]
    fn unsupported_output() {
        let err = run(&args(&[
            "./src/test/delay-histogram.xml",
            "--no-show",
            "--output",
            "./src/test/not-written/hist.csv",
        ]))
        .unwrap_err();
        assert!(matches!(err, RunError::Save(ChartError::UnsupportedFormat(..))));
    }

    #[test]
    fn valid_file() {
        run(&args(&["./src/test/delay-histogram.xml", "--no-show"])).unwrap();
    }
}
