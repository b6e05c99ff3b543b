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
use std::{path::PathBuf, process};

use clap::Parser;

use aqm_plots::{
    charts,
    experiments::{serialize_to_file, ExperimentConfig, Variant},
    metrics::{collect_variant, VariantMetrics},
    util::{self, PathBufExt},
};

/// Compare the RLC metrics and the downlink throughput of all experiment variants.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// JSON file describing the UE counts and variants. Uses the DualPI2 / no-AQM comparison by
    /// default.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overwrite the results path of the DualPI2 variant.
    #[arg(long)]
    aqm: Option<PathBuf>,
    /// Overwrite the results path of the variant without AQM.
    #[arg(long)]
    no_aqm: Option<PathBuf>,
    /// Overwrite the output path for plots.
    #[arg(short, long, default_value = "plots")]
    output: PathBuf,
    /// Do not open the plots in the browser.
    #[arg(long)]
    no_show: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    util::init_logging();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: Could not load the configuration {path:?}: {e}");
            process::exit(1)
        }),
        None => ExperimentConfig::default(),
    };

    for (label, path) in [
        (Variant::dualpi2().label, &args.aqm),
        (Variant::no_aqm().label, &args.no_aqm),
    ] {
        let Some(path) = path else { continue };
        match config.variant_mut(&label) {
            Some(variant) => variant.path = path.clone(),
            None => log::warn!("No variant {label:?} configured, ignoring {path:?}"),
        }
    }

    let variants = config
        .variants
        .iter()
        .map(|variant| collect_variant(variant, &config.ue_counts))
        .collect::<Result<Vec<VariantMetrics>, _>>()?;

    let summary_path = args.output.clone().then("metrics.json");
    std::fs::create_dir_all(&args.output)?;
    serialize_to_file(&summary_path, &variants)?;
    log::info!("Saved collected metrics to {}", summary_path.display());

    for (name, plot) in charts::comparison_charts(&variants) {
        charts::save(&plot, &args.output, name)?;
        if !args.no_show {
            plot.show();
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn command_line() {
        let args = Args::try_parse_from(["plot_metrics"]).unwrap();
        assert_eq!(args.output, PathBuf::from("plots"));
        assert!(!args.no_show);

        let args = Args::try_parse_from([
            "plot_metrics",
            "--output",
            "/tmp/plots",
            "--no-show",
            "--aqm",
            "./src/test/results/aqm",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("/tmp/plots"));
        assert!(args.no_show);
        assert_eq!(args.aqm, Some(PathBuf::from("./src/test/results/aqm")));
        assert!(Args::try_parse_from(["plot_metrics", "--output-path", "x"]).is_err());
    }
}
