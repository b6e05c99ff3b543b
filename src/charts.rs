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
//! Charts comparing the experiment variants, rendered with plotly.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use plotly::{
    common::{Line, Marker, MarkerSymbol, Mode, TextPosition},
    layout::{Axis, BarMode, Layout},
    Bar, Plot, Scatter,
};

use crate::{histogram::Histogram, metrics::VariantMetrics, util::PathBufExt};

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot write plots as {0:?}, supported formats: {1}")]
    UnsupportedFormat(String, &'static str),
}

/// File formats a plot can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    #[cfg(feature = "png")]
    Png,
    #[cfg(feature = "png")]
    Svg,
}

impl OutputFormat {
    #[cfg(feature = "png")]
    const SUPPORTED: &'static str = "html, png, svg";
    #[cfg(not(feature = "png"))]
    const SUPPORTED: &'static str = "html (png and svg require the `png` feature)";

    /// Format selected by the extension of `path`. A missing extension means HTML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChartError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "html".to_string());
        match ext.as_str() {
            "html" | "htm" => Ok(Self::Html),
            #[cfg(feature = "png")]
            "png" => Ok(Self::Png),
            #[cfg(feature = "png")]
            "svg" => Ok(Self::Svg),
            _ => Err(ChartError::UnsupportedFormat(ext, Self::SUPPORTED)),
        }
    }
}

const WIDTH: usize = 1000;
const HEIGHT: usize = 600;

const SYMBOLS: [MarkerSymbol; 4] = [
    MarkerSymbol::Square,
    MarkerSymbol::Diamond,
    MarkerSymbol::Circle,
    MarkerSymbol::TriangleUp,
];

/// (primary, secondary) color of each variant in the line plots.
const LINE_COLORS: [(&str, &str); 4] = [
    ("blue", "green"),
    ("gold", "purple"),
    ("red", "orange"),
    ("black", "gray"),
];

const BAR_COLORS: [&str; 4] = ["yellow", "purple", "teal", "orange"];

fn symbol(i: usize) -> MarkerSymbol {
    SYMBOLS[i % SYMBOLS.len()].clone()
}

fn line_colors(i: usize) -> (&'static str, &'static str) {
    LINE_COLORS[i % LINE_COLORS.len()]
}

fn line_trace(
    x: &[usize],
    y: &[f64],
    name: String,
    color: &'static str,
    symbol: MarkerSymbol,
) -> Box<Scatter<usize, f64>> {
    Scatter::new(x.to_vec(), y.to_vec())
        .name(name)
        .mode(Mode::LinesMarkers)
        .marker(Marker::new().symbol(symbol).size(8).color(color))
        .line(Line::new().color(color))
}

/// Layout of a chart with the number of UEs on the x axis.
fn ue_layout(title: &str, y_title: &str, ue_counts: &[usize]) -> Layout {
    Layout::new()
        .title(title)
        .x_axis(
            Axis::new()
                .title("Number of UEs")
                .tick_values(ue_counts.iter().map(|ue| *ue as f64).collect())
                .show_grid(true),
        )
        .y_axis(Axis::new().title(y_title).show_grid(true))
        .width(WIDTH)
        .height(HEIGHT)
}

/// UE counts of the first variant. All variants are collected for the same UE counts.
fn ue_counts(variants: &[VariantMetrics]) -> &[usize] {
    variants
        .first()
        .map(|v| v.ue_counts.as_slice())
        .unwrap_or_default()
}

/// Bar chart of the delay histogram. Bars span their bin, starting at the bin start.
pub fn delay_histogram(hist: &Histogram) -> Plot {
    let width = hist.bin_width();
    let centers = hist.starts().into_iter().map(|s| s + width / 2.0).collect_vec();

    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(centers, hist.counts())
            .name("Delay")
            .marker(Marker::new().line(Line::new().color("black").width(1.0))),
    );
    plot.set_layout(
        Layout::new()
            .title("Histogram of Delays")
            .x_axis(Axis::new().title("Delay (s)").show_grid(true))
            .y_axis(Axis::new().title("Count").show_grid(true))
            .bar_gap(0.0)
            .width(WIDTH)
            .height(HEIGHT),
    );
    plot
}

/// Average buffer size and MAC credits of every variant.
pub fn buffer_size_mac_credits(variants: &[VariantMetrics]) -> Plot {
    let mut plot = Plot::new();
    for (i, v) in variants.iter().enumerate() {
        let (buffer_color, credit_color) = line_colors(i);
        plot.add_trace(line_trace(
            &v.ue_counts,
            &v.buffer_sizes,
            format!("{} - Avg Buffer Size", v.label),
            buffer_color,
            symbol(i),
        ));
        plot.add_trace(line_trace(
            &v.ue_counts,
            &v.mac_credits,
            format!("{} - Avg MAC Credits", v.label),
            credit_color,
            symbol(i),
        ));
    }
    plot.set_layout(ue_layout(
        "RLC Metrics vs. Number of UEs",
        "Bytes",
        ue_counts(variants),
    ));
    plot
}

/// Average number of dropped and marked packets. Variants without such series are skipped.
pub fn drops_marks(variants: &[VariantMetrics]) -> Plot {
    let mut plot = Plot::new();
    for (i, v) in variants.iter().enumerate() {
        let (drop_color, mark_color) = line_colors(i);
        if let Some(drops) = &v.drops {
            plot.add_trace(line_trace(
                &v.ue_counts,
                drops,
                format!("{} - Drops", v.label),
                drop_color,
                MarkerSymbol::Square,
            ));
        }
        if let Some(marks) = &v.marks {
            plot.add_trace(line_trace(
                &v.ue_counts,
                marks,
                format!("{} - Marks", v.label),
                mark_color,
                MarkerSymbol::Square,
            ));
        }
    }
    plot.set_layout(ue_layout(
        "RLC Avg. Drops/Marks vs. Number of UEs",
        "Packets",
        ue_counts(variants),
    ));
    plot
}

/// Grouped bars of the average queue delay, labelled with their value.
pub fn queue_delay(variants: &[VariantMetrics]) -> Plot {
    let mut plot = Plot::new();
    for (i, v) in variants.iter().enumerate() {
        let labels = v.queue_delays.iter().map(|d| format!("{d:.2}")).collect_vec();
        plot.add_trace(
            Bar::new(v.ue_counts.clone(), v.queue_delays.clone())
                .name(&v.label)
                .opacity(0.7)
                .marker(
                    Marker::new()
                        .color(BAR_COLORS[i % BAR_COLORS.len()])
                        .line(Line::new().color("black").width(1.0)),
                )
                .text_array(labels)
                .text_position(TextPosition::Outside),
        );
    }
    plot.set_layout(
        ue_layout(
            "Avg Queue Delay vs. Number of UEs",
            "Avg Queue Delay (ms)",
            ue_counts(variants),
        )
        .bar_mode(BarMode::Group),
    );
    plot
}

/// Average downlink throughput of every variant.
pub fn throughput(variants: &[VariantMetrics]) -> Plot {
    let mut plot = Plot::new();
    for (i, v) in variants.iter().enumerate() {
        plot.add_trace(line_trace(
            &v.ue_counts,
            &v.throughputs,
            v.label.clone(),
            line_colors(i).0,
            MarkerSymbol::Circle,
        ));
    }
    plot.set_layout(ue_layout(
        "Average Downlink Throughput vs. Number of UEs",
        "Throughput (Mbps)",
        ue_counts(variants),
    ));
    plot
}

/// All charts of the variant comparison, with their file names.
pub fn comparison_charts(variants: &[VariantMetrics]) -> Vec<(&'static str, Plot)> {
    vec![
        ("bufferSizeMacCredits", buffer_size_mac_credits(variants)),
        ("dropsMarks", drops_marks(variants)),
        ("queueDelay", queue_delay(variants)),
        ("throughput", throughput(variants)),
    ]
}

/// Write `plot` to `path`, in the format given by its extension (HTML if there is none).
pub fn save_as(plot: &Plot, path: impl AsRef<Path>) -> Result<PathBuf, ChartError> {
    let format = OutputFormat::from_path(path.as_ref())?;
    let mut path = path.as_ref().to_path_buf();
    if path.extension().is_none() {
        path.set_extension("html");
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    match format {
        OutputFormat::Html => plot.write_html(&path),
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            plot.write_image(&path, plotly::ImageFormat::PNG, WIDTH, HEIGHT, 1.0)
        }
        #[cfg(feature = "png")]
        OutputFormat::Svg => {
            plot.write_image(&path, plotly::ImageFormat::SVG, WIDTH, HEIGHT, 1.0)
        }
    }
    log::info!("Saved plot to {}", path.display());
    Ok(path)
}

/// Write `plot` to `<plot_dir>/<name>.html`, and to `<plot_dir>/<name>.png` when built with the
/// `png` feature. Returns all written files.
pub fn save(
    plot: &Plot,
    plot_dir: impl AsRef<Path>,
    name: &str,
) -> Result<Vec<PathBuf>, ChartError> {
    let path = plot_dir.as_ref().then(name);
    #[allow(unused_mut)]
    let mut written = vec![save_as(plot, path.with_extension("html"))?];
    #[cfg(feature = "png")]
    written.push(save_as(plot, path.with_extension("png"))?);
    Ok(written)
}

#[cfg(test)]
mod test {
    use super::*;

    fn traces(plot: &Plot) -> Vec<serde_json::Value> {
        let json: serde_json::Value = serde_json::from_str(&plot.to_json()).unwrap();
        json["data"].as_array().cloned().unwrap_or_default()
    }

    fn variants() -> Vec<VariantMetrics> {
        vec![
            VariantMetrics {
                label: "DualPi2 AQM".to_string(),
                ue_counts: vec![2, 5],
                queue_delays: vec![1.234, 5.0],
                buffer_sizes: vec![100.0, 200.0],
                mac_credits: vec![10.0, 20.0],
                throughputs: vec![12.5, 7.0],
                drops: Some(vec![3.0, 4.0]),
                marks: Some(vec![30.0, 40.0]),
            },
            VariantMetrics {
                label: "No-AQM".to_string(),
                ue_counts: vec![2, 5],
                queue_delays: vec![9.0, 12.0],
                buffer_sizes: vec![300.0, 400.0],
                mac_credits: vec![15.0, 25.0],
                throughputs: vec![11.0, 6.5],
                drops: Some(vec![5.0, 6.0]),
                marks: None,
            },
        ]
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path("plots/hist.html").unwrap(), OutputFormat::Html);
        assert_eq!(OutputFormat::from_path("plots/hist.HTML").unwrap(), OutputFormat::Html);
        assert_eq!(OutputFormat::from_path("plots/hist").unwrap(), OutputFormat::Html);
        assert!(matches!(
            OutputFormat::from_path("plots/hist.txt"),
            Err(ChartError::UnsupportedFormat(ext, _)) if ext == "txt"
        ));
        #[cfg(feature = "png")]
        assert_eq!(OutputFormat::from_path("plots/hist.png").unwrap(), OutputFormat::Png);
        #[cfg(not(feature = "png"))]
        assert!(OutputFormat::from_path("plots/hist.png").is_err());
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let path = Path::new("./src/test/not-written/hist.csv");
        let err = save_as(&Plot::new(), path).unwrap_err();
        assert!(matches!(err, ChartError::UnsupportedFormat(..)));
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn save_writes_every_format() {
        let dir = std::env::temp_dir().then("aqm-plots-charts");
        let written = save(&throughput(&variants()), &dir, "throughput").unwrap();
        assert_eq!(written[0], dir.clone().then("throughput.html"));
        assert!(written[0].is_file());
        #[cfg(feature = "png")]
        assert_eq!(written[1], dir.then("throughput.png"));
        #[cfg(not(feature = "png"))]
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn histogram_bars_are_centered() {
        let hist: Histogram = r#"<h><bin start="0" count="4"/><bin start="0.5" count="2"/></h>"#
            .parse()
            .unwrap();
        let data = traces(&delay_histogram(&hist));
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["x"], serde_json::json!([0.25, 0.75]));
        assert_eq!(data[0]["y"], serde_json::json!([4, 2]));
    }

    #[test]
    fn two_lines_per_variant() {
        let data = traces(&buffer_size_mac_credits(&variants()));
        let names = data.iter().map(|t| t["name"].as_str().unwrap()).collect_vec();
        assert_eq!(
            names,
            vec![
                "DualPi2 AQM - Avg Buffer Size",
                "DualPi2 AQM - Avg MAC Credits",
                "No-AQM - Avg Buffer Size",
                "No-AQM - Avg MAC Credits"
            ]
        );
    }

    #[test]
    fn skips_missing_marks() {
        let data = traces(&drops_marks(&variants()));
        let names = data.iter().map(|t| t["name"].as_str().unwrap()).collect_vec();
        assert_eq!(
            names,
            vec!["DualPi2 AQM - Drops", "DualPi2 AQM - Marks", "No-AQM - Drops"]
        );
    }

    #[test]
    fn queue_delay_labels() {
        let data = traces(&queue_delay(&variants()));
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["text"], serde_json::json!(["1.23", "5.00"]));
        assert_eq!(data[1]["y"], serde_json::json!([9.0, 12.0]));
    }

    #[test]
    fn all_comparison_charts() {
        let charts = comparison_charts(&variants());
        let names = charts.iter().map(|(n, _)| *n).collect_vec();
        assert_eq!(
            names,
            vec!["bufferSizeMacCredits", "dropsMarks", "queueDelay", "throughput"]
        );
        assert_eq!(traces(&charts[3].1).len(), 2);
        assert!(traces(&throughput(&[])).is_empty());
    }
}
