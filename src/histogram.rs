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
//! Parser for the delay histogram exported by the flow monitor.
//!
//! The file contains a root element with one `<bin start="..." count="..."/>` child per
//! histogram bin. Bins are kept in file order.

use std::{fs, io, path::Path, str::FromStr};

use serde::Serialize;

/// Bin width used when the histogram has fewer than two bins.
pub const DEFAULT_BIN_WIDTH: f64 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum HistogramError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
    #[error("XML Error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Bin {index} has no attribute `{attr}`")]
    MissingAttribute { index: usize, attr: &'static str },
    #[error("Bin {index} has an invalid `{attr}` value: {value:?}")]
    InvalidAttribute {
        index: usize,
        attr: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower edge of the bin (in seconds).
    pub start: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Read and parse the histogram stored at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HistogramError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HistogramError::NotFound(path.display().to_string()),
            _ => HistogramError::Io(e),
        })?;
        xml.parse()
    }

    pub fn starts(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.start).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    /// Distance between the first two bins, or [`DEFAULT_BIN_WIDTH`].
    pub fn bin_width(&self) -> f64 {
        match self.bins.as_slice() {
            [first, second, ..] => second.start - first.start,
            _ => DEFAULT_BIN_WIDTH,
        }
    }

    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

impl FromStr for Histogram {
    type Err = HistogramError;

    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        let doc = roxmltree::Document::parse(xml)?;
        let bins = doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name("bin"))
            .enumerate()
            .map(|(index, node)| -> Result<HistogramBin, HistogramError> {
                Ok(HistogramBin {
                    start: attribute(&node, index, "start")?,
                    count: attribute(&node, index, "count")?,
                })
            })
            .collect::<Result<Vec<_>, HistogramError>>()?;

        log::debug!("Parsed {} histogram bins", bins.len());
        Ok(Self { bins })
    }
}

fn attribute<T: FromStr>(
    node: &roxmltree::Node,
    index: usize,
    attr: &'static str,
) -> Result<T, HistogramError> {
    let value = node
        .attribute(attr)
        .ok_or(HistogramError::MissingAttribute { index, attr })?;
    value
        .trim()
        .parse()
        .map_err(|_| HistogramError::InvalidAttribute {
            index,
            attr,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod test {
    use super::*;

    const THREE_BINS: &str = r#"<?xml version="1.0" ?>
<DelayHistogram nBins="3">
  <bin index="0" start="0" width="0.001" count="4" />
  <bin index="1" start="0.001" width="0.001" count="17" />
  <bin index="2" start="0.002" width="0.001" count="2" />
</DelayHistogram>
"#;

    #[test]
    fn keeps_file_order() {
        let hist: Histogram = THREE_BINS.parse().unwrap();
        assert_eq!(hist.starts(), vec![0.0, 0.001, 0.002]);
        assert_eq!(hist.counts(), vec![4, 17, 2]);
        assert_eq!(hist.total_count(), 23);
        assert!((hist.bin_width() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn only_direct_children_are_bins() {
        let hist: Histogram = r#"<root>
            <bin start="1.0" count="1"/>
            <other><bin start="5.0" count="5"/></other>
            <bin start="2.0" count="2"/>
        </root>"#
            .parse()
            .unwrap();
        assert_eq!(hist.starts(), vec![1.0, 2.0]);
    }

    #[test]
    fn single_bin_uses_default_width() {
        let hist: Histogram = r#"<h><bin start="0.5" count="3"/></h>"#.parse().unwrap();
        assert_eq!(hist.bin_width(), DEFAULT_BIN_WIDTH);
        let empty: Histogram = "<h/>".parse().unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.bin_width(), DEFAULT_BIN_WIDTH);
    }

    #[test]
    fn malformed_xml() {
        let err = "<h><bin start=\"0\" count=\"1\"></h>"
            .parse::<Histogram>()
            .unwrap_err();
        assert!(matches!(err, HistogramError::Xml(_)));
    }

    #[test]
    fn bad_attributes() {
        let err = r#"<h><bin start="0"/></h>"#.parse::<Histogram>().unwrap_err();
        assert!(matches!(
            err,
            HistogramError::MissingAttribute { index: 0, attr: "count" }
        ));
        let err = r#"<h><bin start="0" count="1"/><bin start="x" count="1"/></h>"#
            .parse::<Histogram>()
            .unwrap_err();
        assert!(matches!(
            err,
            HistogramError::InvalidAttribute { index: 1, attr: "start", .. }
        ));
    }

    #[test]
    fn missing_file() {
        let err = Histogram::from_file("./src/test/does-not-exist.xml").unwrap_err();
        assert!(matches!(err, HistogramError::NotFound(_)));
    }

    #[test]
    fn fixture_file() {
        let hist = Histogram::from_file("./src/test/delay-histogram.xml").unwrap();
        assert_eq!(hist.bins.len(), 5);
        assert_eq!(hist.bins[4], HistogramBin { start: 0.004, count: 1 });
    }
}
