//! Front-end independent chart descriptions.
//!
//! A `ChartSpec` is a small, Plotly-like figure: axes, traces and per-point
//! hover metadata. The TUI draws it with Plotters, the CLI prints it as ASCII,
//! and `io::chart` writes it as JSON for any other consumer.

use serde::{Deserialize, Serialize};

pub mod kuznets;
pub mod period;

pub use kuznets::*;
pub use period::*;

/// Plotly's default qualitative palette.
pub const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Colour of the fitted trend line (CSS `limegreen`).
pub const TREND_COLOR: &str = "#32cd32";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Preferred height in pixels for graphical front-ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub kind: AxisKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Linear,
    /// Values are fractional calendar years.
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// One entry per point; empty for traces without hover text (trend lines).
    #[serde(default)]
    pub hover: Vec<HoverInfo>,
    pub style: TraceStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
}

/// Metadata shown when hovering a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    /// 4-digit year.
    pub date: String,
    pub value_label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_per_capita: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl HoverInfo {
    /// Hover lines in display order.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(4);
        if let Some(country) = &self.country {
            out.push(format!("Country: {country}"));
        }
        out.push(format!("Date: {}", self.date));
        out.push(format!("{}: {}", self.value_label, self.value));
        if let Some(gdp) = self.gdp_per_capita {
            out.push(format!("GDP per capita: {gdp}"));
        }
        out
    }
}

impl Trace {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChartSpec {
    /// Data bounds over all traces, y padded by 5%.
    ///
    /// Returns `None` when there is nothing finite to draw.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in self.traces.iter().flat_map(|t| t.points()) {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if !(x_min.is_finite() && y_min.is_finite()) {
            return None;
        }
        if x_max <= x_min {
            x_min -= 0.5;
            x_max += 0.5;
        }
        if y_max <= y_min {
            y_min -= 0.5;
            y_max += 0.5;
        }
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
        Some(([x_min, x_max], [y_min - pad, y_max + pad]))
    }
}
