//! Chart Model Module
//! Serializable trace and layout types, plus the backend seam the plotter
//! renders through. The JSON shapes follow the plotly conventions so the
//! HTML backend can hand them to the page verbatim.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write chart output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode chart data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

/// Trace kind, serialized as the plotly `type` string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    #[default]
    Scatter,
    Scattergeo,
    Histogram,
}

/// A value on a plot axis: numeric, or categorical (date labels).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlotValue {
    Num(f64),
    Text(String),
}

/// A marker dimension: one value for the whole trace, or one per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dim {
    Scalar(f64),
    PerPoint(Vec<f64>),
}

/// Marker color: a named color, or one numeric value per point mapped
/// through the trace's color scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Named(String),
    PerPoint(Vec<f64>),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Dim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: String,
}

/// One data series handed to the rendering backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locationmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<PlotValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<PlotValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: String,
}

impl Axis {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Geographic layout for the world map chart.
#[derive(Debug, Clone, Serialize)]
pub struct Geo {
    pub scope: String,
    pub projection: Projection,
    pub showland: bool,
    pub landcolor: String,
    pub countrycolor: String,
}

/// Axis, title and styling configuration accompanying a chart's traces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Rendering seam: a backend draws one chart into a named container.
///
/// The plotter only depends on this trait, so tests substitute a recording
/// stub and never touch a real rendering target.
pub trait ChartBackend {
    fn render_chart(
        &mut self,
        container_id: &str,
        traces: &[Trace],
        layout: &Layout,
    ) -> Result<(), RenderError>;
}
