//! Static Chart Renderer
//! Draws each chart into a PNG with plotters, one file per container id.
//! Interprets the same traces the HTML backend serializes, so both outputs
//! stay in sync with the plotter.

use std::fs;
use std::path::PathBuf;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::charts::model::{
    ChartBackend, Dim, Layout, MarkerColor, PlotValue, RenderError, Trace, TraceKind,
};

const CHART_SIZE: (u32, u32) = (900, 600);
const PINK: RGBColor = RGBColor(255, 192, 203);

/// Renders chart traces into PNG files under an output directory.
pub struct StaticChartRenderer {
    output_dir: PathBuf,
}

impl ChartBackend for StaticChartRenderer {
    fn render_chart(
        &mut self,
        container_id: &str,
        traces: &[Trace],
        layout: &Layout,
    ) -> Result<(), RenderError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.chart_path(container_id);

        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        if let Some(trace) = traces.first() {
            match trace.kind {
                TraceKind::Scattergeo => Self::draw_geo(&root, trace, layout)?,
                TraceKind::Histogram => Self::draw_histogram(&root, trace, layout)?,
                TraceKind::Scatter => Self::draw_scatter(&root, trace, layout)?,
            }
        }

        root.present().map_err(draw_err)?;
        info!("chart written to {}", path.display());
        Ok(())
    }
}

impl StaticChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn chart_path(&self, container_id: &str) -> PathBuf {
        self.output_dir.join(format!("{container_id}.png"))
    }

    /// World map rendered as a lon/lat scatter, markers sized per point and
    /// colored through the Viridis map over the trace's cmin..cmax range.
    fn draw_geo(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        trace: &Trace,
        layout: &Layout,
    ) -> Result<(), RenderError> {
        let lon = trace.lon.clone().unwrap_or_default();
        let lat = trace.lat.clone().unwrap_or_default();
        let marker = trace.marker.clone().unwrap_or_default();

        let sizes = match marker.size {
            Some(Dim::PerPoint(v)) => v,
            Some(Dim::Scalar(s)) => vec![s; lon.len()],
            None => vec![8.0; lon.len()],
        };
        let shades = match marker.color {
            Some(MarkerColor::PerPoint(v)) => v,
            _ => Vec::new(),
        };
        let cmin = marker.cmin.unwrap_or(0.0);
        let cmax = marker.cmax.unwrap_or(8.0);
        let span = (cmax - cmin).max(f64::EPSILON);

        let mut chart = ChartBuilder::on(root)
            .caption(title_of(layout), ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(-180.0..180.0, -90.0..90.0)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series((0..lon.len().min(lat.len())).map(|i| {
                let t = ((shades.get(i).copied().unwrap_or(cmin) - cmin) / span).clamp(0.0, 1.0);
                let radius = (sizes.get(i).copied().unwrap_or(8.0) / 2.0).round().max(1.0) as i32;
                Circle::new((lon[i], lat[i]), radius, ViridisRGB.get_color(t).filled())
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    /// Frequency histogram with bin width picked from the value range.
    fn draw_histogram(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        trace: &Trace,
        layout: &Layout,
    ) -> Result<(), RenderError> {
        let xs = numbers(trace.x.as_deref());

        let (min, max) = value_bounds(&xs, (0.0, 1.0));
        let bin = if max > min { nice_step(max - min, 10) } else { 1.0 };
        let nbins = (((max - min) / bin).ceil() as usize).max(1);

        let mut counts = vec![0usize; nbins];
        for &x in &xs {
            let i = (((x - min) / bin) as usize).min(nbins - 1);
            counts[i] += 1;
        }
        let peak = counts.iter().copied().max().unwrap_or(0);
        let y_max = (peak as f64 * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(root)
            .caption(title_of(layout), ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(min..min + nbins as f64 * bin, 0.0..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(x_desc(layout))
            .y_desc(y_desc(layout))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &c)| {
                let x0 = min + i as f64 * bin;
                Rectangle::new([(x0, 0.0), (x0 + bin, c as f64)], PINK.filled())
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    /// Scatter traces: numeric marker scatter, or a categorical line chart
    /// when the x values are labels (the daily frequency series).
    fn draw_scatter(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        trace: &Trace,
        layout: &Layout,
    ) -> Result<(), RenderError> {
        let categorical = trace
            .x
            .iter()
            .flatten()
            .any(|v| matches!(v, PlotValue::Text(_)));
        if categorical {
            Self::draw_label_line(root, trace, layout)
        } else {
            Self::draw_marker_scatter(root, trace, layout)
        }
    }

    fn draw_marker_scatter(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        trace: &Trace,
        layout: &Layout,
    ) -> Result<(), RenderError> {
        let xs = numbers(trace.x.as_deref());
        let ys = numbers(trace.y.as_deref());
        let marker = trace.marker.clone().unwrap_or_default();

        let radius = match marker.size {
            Some(Dim::Scalar(s)) => (s / 2.0).round().max(1.0) as i32,
            _ => 4,
        };
        let color = match &marker.color {
            Some(MarkerColor::Named(name)) => named_color(name),
            _ => BLUE,
        };

        let (x_min, x_max) = value_bounds(&xs, (0.0, 1.0));
        let (y_min, y_max) = value_bounds(&ys, (0.0, 1.0));

        let mut chart = ChartBuilder::on(root)
            .caption(title_of(layout), ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(x_desc(layout))
            .y_desc(y_desc(layout))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                xs.iter()
                    .zip(&ys)
                    .map(|(&x, &y)| Circle::new((x, y), radius, color.filled())),
            )
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_label_line(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        trace: &Trace,
        layout: &Layout,
    ) -> Result<(), RenderError> {
        let labels = labels(trace.x.as_deref());
        let ys = numbers(trace.y.as_deref());
        let marker = trace.marker.clone().unwrap_or_default();

        let radius = match marker.size {
            Some(Dim::Scalar(s)) => (s / 2.0).round().max(1.0) as i32,
            _ => 5,
        };
        let color = match &marker.color {
            Some(MarkerColor::Named(name)) => named_color(name),
            _ => RED,
        };

        let n = labels.len();
        let x_max = (n as f64 - 0.5).max(0.5);
        let y_max = ys.iter().copied().fold(0.0f64, f64::max).max(1.0) * 1.15;

        let mut chart = ChartBuilder::on(root)
            .caption(title_of(layout), ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(-0.5..x_max, 0.0..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_labels(n.clamp(1, 12))
            .x_label_formatter(&|v| {
                let i = v.round();
                if i >= 0.0 && (i as usize) < labels.len() && (v - i).abs() < 0.3 {
                    labels[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .x_desc(x_desc(layout))
            .y_desc(y_desc(layout))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(LineSeries::new(
                ys.iter().enumerate().map(|(i, &y)| (i as f64, y)),
                &color,
            ))
            .map_err(draw_err)?;

        chart
            .draw_series(
                ys.iter()
                    .enumerate()
                    .map(|(i, &y)| Circle::new((i as f64, y), radius, color.filled())),
            )
            .map_err(draw_err)?;

        Ok(())
    }
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn named_color(name: &str) -> RGBColor {
    match name {
        "blue" => BLUE,
        "red" => RED,
        "green" => GREEN,
        "pink" => PINK,
        _ => BLACK,
    }
}

fn title_of(layout: &Layout) -> String {
    layout.title.clone().unwrap_or_default()
}

fn x_desc(layout: &Layout) -> String {
    layout
        .xaxis
        .as_ref()
        .map(|a| a.title.clone())
        .unwrap_or_default()
}

fn y_desc(layout: &Layout) -> String {
    layout
        .yaxis
        .as_ref()
        .map(|a| a.title.clone())
        .unwrap_or_default()
}

fn numbers(values: Option<&[PlotValue]>) -> Vec<f64> {
    values
        .unwrap_or_default()
        .iter()
        .filter_map(|v| match v {
            PlotValue::Num(n) => Some(*n),
            PlotValue::Text(_) => None,
        })
        .collect()
}

fn labels(values: Option<&[PlotValue]>) -> Vec<String> {
    values
        .unwrap_or_default()
        .iter()
        .filter_map(|v| match v {
            PlotValue::Text(s) => Some(s.clone()),
            PlotValue::Num(_) => None,
        })
        .collect()
}

/// Finite min/max of `values`, slightly padded; `fallback` when empty.
fn value_bounds(values: &[f64], fallback: (f64, f64)) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        return fallback;
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Round a raw interval up to a 1/2/5 step.
fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}
