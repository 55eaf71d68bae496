//! Chart Plotter Module
//! Builds the four earthquake charts and hands each one to a backend keyed
//! by its container id.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, TimeZone, Utc};
use log::debug;

use crate::charts::model::{
    Axis, ChartBackend, ColorBar, Dim, Geo, Layout, Marker, MarkerColor, PlotValue, Projection,
    RenderError, Trace, TraceKind,
};
use crate::data::Earthquake;

/// Target container ids, fixed by the dashboard page.
pub const MAP_CONTAINER: &str = "earthquakePlot";
pub const HISTOGRAM_CONTAINER: &str = "magnitudeHistogram";
pub const DAILY_CONTAINER: &str = "timeSeriesPlot";
pub const DEPTH_CONTAINER: &str = "magnitudeDepthPlot";

/// Marker scale factor for the world map.
const MAP_SIZE_FACTOR: f64 = 4.0;

/// Builds chart traces and layouts from flattened earthquake records.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Render all four charts. The routines are independent of each other;
    /// only the shared record slice ties them together.
    pub fn plot_all(
        backend: &mut dyn ChartBackend,
        quakes: &[Earthquake],
    ) -> Result<(), RenderError> {
        Self::plot_map(backend, quakes)?;
        Self::plot_magnitude_histogram(backend, quakes)?;
        Self::plot_magnitude_vs_depth(backend, quakes)?;
        Self::plot_daily_frequency(backend, quakes)?;
        Ok(())
    }

    /// World map: one marker per event, sized and colored by magnitude on a
    /// fixed 0-8 Viridis scale.
    pub fn plot_map(
        backend: &mut dyn ChartBackend,
        quakes: &[Earthquake],
    ) -> Result<(), RenderError> {
        debug!("building map chart for {} records", quakes.len());

        let trace = Trace {
            kind: TraceKind::Scattergeo,
            locationmode: Some("world".to_owned()),
            lon: Some(quakes.iter().map(Earthquake::longitude).collect()),
            lat: Some(quakes.iter().map(Earthquake::latitude).collect()),
            text: Some(
                quakes
                    .iter()
                    .map(|q| {
                        format!("Magnitude: {} Time: {}", q.magnitude, format_time(q.time))
                    })
                    .collect(),
            ),
            marker: Some(Marker {
                size: Some(Dim::PerPoint(
                    quakes.iter().map(|q| q.magnitude * MAP_SIZE_FACTOR).collect(),
                )),
                color: Some(MarkerColor::PerPoint(
                    quakes.iter().map(|q| q.magnitude).collect(),
                )),
                cmin: Some(0.0),
                cmax: Some(8.0),
                colorscale: Some("Viridis".to_owned()),
                colorbar: Some(ColorBar {
                    title: "Magnitude".to_owned(),
                }),
            }),
            ..Default::default()
        };

        let layout = Layout {
            title: Some("Global Earthquakes in the Last Week".to_owned()),
            geo: Some(Geo {
                scope: "world".to_owned(),
                projection: Projection {
                    kind: "natural earth".to_owned(),
                },
                showland: true,
                landcolor: "rgb(243, 243, 243)".to_owned(),
                countrycolor: "rgb(204, 204, 204)".to_owned(),
            }),
            ..Default::default()
        };

        backend.render_chart(MAP_CONTAINER, &[trace], &layout)
    }

    /// Magnitude distribution, auto-binned by the backend.
    pub fn plot_magnitude_histogram(
        backend: &mut dyn ChartBackend,
        quakes: &[Earthquake],
    ) -> Result<(), RenderError> {
        debug!("building histogram chart for {} records", quakes.len());

        let trace = Trace {
            kind: TraceKind::Histogram,
            x: Some(quakes.iter().map(|q| PlotValue::Num(q.magnitude)).collect()),
            marker: Some(Marker {
                color: Some(MarkerColor::Named("pink".to_owned())),
                ..Default::default()
            }),
            ..Default::default()
        };

        let layout = Layout {
            title: Some("Histogram of Earthquake Magnitudes".to_owned()),
            xaxis: Some(Axis::titled("Magnitude")),
            yaxis: Some(Axis::titled("Frequency")),
            ..Default::default()
        };

        backend.render_chart(HISTOGRAM_CONTAINER, &[trace], &layout)
    }

    /// Depth (third coordinate) against magnitude.
    pub fn plot_magnitude_vs_depth(
        backend: &mut dyn ChartBackend,
        quakes: &[Earthquake],
    ) -> Result<(), RenderError> {
        debug!("building depth chart for {} records", quakes.len());

        let trace = Trace {
            kind: TraceKind::Scatter,
            mode: Some("markers".to_owned()),
            x: Some(quakes.iter().map(|q| PlotValue::Num(q.magnitude)).collect()),
            y: Some(
                quakes
                    .iter()
                    .map(|q| PlotValue::Num(q.depth_km()))
                    .collect(),
            ),
            marker: Some(Marker {
                size: Some(Dim::Scalar(8.0)),
                color: Some(MarkerColor::Named("blue".to_owned())),
                ..Default::default()
            }),
            ..Default::default()
        };

        let layout = Layout {
            title: Some("Magnitude Vs Depth".to_owned()),
            xaxis: Some(Axis::titled("Magnitude")),
            yaxis: Some(Axis::titled("Depth (km)")),
            height: Some(600),
            ..Default::default()
        };

        backend.render_chart(DEPTH_CONTAINER, &[trace], &layout)
    }

    /// Event count per local calendar date, in calendar order.
    pub fn plot_daily_frequency(
        backend: &mut dyn ChartBackend,
        quakes: &[Earthquake],
    ) -> Result<(), RenderError> {
        let counts = Self::daily_counts(quakes);
        debug!("building daily chart for {} distinct dates", counts.len());

        let trace = Trace {
            kind: TraceKind::Scatter,
            mode: Some("lines+markers".to_owned()),
            x: Some(
                counts
                    .iter()
                    .map(|(date, _)| PlotValue::Text(date.format("%Y-%m-%d").to_string()))
                    .collect(),
            ),
            y: Some(
                counts
                    .iter()
                    .map(|&(_, count)| PlotValue::Num(count as f64))
                    .collect(),
            ),
            marker: Some(Marker {
                size: Some(Dim::Scalar(10.0)),
                color: Some(MarkerColor::Named("red".to_owned())),
                ..Default::default()
            }),
            ..Default::default()
        };

        let layout = Layout {
            title: Some("Earthquakes per Day in the Last Week".to_owned()),
            xaxis: Some(Axis::titled("Date")),
            yaxis: Some(Axis::titled("Number of Earthquakes")),
            ..Default::default()
        };

        backend.render_chart(DAILY_CONTAINER, &[trace], &layout)
    }

    /// Bucket events by their local calendar date, time of day discarded.
    /// Dates come out calendar-sorted, not in first-seen order.
    pub fn daily_counts(quakes: &[Earthquake]) -> Vec<(NaiveDate, usize)> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for q in quakes {
            if let Some(date) = local_date(q.time) {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }
}

/// Local wall-clock rendering of an epoch-millisecond event time.
fn format_time(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => ms.to_string(),
    }
}

/// Local calendar date of an event; `None` for out-of-range timestamps.
fn local_date(ms: i64) -> Option<NaiveDate> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend stub that records every render call.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<(String, Vec<Trace>, Layout)>,
    }

    impl ChartBackend for RecordingBackend {
        fn render_chart(
            &mut self,
            container_id: &str,
            traces: &[Trace],
            layout: &Layout,
        ) -> Result<(), RenderError> {
            self.calls
                .push((container_id.to_owned(), traces.to_vec(), layout.clone()));
            Ok(())
        }
    }

    fn quake(lon: f64, lat: f64, depth: f64, mag: f64, time: i64) -> Earthquake {
        Earthquake {
            coordinates: [lon, lat, depth],
            magnitude: mag,
            time,
        }
    }

    /// Epoch milliseconds for noon local time on the given date, so date
    /// bucketing assertions hold in any timezone.
    fn local_noon_ms(year: i32, month: u32, day: u32) -> i64 {
        Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid local time")
            .timestamp_millis()
    }

    #[test]
    fn plot_all_hits_every_container_once() {
        let quakes = vec![quake(10.0, 20.0, 5.0, 4.5, 1700000000000)];
        let mut backend = RecordingBackend::default();
        ChartPlotter::plot_all(&mut backend, &quakes).unwrap();

        let ids: Vec<&str> = backend.calls.iter().map(|(id, _, _)| id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                MAP_CONTAINER,
                HISTOGRAM_CONTAINER,
                DEPTH_CONTAINER,
                DAILY_CONTAINER,
            ]
        );
    }

    #[test]
    fn map_markers_scale_with_magnitude() {
        let quakes = vec![
            quake(10.0, 20.0, 5.0, 4.5, 1700000000000),
            quake(11.0, 21.0, 7.0, 6.0, 1700003600000),
        ];
        let mut backend = RecordingBackend::default();
        ChartPlotter::plot_map(&mut backend, &quakes).unwrap();

        let (id, traces, layout) = &backend.calls[0];
        assert_eq!(id, MAP_CONTAINER);
        assert_eq!(traces.len(), 1);
        let trace = &traces[0];
        assert_eq!(trace.kind, TraceKind::Scattergeo);
        assert_eq!(trace.lon.as_deref(), Some([10.0, 11.0].as_slice()));
        assert_eq!(trace.lat.as_deref(), Some([20.0, 21.0].as_slice()));

        let marker = trace.marker.as_ref().unwrap();
        assert_eq!(marker.size, Some(Dim::PerPoint(vec![18.0, 24.0])));
        assert_eq!(marker.color, Some(MarkerColor::PerPoint(vec![4.5, 6.0])));
        assert_eq!(marker.cmin, Some(0.0));
        assert_eq!(marker.cmax, Some(8.0));
        assert_eq!(marker.colorscale.as_deref(), Some("Viridis"));
        assert!(layout.geo.is_some());
    }

    #[test]
    fn map_hover_text_names_magnitude() {
        let quakes = vec![quake(10.0, 20.0, 5.0, 4.5, 1700000000000)];
        let mut backend = RecordingBackend::default();
        ChartPlotter::plot_map(&mut backend, &quakes).unwrap();

        let text = backend.calls[0].1[0].text.as_ref().unwrap();
        assert!(text[0].starts_with("Magnitude: 4.5 Time: "));
    }

    #[test]
    fn depth_chart_plots_third_coordinate() {
        let quakes = vec![
            quake(10.0, 20.0, 5.0, 4.5, 0),
            quake(11.0, 21.0, 7.0, 6.0, 0),
        ];
        let mut backend = RecordingBackend::default();
        ChartPlotter::plot_magnitude_vs_depth(&mut backend, &quakes).unwrap();

        let trace = &backend.calls[0].1[0];
        assert_eq!(trace.mode.as_deref(), Some("markers"));
        assert_eq!(
            trace.x,
            Some(vec![PlotValue::Num(4.5), PlotValue::Num(6.0)])
        );
        assert_eq!(
            trace.y,
            Some(vec![PlotValue::Num(5.0), PlotValue::Num(7.0)])
        );
    }

    #[test]
    fn daily_counts_collapse_same_date() {
        let day_one = local_noon_ms(2024, 3, 1);
        let quakes = vec![
            quake(0.0, 0.0, 0.0, 1.0, day_one),
            quake(1.0, 1.0, 1.0, 2.0, day_one + 60_000),
            quake(2.0, 2.0, 2.0, 3.0, local_noon_ms(2024, 3, 2)),
        ];

        let counts = ChartPlotter::daily_counts(&quakes);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].1, 2);
        assert_eq!(counts[1].1, 1);
    }

    #[test]
    fn daily_counts_are_calendar_sorted() {
        // Feed order deliberately reversed
        let quakes = vec![
            quake(0.0, 0.0, 0.0, 1.0, local_noon_ms(2024, 3, 5)),
            quake(1.0, 1.0, 1.0, 2.0, local_noon_ms(2024, 3, 3)),
            quake(2.0, 2.0, 2.0, 3.0, local_noon_ms(2024, 3, 4)),
        ];

        let counts = ChartPlotter::daily_counts(&quakes);
        let dates: Vec<NaiveDate> = counts.iter().map(|&(d, _)| d).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(counts.iter().map(|&(_, c)| c).sum::<usize>(), 3);
    }

    #[test]
    fn empty_records_still_render_every_chart() {
        let mut backend = RecordingBackend::default();
        ChartPlotter::plot_all(&mut backend, &[]).unwrap();
        assert_eq!(backend.calls.len(), 4);

        for (_, traces, _) in &backend.calls {
            let trace = &traces[0];
            assert!(trace.x.as_ref().map_or(true, Vec::is_empty));
            assert!(trace.y.as_ref().map_or(true, Vec::is_empty));
            assert!(trace.lon.as_ref().map_or(true, Vec::is_empty));
            assert!(trace.lat.as_ref().map_or(true, Vec::is_empty));
        }
    }
}
