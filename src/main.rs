//! quakeview - USGS Earthquake Feed Dashboard
//!
//! Fetches the last week of earthquakes, flattens the feed into uniform
//! records, and renders four charts: a world map, a magnitude histogram, a
//! depth-vs-magnitude scatter, and a daily frequency series. Output is an
//! HTML dashboard plus one PNG snapshot per chart.

mod charts;
mod data;

use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use charts::{ChartPlotter, HtmlRenderer, StaticChartRenderer};
use data::{DataProcessor, FeedLoader};

const DASHBOARD_PATH: &str = "earthquake_dashboard.html";
const SNAPSHOT_DIR: &str = "charts";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // One fetch, one transform, four renders. Any failure aborts the run.
    let loader = FeedLoader::new();
    let feed = loader.fetch().context("fetching earthquake feed")?;
    info!("fetched {} features", feed.features.len());

    let quakes = DataProcessor::flatten(&feed).context("flattening feed features")?;
    info!("flattened {} earthquake records", quakes.len());

    let mut dashboard = HtmlRenderer::new();
    ChartPlotter::plot_all(&mut dashboard, &quakes).context("building dashboard charts")?;
    dashboard
        .write_to(Path::new(DASHBOARD_PATH))
        .context("writing dashboard")?;

    let mut snapshots = StaticChartRenderer::new(SNAPSHOT_DIR);
    ChartPlotter::plot_all(&mut snapshots, &quakes).context("rendering chart snapshots")?;

    // The dashboard is already on disk; a headless machine just skips this.
    if let Err(e) = open::that(DASHBOARD_PATH) {
        warn!("could not open dashboard in browser: {e}");
    }

    Ok(())
}
