//! HTML Dashboard Module
//! Collects rendered charts and writes them out as one self-contained page,
//! with one container div and one `Plotly.newPlot` call per chart.

use std::fs;
use std::path::Path;

use log::info;

use crate::charts::model::{ChartBackend, Layout, RenderError, Trace};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

struct Panel {
    container_id: String,
    traces_json: String,
    layout_json: String,
}

/// Backend that accumulates chart data and emits an HTML dashboard.
#[derive(Default)]
pub struct HtmlRenderer {
    panels: Vec<Panel>,
}

impl ChartBackend for HtmlRenderer {
    fn render_chart(
        &mut self,
        container_id: &str,
        traces: &[Trace],
        layout: &Layout,
    ) -> Result<(), RenderError> {
        self.panels.push(Panel {
            container_id: container_id.to_owned(),
            traces_json: serde_json::to_string(traces)?,
            layout_json: serde_json::to_string(layout)?,
        });
        Ok(())
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the assembled page to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        fs::write(path, self.to_html())?;
        info!("dashboard written to {}", path.display());
        Ok(())
    }

    /// Assemble the full page: one div per container, then one render call
    /// per container once the page has loaded.
    pub fn to_html(&self) -> String {
        let mut divs = String::new();
        let mut calls = String::new();
        for panel in &self.panels {
            divs.push_str(&format!(
                "    <div id=\"{}\"></div>\n",
                panel.container_id
            ));
            calls.push_str(&format!(
                "      Plotly.newPlot(\"{}\", {}, {});\n",
                panel.container_id, panel.traces_json, panel.layout_json
            ));
        }

        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             \x20   <meta charset=\"utf-8\">\n\
             \x20   <title>Earthquake Dashboard</title>\n\
             \x20   <script src=\"{PLOTLY_CDN}\"></script>\n\
             </head>\n\
             <body>\n\
             {divs}\
             \x20   <script>\n\
             {calls}\
             \x20   </script>\n\
             </body>\n\
             </html>\n"
        )
    }
}
