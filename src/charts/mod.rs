//! Charts module - Chart building and rendering

mod html;
mod model;
mod plotter;
mod renderer;

pub use html::HtmlRenderer;
pub use model::{ChartBackend, Layout, RenderError, Trace};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
