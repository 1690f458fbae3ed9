pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod edit;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod store;
pub mod theme;

pub use chart::{Category, Chart, Quarter, Task};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use edit::{ChartCommand, EditError, TaskDraft};
pub use layout::{Layout, build_axis, compute_layout, wrap_text};
pub use render::render_svg;
pub use store::{ChartStore, StoreError};
pub use theme::Theme;

use anyhow::Context;

/// Theme and layout settings for a one-shot render.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
        }
    }
}

/// Render a chart to SVG with the classic theme.
pub fn render_chart(chart: &Chart) -> String {
    render_chart_with_options(chart, &RenderOptions::default())
}

/// Render a chart to SVG with explicit theme and layout settings.
pub fn render_chart_with_options(chart: &Chart, options: &RenderOptions) -> String {
    let layout = compute_layout(chart, &options.theme, &options.layout);
    render_svg(&layout, &options.theme)
}

/// Parse a chart document. Strict JSON is tried first; JSON5 is accepted as a
/// lenient fallback for hand-written files.
pub fn parse_chart(input: &str) -> anyhow::Result<Chart> {
    match serde_json::from_str(input) {
        Ok(chart) => Ok(chart),
        Err(json_err) => json5::from_str(input)
            .map_err(|_| json_err)
            .context("failed to parse chart"),
    }
}
