use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub header_height: f32,
    pub min_row_height: f32,
    pub quarter_width: f32,
    pub label_width: f32,
    pub padding: f32,
    pub category_header_height: f32,
    pub category_multiline_base: f32,
    pub category_line_height: f32,
    pub title_line_height: f32,
    pub desc_line_height: f32,
    pub task_padding: f32,
    pub category_wrap_chars: usize,
    pub title_wrap_chars: usize,
    pub desc_wrap_chars: usize,
    pub quarter_cell_height: f32,
    pub bar_inset_x: f32,
    pub bar_inset_y: f32,
    pub bar_min_height: f32,
    pub bar_radius: f32,
    pub placeholder_width: f32,
    pub placeholder_height: f32,
    pub validate_colors: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_height: 80.0,
            min_row_height: 40.0,
            quarter_width: 120.0,
            label_width: 200.0,
            padding: 20.0,
            category_header_height: 35.0,
            category_multiline_base: 18.0,
            category_line_height: 14.0,
            title_line_height: 14.0,
            desc_line_height: 12.0,
            task_padding: 8.0,
            category_wrap_chars: 30,
            title_wrap_chars: 28,
            desc_wrap_chars: 36,
            quarter_cell_height: 30.0,
            bar_inset_x: 2.0,
            bar_inset_y: 8.0,
            bar_min_height: 12.0,
            bar_radius: 4.0,
            placeholder_width: 600.0,
            placeholder_height: 200.0,
            validate_colors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixel density multiplier for raster output.
    pub scale: f32,
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            font_family: "DejaVu Sans".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    title_color: Option<String>,
    title_font_size: Option<f32>,
    header_color: Option<String>,
    header_font_size: Option<f32>,
    label_color: Option<String>,
    label_font_size: Option<f32>,
    category_color: Option<String>,
    category_font_size: Option<f32>,
    desc_color: Option<String>,
    desc_font_size: Option<f32>,
    header_fill: Option<String>,
    header_fill_alt: Option<String>,
    header_border: Option<String>,
    grid_color: Option<String>,
    row_fill: Option<String>,
    row_border: Option<String>,
    fallback_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    header_height: Option<f32>,
    min_row_height: Option<f32>,
    quarter_width: Option<f32>,
    label_width: Option<f32>,
    padding: Option<f32>,
    category_header_height: Option<f32>,
    category_multiline_base: Option<f32>,
    category_line_height: Option<f32>,
    title_line_height: Option<f32>,
    desc_line_height: Option<f32>,
    task_padding: Option<f32>,
    category_wrap_chars: Option<usize>,
    title_wrap_chars: Option<usize>,
    desc_wrap_chars: Option<usize>,
    quarter_cell_height: Option<f32>,
    bar_inset_x: Option<f32>,
    bar_inset_y: Option<f32>,
    bar_min_height: Option<f32>,
    bar_radius: Option<f32>,
    placeholder_width: Option<f32>,
    placeholder_height: Option<f32>,
    validate_colors: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    scale: Option<f32>,
    font_family: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(&contents).map_err(|_| json_err).with_context(|| {
            format!("failed to parse config file {}", path.display())
        })?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => log::warn!("unknown theme `{theme_name}`, keeping the default"),
        }
    }
    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }
    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout);
    }
    if let Some(render) = parsed.render {
        if let Some(v) = render.scale {
            config.render.scale = v;
        }
        if let Some(v) = render.font_family {
            config.render.font_family = v;
        }
    }

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
    if let Some(v) = vars.title_color {
        theme.title_color = v;
    }
    if let Some(v) = vars.title_font_size {
        theme.title_font_size = v;
    }
    if let Some(v) = vars.header_color {
        theme.header_color = v;
    }
    if let Some(v) = vars.header_font_size {
        theme.header_font_size = v;
    }
    if let Some(v) = vars.label_color {
        theme.label_color = v;
    }
    if let Some(v) = vars.label_font_size {
        theme.label_font_size = v;
    }
    if let Some(v) = vars.category_color {
        theme.category_color = v;
    }
    if let Some(v) = vars.category_font_size {
        theme.category_font_size = v;
    }
    if let Some(v) = vars.desc_color {
        theme.desc_color = v;
    }
    if let Some(v) = vars.desc_font_size {
        theme.desc_font_size = v;
    }
    if let Some(v) = vars.header_fill {
        theme.header_fill = v;
    }
    if let Some(v) = vars.header_fill_alt {
        theme.header_fill_alt = v;
    }
    if let Some(v) = vars.header_border {
        theme.header_border = v;
    }
    if let Some(v) = vars.grid_color {
        theme.grid_color = v;
    }
    if let Some(v) = vars.row_fill {
        theme.row_fill = v;
    }
    if let Some(v) = vars.row_border {
        theme.row_border = v;
    }
    if let Some(v) = vars.fallback_color {
        theme.fallback_color = v;
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    if let Some(v) = file.header_height {
        layout.header_height = v;
    }
    if let Some(v) = file.min_row_height {
        layout.min_row_height = v;
    }
    if let Some(v) = file.quarter_width {
        layout.quarter_width = v;
    }
    if let Some(v) = file.label_width {
        layout.label_width = v;
    }
    if let Some(v) = file.padding {
        layout.padding = v;
    }
    if let Some(v) = file.category_header_height {
        layout.category_header_height = v;
    }
    if let Some(v) = file.category_multiline_base {
        layout.category_multiline_base = v;
    }
    if let Some(v) = file.category_line_height {
        layout.category_line_height = v;
    }
    if let Some(v) = file.title_line_height {
        layout.title_line_height = v;
    }
    if let Some(v) = file.desc_line_height {
        layout.desc_line_height = v;
    }
    if let Some(v) = file.task_padding {
        layout.task_padding = v;
    }
    if let Some(v) = file.category_wrap_chars {
        layout.category_wrap_chars = v.max(1);
    }
    if let Some(v) = file.title_wrap_chars {
        layout.title_wrap_chars = v.max(1);
    }
    if let Some(v) = file.desc_wrap_chars {
        layout.desc_wrap_chars = v.max(1);
    }
    if let Some(v) = file.quarter_cell_height {
        layout.quarter_cell_height = v;
    }
    if let Some(v) = file.bar_inset_x {
        layout.bar_inset_x = v;
    }
    if let Some(v) = file.bar_inset_y {
        layout.bar_inset_y = v;
    }
    if let Some(v) = file.bar_min_height {
        layout.bar_min_height = v;
    }
    if let Some(v) = file.bar_radius {
        layout.bar_radius = v;
    }
    if let Some(v) = file.placeholder_width {
        layout.placeholder_width = v.max(1.0);
    }
    if let Some(v) = file.placeholder_height {
        layout.placeholder_height = v.max(1.0);
    }
    if let Some(v) = file.validate_colors {
        layout.validate_colors = v;
    }
}
