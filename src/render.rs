#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{CategoryLayout, ChartLayout, Layout, PlaceholderLayout, TaskLayout};
use crate::theme::Theme;
use anyhow::{Context, Result};
use std::path::Path;

// Text placement inside the label column, relative to the row or header top.
const TEXT_INSET_X: f32 = 10.0;
const CATEGORY_SINGLE_BASELINE: f32 = 22.0;
const CATEGORY_MULTI_BASELINE: f32 = 18.0;
const CATEGORY_FIRST_DY: f32 = 4.0;
const TASK_TITLE_BASELINE: f32 = 14.0;
const DESC_GAP: f32 = 4.0;
const QUARTER_LABEL_RISE: f32 = 10.0;

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    match layout {
        Layout::Chart(chart) => render_chart_svg(chart, theme),
        Layout::Placeholder(placeholder) => render_placeholder_svg(placeholder, theme),
    }
}

fn render_chart_svg(layout: &ChartLayout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">"
    ));
    svg.push_str(&format!("<defs><style>{}</style></defs>", theme.style_sheet()));
    svg.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" class=\"title\">{}</text>",
        layout.title_x,
        layout.title_y,
        escape_xml(&layout.title)
    ));

    for column in &layout.columns {
        let fill = if column.is_odd() {
            &theme.header_fill_alt
        } else {
            &theme.header_fill
        };
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            column.x,
            column.cell_y,
            column.width,
            column.cell_height,
            escape_xml(fill),
            escape_xml(&theme.header_border)
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" class=\"header\" text-anchor=\"middle\">{}</text>",
            column.x + column.width / 2.0,
            column.guide_top - QUARTER_LABEL_RISE,
            column.label()
        ));
        svg.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            column.guide_top,
            column.guide_bottom,
            escape_xml(&theme.grid_color),
            x = column.x
        ));
    }

    for category in &layout.categories {
        push_category(&mut svg, layout, category);
        for task in &category.tasks {
            push_task(&mut svg, layout, task, theme);
        }
    }

    svg.push_str("</svg>");
    svg
}

fn push_category(svg: &mut String, layout: &ChartLayout, category: &CategoryLayout) {
    let color = escape_xml(&category.color);
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\" opacity=\"0.3\"/>",
        layout.label_x, category.y, layout.label_width, category.height
    ));

    let text_x = layout.label_x + TEXT_INSET_X;
    match category.name.lines.as_slice() {
        [] => {}
        [line] => {
            svg.push_str(&format!(
                "<text x=\"{text_x}\" y=\"{}\" class=\"category\">{}</text>",
                category.y + CATEGORY_SINGLE_BASELINE,
                escape_xml(line)
            ));
        }
        lines => {
            svg.push_str(&format!(
                "<text x=\"{text_x}\" y=\"{}\" class=\"category\">",
                category.y + CATEGORY_MULTI_BASELINE
            ));
            for (idx, line) in lines.iter().enumerate() {
                let dy = if idx == 0 {
                    CATEGORY_FIRST_DY
                } else {
                    layout.category_line_height
                };
                svg.push_str(&format!(
                    "<tspan x=\"{text_x}\" dy=\"{dy}\">{}</tspan>",
                    escape_xml(line)
                ));
            }
            svg.push_str("</text>");
        }
    }

    // Faint band across the whole timeline.
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\" opacity=\"0.05\"/>",
        layout.timeline_x, category.y, layout.timeline_width, category.height
    ));
}

fn push_task(svg: &mut String, layout: &ChartLayout, task: &TaskLayout, theme: &Theme) {
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        layout.label_x,
        task.y,
        layout.label_width,
        task.height,
        escape_xml(&theme.row_fill),
        escape_xml(&theme.row_border)
    ));

    let text_x = layout.label_x + TEXT_INSET_X;
    let mut text_y = task.y + TASK_TITLE_BASELINE;
    if !task.title.is_empty() {
        push_lines(svg, "label", text_x, text_y, &task.title.lines, layout.title_line_height);
        text_y += task.title.height;
    }
    if !task.description.is_empty() {
        push_lines(
            svg,
            "desc",
            text_x,
            text_y + DESC_GAP,
            &task.description.lines,
            layout.desc_line_height,
        );
    }

    if let Some(bar) = &task.bar {
        svg.push_str(&format!(
            "<rect class=\"task-bar\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"{}\" opacity=\"0.8\"/>",
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            escape_xml(&bar.color),
            bar.radius
        ));
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" rx=\"{}\"/>",
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            escape_xml(&bar.outline),
            bar.radius
        ));
    }
}

fn push_lines(svg: &mut String, class: &str, x: f32, y: f32, lines: &[String], line_height: f32) {
    svg.push_str(&format!("<text x=\"{x}\" y=\"{y}\" class=\"{class}\">"));
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        svg.push_str(&format!("<tspan x=\"{x}\" dy=\"{dy}\">{}</tspan>", escape_xml(line)));
    }
    svg.push_str("</text>");
}

fn render_placeholder_svg(layout: &PlaceholderLayout, theme: &Theme) -> String {
    let width = layout.width;
    let height = layout.height;
    let center_x = width / 2.0;
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">"
    ));
    svg.push_str(&format!("<defs><style>{}</style></defs>", theme.style_sheet()));
    svg.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));
    svg.push_str(&format!(
        "<text x=\"{center_x}\" y=\"{}\" class=\"category\" text-anchor=\"middle\">{}</text>",
        height / 2.0 - 6.0,
        escape_xml(&layout.heading)
    ));
    svg.push_str(&format!(
        "<text x=\"{center_x}\" y=\"{}\" class=\"desc\" text-anchor=\"middle\">{}</text>",
        height / 2.0 + 16.0,
        escape_xml(&layout.hint)
    ));
    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let data = render_png(svg, render_cfg)?;
    std::fs::write(output, data)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("wrote {}", output.display());
    Ok(())
}

/// Rasterizes an SVG document produced by [`render_svg`] into PNG bytes.
#[cfg(feature = "png")]
pub fn render_png(svg: &str, render_cfg: &RenderConfig) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.font_family = render_cfg.font_family.clone();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = if render_cfg.scale > 0.0 { render_cfg.scale } else { 1.0 };
    let size = tree.size().to_int_size().scale_by(scale).ok_or_else(|| {
        anyhow::anyhow!("Invalid raster size at scale {scale}")
    })?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    Ok(pixmap.encode_png()?)
}

/// Download name for an exported chart, e.g. `chart-42.svg`.
pub fn export_file_name(chart_id: &str, ext: &str) -> String {
    let id = if chart_id.trim().is_empty() {
        "untitled"
    } else {
        chart_id.trim()
    };
    format!("chart-{}.{}", id, ext)
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
