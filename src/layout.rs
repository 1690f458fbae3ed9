pub mod axis;
mod text;
pub(crate) mod types;
pub use axis::{build_axis, find_quarter_index};
pub use text::wrap_text;
pub use types::*;
use text::wrap_block;

use crate::chart::{Category, Chart, Quarter, Task};
use crate::config::LayoutConfig;
use crate::theme::{Theme, darken_color, is_valid_color};

// Title baseline sits this far below the top padding.
const TITLE_BASELINE_OFFSET: f32 = 20.0;

const PLACEHOLDER_HEADING: &str = "Add categories and tasks to see your Gantt chart";
const PLACEHOLDER_HINT: &str = "Use the sidebar to build your chart";

/// Sizes and positions every element of `chart`.
///
/// A chart without categories short-circuits to [`Layout::Placeholder`]
/// without building an axis.
pub fn compute_layout(chart: &Chart, theme: &Theme, config: &LayoutConfig) -> Layout {
    if chart.categories.is_empty() {
        return compute_placeholder_layout(config);
    }

    let axis = build_axis(
        chart.start_year,
        chart.start_quarter,
        chart.end_year,
        chart.end_quarter,
    );
    let sizes = measure_chart(chart, config);

    let padding = config.padding;
    let timeline_x = padding + config.label_width;
    let timeline_width = axis.len() as f32 * config.quarter_width;
    let width = config.label_width + timeline_width + padding * 2.0;
    let height = config.header_height + sizes.total_height() + padding * 2.0;

    let columns = axis
        .iter()
        .enumerate()
        .map(|(index, quarter)| QuarterColumn {
            quarter: *quarter,
            index,
            x: timeline_x + index as f32 * config.quarter_width,
            width: config.quarter_width,
            cell_y: config.header_height - config.quarter_cell_height,
            cell_height: config.quarter_cell_height,
            guide_top: config.header_height,
            guide_bottom: height - padding,
        })
        .collect();

    let mut categories = Vec::with_capacity(chart.categories.len());
    let mut y = config.header_height;
    for (category, size) in chart.categories.iter().zip(sizes.categories) {
        let color = resolve_color(&category.color, theme, config);
        let cat_y = y;
        y += size.height;

        let mut tasks = Vec::with_capacity(category.tasks.len());
        for (task, task_size) in category.tasks.iter().zip(size.tasks) {
            let bar = layout_bar(task, &color, &axis, y, task_size.height, timeline_x, theme, config);
            tasks.push(TaskLayout {
                id: task.id.clone(),
                title: task_size.title,
                description: task_size.description,
                y,
                height: task_size.height,
                bar,
            });
            y += task_size.height;
        }

        categories.push(CategoryLayout {
            id: category.id.clone(),
            name: size.name,
            color,
            y: cat_y,
            height: size.height,
            tasks,
        });
    }

    log::debug!(
        "laid out chart `{}`: {} columns, {} categories, {} tasks, {}x{}",
        chart.id,
        axis.len(),
        chart.categories.len(),
        chart.task_count(),
        width,
        height
    );

    Layout::Chart(ChartLayout {
        title: chart.title.clone(),
        width,
        height,
        padding,
        title_x: padding,
        title_y: padding + TITLE_BASELINE_OFFSET,
        header_height: config.header_height,
        label_x: padding,
        label_width: config.label_width,
        timeline_x,
        timeline_width,
        columns,
        categories,
        title_line_height: config.title_line_height,
        desc_line_height: config.desc_line_height,
        category_line_height: config.category_line_height,
    })
}

fn compute_placeholder_layout(config: &LayoutConfig) -> Layout {
    Layout::Placeholder(PlaceholderLayout {
        width: config.placeholder_width.max(1.0),
        height: config.placeholder_height.max(1.0),
        heading: PLACEHOLDER_HEADING.to_string(),
        hint: PLACEHOLDER_HINT.to_string(),
    })
}

struct ChartSizes {
    categories: Vec<CategorySize>,
}

impl ChartSizes {
    fn total_height(&self) -> f32 {
        self.categories
            .iter()
            .map(|cat| cat.height + cat.tasks.iter().map(|t| t.height).sum::<f32>())
            .sum()
    }
}

struct CategorySize {
    name: TextBlock,
    height: f32,
    tasks: Vec<TaskSize>,
}

struct TaskSize {
    title: TextBlock,
    description: TextBlock,
    height: f32,
}

fn measure_chart(chart: &Chart, config: &LayoutConfig) -> ChartSizes {
    let categories = chart
        .categories
        .iter()
        .map(|category| measure_category(category, config))
        .collect();
    ChartSizes { categories }
}

fn measure_category(category: &Category, config: &LayoutConfig) -> CategorySize {
    let name = wrap_block(
        Some(&category.name),
        config.category_wrap_chars,
        config.category_line_height,
    );
    let height = category_header_height(name.lines.len(), config);
    let tasks = category
        .tasks
        .iter()
        .map(|task| measure_task(task, config))
        .collect();
    CategorySize { name, height, tasks }
}

fn measure_task(task: &Task, config: &LayoutConfig) -> TaskSize {
    let title = wrap_block(Some(&task.title), config.title_wrap_chars, config.title_line_height);
    let description = wrap_block(task.description(), config.desc_wrap_chars, config.desc_line_height);
    let height = task_row_height(title.lines.len(), description.lines.len(), config);
    TaskSize {
        title,
        description,
        height,
    }
}

/// Header height for a category whose name wraps to `name_lines` lines.
pub fn category_header_height(name_lines: usize, config: &LayoutConfig) -> f32 {
    if name_lines <= 1 {
        config.category_header_height
    } else {
        config.category_multiline_base + name_lines as f32 * config.category_line_height
    }
}

/// Row height for a task with the given wrapped title and description line counts.
pub fn task_row_height(title_lines: usize, desc_lines: usize, config: &LayoutConfig) -> f32 {
    let content = title_lines as f32 * config.title_line_height
        + desc_lines as f32 * config.desc_line_height
        + config.task_padding;
    config.min_row_height.max(content)
}

#[allow(clippy::too_many_arguments)]
fn layout_bar(
    task: &Task,
    category_color: &str,
    axis: &[Quarter],
    row_y: f32,
    row_height: f32,
    timeline_x: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<BarLayout> {
    let start = find_quarter_index(axis, task.start_year, task.start_quarter)?;
    let end = find_quarter_index(axis, task.end_year, task.end_quarter)?;
    // Reversed spans get no bar rather than a negative-width rect; the row is kept.
    if end < start {
        log::debug!("task `{}` ends before it starts, skipping bar", task.id);
        return None;
    }

    let column_x = timeline_x + start as f32 * config.quarter_width;
    let span = (end - start + 1) as f32 * config.quarter_width;
    let color = resolve_color(task.effective_color(category_color), theme, config);
    let outline = darken_color(&color, &theme.outline_fallback);

    Some(BarLayout {
        start_column: start,
        end_column: end,
        x: column_x + config.bar_inset_x,
        y: row_y + config.bar_inset_y,
        width: span - config.bar_inset_x * 2.0,
        height: (row_height - config.bar_inset_y * 2.0).max(config.bar_min_height),
        radius: config.bar_radius.max(0.0),
        color,
        outline,
    })
}

fn resolve_color(color: &str, theme: &Theme, config: &LayoutConfig) -> String {
    if config.validate_colors && !is_valid_color(color) {
        log::warn!("rejecting color {color:?}, using {}", theme.fallback_color);
        return theme.fallback_color.clone();
    }
    color.to_string()
}
