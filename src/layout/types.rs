use crate::chart::Quarter;

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub height: f32,
}

impl TextBlock {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of laying out a chart: either a sized canvas or the fixed
/// placeholder shown for a chart without categories.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Chart(ChartLayout),
    Placeholder(PlaceholderLayout),
}

impl Layout {
    pub fn width(&self) -> f32 {
        match self {
            Layout::Chart(chart) => chart.width,
            Layout::Placeholder(placeholder) => placeholder.width,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            Layout::Chart(chart) => chart.height,
            Layout::Placeholder(placeholder) => placeholder.height,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartLayout> {
        match self {
            Layout::Chart(chart) => Some(chart),
            Layout::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Layout::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub title_x: f32,
    pub title_y: f32,
    pub header_height: f32,
    pub label_x: f32,
    pub label_width: f32,
    pub timeline_x: f32,
    pub timeline_width: f32,
    pub columns: Vec<QuarterColumn>,
    pub categories: Vec<CategoryLayout>,
    pub title_line_height: f32,
    pub desc_line_height: f32,
    pub category_line_height: f32,
}

impl ChartLayout {
    pub fn tasks(&self) -> impl Iterator<Item = &TaskLayout> {
        self.categories.iter().flat_map(|cat| cat.tasks.iter())
    }

    pub fn bar_count(&self) -> usize {
        self.tasks().filter(|task| task.bar.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuarterColumn {
    pub quarter: Quarter,
    pub index: usize,
    pub x: f32,
    pub width: f32,
    pub cell_y: f32,
    pub cell_height: f32,
    pub guide_top: f32,
    pub guide_bottom: f32,
}

impl QuarterColumn {
    pub fn label(&self) -> String {
        self.quarter.to_string()
    }

    pub fn is_odd(&self) -> bool {
        self.index % 2 == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLayout {
    pub id: String,
    pub name: TextBlock,
    pub color: String,
    pub y: f32,
    pub height: f32,
    pub tasks: Vec<TaskLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskLayout {
    pub id: String,
    pub title: TextBlock,
    pub description: TextBlock,
    pub y: f32,
    pub height: f32,
    pub bar: Option<BarLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub start_column: usize,
    pub end_column: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub color: String,
    pub outline: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderLayout {
    pub width: f32,
    pub height: f32,
    pub heading: String,
    pub hint: String,
}
