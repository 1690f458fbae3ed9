use crate::layout::{BarLayout, Layout};
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub quarters: Vec<String>,
    pub categories: Vec<CategoryDump>,
}

#[derive(Debug, Serialize)]
pub struct CategoryDump {
    pub id: String,
    pub y: f32,
    pub height: f32,
    pub name_lines: Vec<String>,
    pub tasks: Vec<TaskDump>,
}

#[derive(Debug, Serialize)]
pub struct TaskDump {
    pub id: String,
    pub y: f32,
    pub height: f32,
    pub title_lines: Vec<String>,
    pub description_lines: Vec<String>,
    pub bar: Option<BarDump>,
}

#[derive(Debug, Serialize)]
pub struct BarDump {
    pub start_column: usize,
    pub end_column: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub color: String,
}

impl From<&BarLayout> for BarDump {
    fn from(bar: &BarLayout) -> Self {
        Self {
            start_column: bar.start_column,
            end_column: bar.end_column,
            x: bar.x,
            y: bar.y,
            width: bar.width,
            height: bar.height,
            radius: bar.radius,
            color: bar.color.clone(),
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let Layout::Chart(chart) = layout else {
            return LayoutDump {
                kind: "placeholder".to_string(),
                width: layout.width(),
                height: layout.height(),
                quarters: Vec::new(),
                categories: Vec::new(),
            };
        };

        let categories = chart
            .categories
            .iter()
            .map(|cat| CategoryDump {
                id: cat.id.clone(),
                y: cat.y,
                height: cat.height,
                name_lines: cat.name.lines.clone(),
                tasks: cat
                    .tasks
                    .iter()
                    .map(|task| TaskDump {
                        id: task.id.clone(),
                        y: task.y,
                        height: task.height,
                        title_lines: task.title.lines.clone(),
                        description_lines: task.description.lines.clone(),
                        bar: task.bar.as_ref().map(BarDump::from),
                    })
                    .collect(),
            })
            .collect();

        LayoutDump {
            kind: "chart".to_string(),
            width: chart.width,
            height: chart.height,
            quarters: chart.columns.iter().map(|col| col.label()).collect(),
            categories,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create layout dump {}", path.display()))?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
