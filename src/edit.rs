//! Chart editing as pure state transitions.
//!
//! Every command takes the current snapshot by reference and returns a fresh
//! [`Chart`]; nothing here mutates shared state, so the renderer only ever sees
//! complete snapshots.

use crate::chart::{Category, Chart, Quarter, Task};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("category name must not be empty")]
    EmptyCategoryName,
    #[error("task title must not be empty")]
    EmptyTaskTitle,
    #[error("quarter must be between 1 and 4, got {0}")]
    InvalidQuarter(u8),
    #[error("no category with id `{0}`")]
    UnknownCategory(String),
    #[error("no task with id `{task}` in category `{category}`")]
    UnknownTask { category: String, task: String },
}

/// Fields entered for a new or edited task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: Quarter,
    pub end: Quarter,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartCommand {
    SetTitle(String),
    SetRange {
        start: Quarter,
        end: Quarter,
    },
    AddCategory {
        name: String,
        color: String,
    },
    UpdateCategory {
        id: String,
        name: String,
        color: String,
    },
    DeleteCategory {
        id: String,
    },
    AddTask {
        category: String,
        draft: TaskDraft,
    },
    UpdateTask {
        category: String,
        id: String,
        draft: TaskDraft,
    },
    DeleteTask {
        category: String,
        id: String,
    },
}

/// The chart a fresh editing session starts from: the current quarter through
/// Q4 of the following year, no categories.
pub fn new_chart(title: &str, today: Quarter) -> Chart {
    let mut chart = Chart::new(title.trim(), today, Quarter::new(today.year + 1, 4));
    chart.id = generate_id();
    chart
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Applies `command` to `chart`, returning the next snapshot.
pub fn apply(chart: &Chart, command: ChartCommand) -> Result<Chart, EditError> {
    let mut next = chart.clone();
    match command {
        ChartCommand::SetTitle(title) => {
            next.title = title.trim().to_string();
        }
        ChartCommand::SetRange { start, end } => {
            check_quarter(start)?;
            check_quarter(end)?;
            next.start_year = start.year;
            next.start_quarter = start.quarter;
            next.end_year = end.year;
            next.end_quarter = end.quarter;
        }
        ChartCommand::AddCategory { name, color } => {
            next.categories.push(Category {
                id: generate_id(),
                name: required(name, EditError::EmptyCategoryName)?,
                color,
                tasks: Vec::new(),
            });
        }
        ChartCommand::UpdateCategory { id, name, color } => {
            let name = required(name, EditError::EmptyCategoryName)?;
            let category = find_category(&mut next, &id)?;
            category.name = name;
            category.color = color;
        }
        ChartCommand::DeleteCategory { id } => {
            let before = next.categories.len();
            next.categories.retain(|cat| cat.id != id);
            if next.categories.len() == before {
                return Err(EditError::UnknownCategory(id));
            }
        }
        ChartCommand::AddTask { category, draft } => {
            let task = draft_into_task(generate_id(), draft)?;
            find_category(&mut next, &category)?.tasks.push(task);
        }
        ChartCommand::UpdateTask {
            category,
            id,
            draft,
        } => {
            let updated = draft_into_task(id.clone(), draft)?;
            let cat = find_category(&mut next, &category)?;
            let slot = cat
                .tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| EditError::UnknownTask {
                    category: category.clone(),
                    task: id.clone(),
                })?;
            *slot = updated;
        }
        ChartCommand::DeleteTask { category, id } => {
            let cat = find_category(&mut next, &category)?;
            let before = cat.tasks.len();
            cat.tasks.retain(|task| task.id != id);
            if cat.tasks.len() == before {
                return Err(EditError::UnknownTask { category, task: id });
            }
        }
    }
    Ok(next)
}

fn find_category<'a>(chart: &'a mut Chart, id: &str) -> Result<&'a mut Category, EditError> {
    chart
        .categories
        .iter_mut()
        .find(|cat| cat.id == id)
        .ok_or_else(|| EditError::UnknownCategory(id.to_string()))
}

fn draft_into_task(id: String, draft: TaskDraft) -> Result<Task, EditError> {
    check_quarter(draft.start)?;
    check_quarter(draft.end)?;
    Ok(Task {
        id,
        title: required(draft.title, EditError::EmptyTaskTitle)?,
        description: draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        start_year: draft.start.year,
        start_quarter: draft.start.quarter,
        end_year: draft.end.year,
        end_quarter: draft.end.quarter,
        color: draft
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
    })
}

fn required(value: String, err: EditError) -> Result<String, EditError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

fn check_quarter(quarter: Quarter) -> Result<(), EditError> {
    if (1..=4).contains(&quarter.quarter) {
        Ok(())
    } else {
        Err(EditError::InvalidQuarter(quarter.quarter))
    }
}
