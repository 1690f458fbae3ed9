use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A saved timeline: an ordered list of categories laid out over a range of
/// fiscal quarters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start_year: i32,
    pub start_quarter: u8,
    pub end_year: i32,
    pub end_quarter: u8,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_year: i32,
    pub start_quarter: u8,
    pub end_year: i32,
    pub end_quarter: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u8,
}

impl Chart {
    pub fn new(title: impl Into<String>, start: Quarter, end: Quarter) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            start_year: start.year,
            start_quarter: start.quarter,
            end_year: end.year,
            end_quarter: end.quarter,
            categories: Vec::new(),
        }
    }

    pub fn start(&self) -> Quarter {
        Quarter::new(self.start_year, self.start_quarter)
    }

    pub fn end(&self) -> Quarter {
        Quarter::new(self.end_year, self.end_quarter)
    }

    pub fn task_count(&self) -> usize {
        self.categories.iter().map(|cat| cat.tasks.len()).sum()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.id == id)
    }
}

impl Task {
    pub fn start(&self) -> Quarter {
        Quarter::new(self.start_year, self.start_quarter)
    }

    pub fn end(&self) -> Quarter {
        Quarter::new(self.end_year, self.end_quarter)
    }

    /// Description text, treating an empty string the same as no description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Bar color: the task's own override when set, else the owning category's.
    pub fn effective_color<'a>(&'a self, category_color: &'a str) -> &'a str {
        self.color
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(category_color)
    }
}

impl Quarter {
    pub const fn new(year: i32, quarter: u8) -> Self {
        Self { year, quarter }
    }

    /// The quarter immediately after this one (Q4 rolls over to Q1 of the next year).
    pub fn next(self) -> Self {
        if self.quarter >= 4 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.quarter + 1)
        }
    }

    /// Quarter containing the given calendar month (1-12).
    pub fn from_month(year: i32, month: u32) -> Self {
        let month = month.clamp(1, 12);
        Self::new(year, month.div_ceil(3) as u8)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid quarter `{0}`, expected e.g. `2024-Q3` or `Q3 2024`")]
pub struct ParseQuarterError(String);

/// Accepts `2024-Q3`, `2024Q3`, `Q3 2024` and `Q3-2024` (case-insensitive).
impl FromStr for Quarter {
    type Err = ParseQuarterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQuarterError(s.to_string());
        let normalized = s.trim().to_ascii_uppercase();
        let (year, quarter) = match normalized.strip_prefix('Q') {
            Some(rest) => {
                let (q, y) = rest.split_once([' ', '-']).ok_or_else(err)?;
                (y.trim(), q.trim())
            }
            None => {
                let (y, q) = normalized.split_once('Q').ok_or_else(err)?;
                (y.trim_end_matches(['-', ' ']), q)
            }
        };
        let year = year.parse::<i32>().map_err(|_| err())?;
        let quarter = quarter.parse::<u8>().map_err(|_| err())?;
        if !(1..=4).contains(&quarter) {
            return Err(err());
        }
        Ok(Self::new(year, quarter))
    }
}
