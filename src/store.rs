//! Chart persistence over a single JSON file.

use crate::chart::Chart;
use crate::edit::generate_id;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid chart data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("chart `{0}` not found")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Charts in insertion order, backed by `path`. Mutations stay in memory
/// until [`ChartStore::save`] is called.
#[derive(Debug)]
pub struct ChartStore {
    path: PathBuf,
    charts: Vec<Chart>,
}

impl ChartStore {
    /// Loads the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let charts = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                StoreError::Json {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        log::info!("opened chart store {} ({} charts)", path.display(), charts.len());
        Ok(Self { path, charts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Chart] {
        &self.charts
    }

    pub fn get(&self, id: &str) -> StoreResult<&Chart> {
        self.charts
            .iter()
            .find(|chart| chart.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Adds `chart`, assigning a fresh id when it has none. An existing chart
    /// with the same id is overwritten.
    pub fn create(&mut self, mut chart: Chart) -> &Chart {
        if chart.id.trim().is_empty() {
            chart.id = generate_id();
        }
        let id = chart.id.clone();
        self.upsert(chart);
        log::info!("created chart {id}");
        let idx = self.position(&id).unwrap_or(self.charts.len() - 1);
        &self.charts[idx]
    }

    /// Stores `chart` under `id`, inserting it when no chart has that id.
    pub fn replace(&mut self, id: &str, mut chart: Chart) -> &Chart {
        chart.id = id.to_string();
        self.upsert(chart);
        let idx = self.position(id).unwrap_or(self.charts.len() - 1);
        &self.charts[idx]
    }

    /// Removes the chart with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.charts.len();
        self.charts.retain(|chart| chart.id != id);
        let removed = self.charts.len() != before;
        if removed {
            log::info!("deleted chart {id}");
        }
        removed
    }

    /// Writes every chart to the backing file. The data goes to a sibling
    /// temp file first and is renamed into place.
    pub fn save(&self) -> StoreResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: tmp.clone(),
            source,
        };
        let file = File::create(&tmp).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.charts).map_err(|source| {
            StoreError::Json {
                path: tmp.clone(),
                source,
            }
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        drop(writer);
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("saved {} charts to {}", self.charts.len(), self.path.display());
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.charts.iter().position(|chart| chart.id == id)
    }

    fn upsert(&mut self, chart: Chart) {
        match self.position(&chart.id) {
            Some(idx) => self.charts[idx] = chart,
            None => self.charts.push(chart),
        }
    }
}
