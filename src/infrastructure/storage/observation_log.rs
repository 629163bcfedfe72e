use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::shared::errors::StoreError;
use crate::shared::types::Observation;
use super::{csv_error, io_error};

const HEADER: [&str; 4] = ["timestamp", "name", "url", "price"];

/// Append-only CSV log of every observation
#[derive(Debug, Clone)]
pub struct ObservationLog {
    path: PathBuf,
}

impl ObservationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, creating the file with its header on first use.
    /// An absent price is written as an empty field.
    pub fn append(&self, observation: &Observation) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, e))?;

        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(HEADER).map_err(|e| csv_error(&self.path, e))?;
        }

        let price = observation.price.map(|p| p.to_string()).unwrap_or_default();
        writer
            .write_record([
                observation.timestamp_rfc3339().as_str(),
                observation.name.as_str(),
                observation.url.as_str(),
                price.as_str(),
            ])
            .map_err(|e| csv_error(&self.path, e))?;
        writer.flush().map_err(|e| io_error(&self.path, e))
    }
}
