use rust_decimal::Decimal;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::shared::errors::StoreError;
use crate::shared::types::PriceHistory;
use super::{csv_error, io_error};

const HEADER: [&str; 2] = ["name", "price"];

/// Last known price per product, persisted as a `name,price` CSV snapshot
#[derive(Debug, Clone)]
pub struct PriceHistoryStore {
    path: PathBuf,
}

impl PriceHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file is an empty history; rows that do
    /// not parse are skipped one by one.
    pub fn load(&self) -> Result<PriceHistory, StoreError> {
        let mut history = PriceHistory::new();
        if !self.path.exists() {
            debug!("no price history at {}, starting empty", self.path.display());
            return Ok(history);
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| csv_error(&self.path, e))?;

        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(csv_error(&self.path, e));
                }
                Err(e) => {
                    warn!("skipping unreadable history row {}: {}", index + 1, e);
                    continue;
                }
            };
            let (Some(name), Some(price)) = (record.get(0), record.get(1)) else {
                warn!("skipping short history row {}", index + 1);
                continue;
            };
            match Decimal::from_str(price.trim()) {
                Ok(price) => {
                    history.insert(name.to_string(), price);
                }
                Err(_) => warn!("skipping history row {} with price {:?}", index + 1, price),
            }
        }

        Ok(history)
    }

    /// Replace the snapshot wholesale. Written to a sibling file first and
    /// renamed over the old one, so readers never see a half-written file.
    pub fn save(&self, history: &PriceHistory) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let staging = self.staging_path();
        {
            let file = File::create(&staging).map_err(|e| io_error(&staging, e))?;
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(HEADER).map_err(|e| csv_error(&staging, e))?;
            for (name, price) in history {
                writer
                    .write_record([name.as_str(), price.to_string().as_str()])
                    .map_err(|e| csv_error(&staging, e))?;
            }
            writer.flush().map_err(|e| io_error(&staging, e))?;
        }

        fs::rename(&staging, &self.path).map_err(|e| io_error(&self.path, e))?;
        debug!("saved {} prices to {}", history.len(), self.path.display());
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_temp_store() -> (TempDir, PriceHistoryStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = PriceHistoryStore::new(temp_dir.path().join("AmazonLastPrices.csv"));
        (temp_dir, store)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_temp_dir, store) = create_temp_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_temp_dir, store) = create_temp_store();
        let mut history = PriceHistory::new();
        history.insert("karcher k2".to_string(), dec("1999.50"));
        history.insert("Pulidora, Orbital \"Trupper\"".to_string(), dec("1899"));

        store.save(&history).unwrap();
        assert_eq!(store.load().unwrap(), history);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let (_temp_dir, store) = create_temp_store();
        let mut first = PriceHistory::new();
        first.insert("a".to_string(), dec("1"));
        first.insert("b".to_string(), dec("2"));
        store.save(&first).unwrap();

        let mut second = PriceHistory::new();
        second.insert("b".to_string(), dec("3"));
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_header_written() {
        let (_temp_dir, store) = create_temp_store();
        let mut history = PriceHistory::new();
        history.insert("a".to_string(), dec("10.5"));
        store.save(&history).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "name,price\na,10.5\n");
    }

    #[test]
    fn test_malformed_rows_skipped_individually() {
        let (_temp_dir, store) = create_temp_store();
        fs::write(
            store.path(),
            "name,price\ngood,100.25\nbad,not-a-number\nempty,\nshort\nalso good,7\n",
        )
        .unwrap();

        let history = store.load().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history["good"], dec("100.25"));
        assert_eq!(history["also good"], dec("7"));
    }
}
