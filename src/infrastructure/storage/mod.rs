//! CSV-backed persistence: price history snapshot and observation log

mod observation_log;
mod price_history;

pub use observation_log::ObservationLog;
pub use price_history::PriceHistoryStore;

use std::path::Path;

use crate::shared::errors::StoreError;

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io { path: path.display().to_string(), source }
}

pub(crate) fn csv_error(path: &Path, source: csv::Error) -> StoreError {
    StoreError::Csv { path: path.display().to_string(), source }
}
