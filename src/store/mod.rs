//! Append-only CSV log of readings.
//!
//! The file always starts with the `timestamp,temperature,humidity` header.
//! Rows are appended oldest-first and only ever removed all at once by
//! [`LogStore::clear`].

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{error, info};

use crate::{error::StationError, models::Reading};

mod rows;

pub use rows::HEADER;

#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header if it does not exist yet or is
    /// empty. Files with content are left untouched.
    pub fn initialize(&self) -> Result<()> {
        if let Ok(metadata) = fs::metadata(&self.path) {
            if metadata.len() > 0 {
                return Ok(());
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory {}", parent.display())
            })?;
        }

        self.write_header()
            .with_context(|| format!("failed to create log {}", self.path.display()))?;
        info!("Created reading log at {}", self.path.display());
        Ok(())
    }

    pub fn append(&self, reading: &Reading) -> Result<(), StationError> {
        self.try_append(reading).map_err(|err| {
            error!("Log write error: {err:#}");
            StationError::LogWrite("Failed to write log".into())
        })
    }

    /// All rows, most recently appended first.
    pub fn read_all(&self) -> Result<Vec<Reading>, StationError> {
        self.try_read_all()
            .map(|mut rows| {
                rows.reverse();
                rows
            })
            .map_err(|err| {
                error!("Log read error: {err:#}");
                StationError::LogRead("Failed to read log".into())
            })
    }

    /// Rewrites the file with only the header.
    pub fn clear(&self) -> Result<(), StationError> {
        self.write_header()
            .with_context(|| format!("failed to rewrite {}", self.path.display()))
            .map_err(|err| {
                error!("Log clear error: {err:#}");
                StationError::LogClear("Failed to clear log".into())
            })
    }

    fn try_append(&self, reading: &Reading) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        // Restore the header if the file vanished or was truncated behind our back.
        let mut line = String::new();
        if file.metadata()?.len() == 0 {
            line.push_str(HEADER);
            line.push('\n');
        }
        line.push_str(&rows::encode(reading));

        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        file.flush()?;
        Ok(())
    }

    fn try_read_all(&self) -> Result<Vec<Reading>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        rows::decode_all(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn write_header(&self) -> std::io::Result<()> {
        fs::write(&self.path, format!("{HEADER}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (LogStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("envwatch-log-{}", uuid::Uuid::new_v4()));
        (LogStore::new(dir.join("log.csv")), dir)
    }

    #[test]
    fn initialize_writes_header_once() {
        let (store, dir) = temp_store();
        store.initialize().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), format!("{HEADER}\n"));

        store
            .append(&Reading::new("2024-05-01 14:03:22", 22.3, 55.7))
            .unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn initialize_repairs_empty_file() {
        let (store, dir) = temp_store();
        fs::create_dir_all(&dir).unwrap();
        fs::write(store.path(), "").unwrap();

        store.initialize().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), format!("{HEADER}\n"));
        assert!(store.read_all().unwrap().is_empty());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_file_reads_as_no_rows() {
        let (store, dir) = temp_store();
        fs::create_dir_all(&dir).unwrap();
        fs::write(store.path(), "").unwrap();

        assert_eq!(store.read_all(), Ok(Vec::new()));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn read_all_returns_newest_first() {
        let (store, dir) = temp_store();
        store.initialize().unwrap();

        let readings = [
            Reading::new("2024-05-01 14:00:00", 20.0, 45.0),
            Reading::new("2024-05-01 14:01:00", 21.5, 46.2),
            Reading::new("2024-05-01 14:02:00", 30.0, 55.0),
        ];
        for reading in &readings {
            store.append(reading).unwrap();
        }

        let rows = store.read_all().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], readings[2]);
        assert_eq!(rows[1], readings[1]);
        assert_eq!(rows[2], readings[0]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn clear_keeps_header_and_allows_appends() {
        let (store, dir) = temp_store();
        store.initialize().unwrap();
        store
            .append(&Reading::new("2024-05-01 14:00:00", 20.0, 45.0))
            .unwrap();

        store.clear().unwrap();
        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), format!("{HEADER}\n"));

        let fresh = Reading::new("2024-05-01 15:00:00", 19.9, 41.0);
        store.append(&fresh).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![fresh]);
        assert!(fs::read_to_string(store.path())
            .unwrap()
            .starts_with(HEADER));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn append_to_missing_file_restores_header() {
        let (store, dir) = temp_store();
        fs::create_dir_all(&dir).unwrap();

        let reading = Reading::new("2024-05-01 14:00:00", 20.0, 45.0);
        store.append(&reading).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            format!("{HEADER}\n2024-05-01 14:00:00,20.0,45.0\n")
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failures_map_to_store_errors() {
        let (store, dir) = temp_store();

        // Parent directory does not exist, so nothing can be opened.
        assert_eq!(
            store.read_all(),
            Err(StationError::LogRead("Failed to read log".into()))
        );
        assert_eq!(
            store.clear(),
            Err(StationError::LogClear("Failed to clear log".into()))
        );
        assert_eq!(
            store.append(&Reading::new("2024-05-01 14:00:00", 20.0, 45.0)),
            Err(StationError::LogWrite("Failed to write log".into()))
        );

        assert!(!dir.exists());
    }

    #[test]
    fn corrupt_row_fails_read() {
        let (store, dir) = temp_store();
        store.initialize().unwrap();
        fs::write(store.path(), format!("{HEADER}\nnot,a,row\n")).unwrap();
        assert!(matches!(store.read_all(), Err(StationError::LogRead(_))));
        fs::remove_dir_all(dir).unwrap();
    }
}
