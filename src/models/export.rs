use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::error::StoreResult;
use crate::models::Snapshot;

/// A snapshot rendered as an indented JSON file, ready to be written or
/// offered for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

impl ExportArtifact {
    /// Export named `data_backup_<YYYY-MM-DD>.json` for the given day.
    pub fn from_snapshot(snapshot: &Snapshot, date: NaiveDate) -> StoreResult<Self> {
        Ok(Self {
            file_name: Self::file_name_for(date),
            contents: snapshot.to_pretty_json()?,
        })
    }

    /// Timestamped copy for the backups directory.
    pub fn backup(snapshot: &Snapshot, now: DateTime<Utc>) -> StoreResult<Self> {
        Ok(Self {
            file_name: format!("backup_{}.json", now.format("%Y%m%d_%H%M%S")),
            contents: snapshot.to_pretty_json()?,
        })
    }

    pub fn file_name_for(date: NaiveDate) -> String {
        format!("data_backup_{}.json", date.format("%Y-%m-%d"))
    }

    /// Write the artifact into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> StoreResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        info!(path = %path.display(), "snapshot exported");
        Ok(path)
    }
}

/// Read an import file. Read failures surface as `Io`, malformed content as
/// `Decode`.
pub async fn read_import_file(path: &Path) -> StoreResult<Snapshot> {
    let text = tokio::fs::read_to_string(path).await?;
    Snapshot::from_json(&text)
}

/// JSON files in a backups directory, newest first.
pub fn list_backups(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            backups.push(path);
        }
    }

    // Timestamped names sort chronologically.
    backups.sort();
    backups.reverse();
    Ok(backups)
}
