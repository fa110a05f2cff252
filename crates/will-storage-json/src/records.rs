use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;
use will_core::{CoreError, WillRecordStore};
use will_domain::WillRecord;

use crate::{write_atomic, StoragePaths, JSON_EXTENSION};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const DEFAULT_RETENTION: usize = 5;

/// A previous version of a record kept before it was overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBackupInfo {
    pub record: Uuid,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

/// One JSON file per will, with rolling backups of earlier versions.
#[derive(Debug, Clone)]
pub struct JsonWillRecordStore {
    records_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonWillRecordStore {
    pub fn new(paths: &StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: &StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.records_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            records_dir: paths.records_root.clone(),
            backups_dir: paths.backup_root.clone(),
            retention: retention.max(1),
        })
    }

    pub fn record_path(&self, id: Uuid) -> PathBuf {
        self.records_dir.join(format!("{}.{}", id, JSON_EXTENSION))
    }

    /// Every stored will owned by `user_id`, most recently updated first.
    /// Unreadable files are logged and left out.
    pub fn list_records_for(&self, user_id: &str) -> Result<Vec<WillRecord>, CoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.records_dir)? {
            let path = entry?.path();
            if !path.is_file() || !has_json_extension(&path) {
                continue;
            }
            match read_record(&path) {
                Ok(record) if record.is_owned_by(user_id) => records.push(record),
                Ok(_) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable record"),
            }
        }
        records.sort_by_key(|record| Reverse(record.updated_at));
        Ok(records)
    }

    /// Newest first.
    pub fn list_backups(&self, id: Uuid) -> Result<Vec<RecordBackupInfo>, CoreError> {
        let dir = self.backup_dir(id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !has_json_extension(&path) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(RecordBackupInfo {
                    record: id,
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    fn backup_dir(&self, id: Uuid) -> PathBuf {
        self.backups_dir.join(id.to_string())
    }

    fn backup_existing(&self, id: Uuid, path: &Path) -> Result<(), CoreError> {
        let dir = self.backup_dir(id);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let backup_path = dir.join(format!("{}_{}.{}", id, timestamp, JSON_EXTENSION));
        fs::copy(path, &backup_path)?;
        self.prune_backups(id)
    }

    fn prune_backups(&self, id: Uuid) -> Result<(), CoreError> {
        for stale in self.list_backups(id)?.into_iter().skip(self.retention) {
            debug!(backup = %stale.id, "pruning record backup");
            let _ = fs::remove_file(stale.path);
        }
        Ok(())
    }
}

impl WillRecordStore for JsonWillRecordStore {
    fn load_record(&self, id: Uuid) -> Result<WillRecord, CoreError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(CoreError::RecordNotFound(id));
        }
        read_record(&path)
    }

    fn save_record(&self, record: &WillRecord) -> Result<(), CoreError> {
        let path = self.record_path(record.id);
        if path.exists() {
            self.backup_existing(record.id, &path)?;
        }
        write_atomic(&path, &serde_json::to_string_pretty(record)?)?;
        debug!(record = %record.id, status = %record.status, "record saved");
        Ok(())
    }
}

fn read_record(path: &Path) -> Result<WillRecord, CoreError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(JSON_EXTENSION)
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", JSON_EXTENSION))?;
    let mut segments = trimmed.rsplitn(3, '_');
    let time = segments.next()?;
    let date = segments.next()?;
    segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S%3f")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_names_parse_back_to_timestamps() {
        let id = Uuid::new_v4();
        let parsed = parse_backup_timestamp(&format!("{}_20240301_093015250.json", id))
            .expect("timestamp");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-03-01 09:30:15.250");
        assert!(parse_backup_timestamp("notes.json").is_none());
    }
}
