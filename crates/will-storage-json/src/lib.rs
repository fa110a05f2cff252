//! will-storage-json
//!
//! Filesystem JSON implementations of the wizard's collaborators: the local
//! progress snapshot, the will record store and a document outbox.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;
use will_core::CoreError;

mod outbox;
mod progress;
mod records;

pub use outbox::{render_document, OutboxDispatcher};
pub use progress::JsonProgressStore;
pub use records::{JsonWillRecordStore, RecordBackupInfo};

const JSON_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Directory layout under a data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub progress_root: PathBuf,
    pub records_root: PathBuf,
    pub backup_root: PathBuf,
    pub outbox_root: PathBuf,
}

impl StoragePaths {
    pub fn under(root: &Path) -> Self {
        Self {
            progress_root: root.join("progress"),
            records_root: root.join("records"),
            backup_root: root.join("backups"),
            outbox_root: root.join("outbox"),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    write_atomic(path, &serde_json::to_string_pretty(value)?)
}
