use std::{fs, path::PathBuf};

use tracing::debug;
use will_core::{CoreError, ProgressStore, SavedProgress, PROGRESS_STORAGE_KEY};

use crate::{write_json, JSON_EXTENSION};

/// Single-slot snapshot file named after the storage key.
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            path: root.join(format!("{}.{}", PROGRESS_STORAGE_KEY, JSON_EXTENSION)),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> Result<Option<SavedProgress>, CoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, progress: &SavedProgress) -> Result<(), CoreError> {
        write_json(&self.path, progress)?;
        debug!(path = %self.path.display(), "progress snapshot written");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
