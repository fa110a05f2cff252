//! Durable snapshot envelope and the collaborator contracts the wizard
//! reads from and writes to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use will_domain::{FormState, NavigationCursor, SectionKey, WillRecord};

use crate::{session::SessionContext, CoreError};

/// Key under which the local snapshot is stored.
pub const PROGRESS_STORAGE_KEY: &str = "myEasyWill_savedProgress";

/// Saved wizard progress as written to the local store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    pub step: usize,
    pub section: SectionKey,
    pub form_data: FormState,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub has_acknowledged_complex_estate: bool,
}

impl SavedProgress {
    pub fn capture(
        cursor: NavigationCursor,
        form: &FormState,
        session: &SessionContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            step: cursor.step,
            section: cursor.section,
            form_data: form.clone(),
            timestamp,
            has_acknowledged_complex_estate: session.has_acknowledged_complexity(),
        }
    }

    pub fn cursor(&self) -> NavigationCursor {
        NavigationCursor::new(self.section, self.step)
    }

    pub fn session(&self) -> SessionContext {
        SessionContext::with_acknowledgement(self.has_acknowledged_complex_estate)
    }
}

/// Local durable cache holding at most one snapshot.
pub trait ProgressStore: Send + Sync {
    fn load(&self) -> Result<Option<SavedProgress>, CoreError>;
    fn save(&self, progress: &SavedProgress) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// Remote record storage keyed by will id.
pub trait WillRecordStore: Send + Sync {
    /// Fails with [`CoreError::RecordNotFound`] for unknown ids.
    fn load_record(&self, id: Uuid) -> Result<WillRecord, CoreError>;
    fn save_record(&self, record: &WillRecord) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// Resolved authentication state. `None` means signed out.
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Option<UserIdentity>;
}
