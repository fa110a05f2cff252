//! Wizard (re)entry: decides where the in-progress will comes from.

use tracing::{info, warn};
use uuid::Uuid;
use will_domain::{FormState, NavigationCursor};

use crate::{
    catalog::Catalog, complexity::ComplexityThresholds, navigation::WizardEngine,
    session::SessionContext, submission::Collaborators, CoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRequest {
    /// Pick up the local snapshot, or start fresh.
    Resume,
    /// Edit a stored will owned by the signed-in user.
    EditRecord(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    Fresh,
    LocalSnapshot,
    RemoteRecord(Uuid),
}

#[derive(Debug, Clone)]
pub struct HydratedWizard {
    pub cursor: NavigationCursor,
    pub form: FormState,
    pub session: SessionContext,
    pub source: HydrationSource,
    /// Non-fatal problems met while hydrating, for display.
    pub warnings: Vec<String>,
}

impl HydratedWizard {
    fn fresh(catalog: &Catalog, warnings: Vec<String>) -> Self {
        Self {
            cursor: catalog.first_cursor().unwrap_or_default(),
            form: FormState::new(),
            session: SessionContext::new(),
            source: HydrationSource::Fresh,
            warnings,
        }
    }

    pub fn record_id(&self) -> Option<Uuid> {
        match self.source {
            HydrationSource::RemoteRecord(id) => Some(id),
            HydrationSource::Fresh | HydrationSource::LocalSnapshot => None,
        }
    }

    pub fn into_engine(
        self,
        catalog: &Catalog,
        thresholds: ComplexityThresholds,
    ) -> WizardEngine<'_> {
        WizardEngine::from_parts(catalog, thresholds, self.cursor, self.form, self.session)
    }
}

pub struct WizardEntry;

impl WizardEntry {
    pub fn open(
        request: EntryRequest,
        catalog: &Catalog,
        collaborators: &Collaborators<'_>,
    ) -> Result<HydratedWizard, CoreError> {
        match request {
            EntryRequest::Resume => Ok(Self::resume(catalog, collaborators)),
            EntryRequest::EditRecord(id) => Self::edit_record(id, catalog, collaborators),
        }
    }

    fn resume(catalog: &Catalog, collaborators: &Collaborators<'_>) -> HydratedWizard {
        let saved = match collaborators.progress.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => return HydratedWizard::fresh(catalog, Vec::new()),
            Err(err) => {
                warn!(error = %err, "saved progress unreadable; starting fresh");
                return HydratedWizard::fresh(
                    catalog,
                    vec![format!("Saved progress could not be read: {}", err)],
                );
            }
        };

        let mut warnings = Vec::new();
        let mut cursor = saved.cursor();
        if !catalog.contains(cursor) {
            warnings.push(format!(
                "Saved position {} no longer exists; starting from the beginning",
                cursor
            ));
            cursor = catalog.first_cursor().unwrap_or_default();
        }
        info!(%cursor, saved_at = %saved.timestamp, "resuming from saved progress");
        HydratedWizard {
            cursor,
            session: saved.session(),
            form: saved.form_data,
            source: HydrationSource::LocalSnapshot,
            warnings,
        }
    }

    fn edit_record(
        id: Uuid,
        catalog: &Catalog,
        collaborators: &Collaborators<'_>,
    ) -> Result<HydratedWizard, CoreError> {
        let identity = collaborators
            .identity
            .current_identity()
            .ok_or(CoreError::Unauthenticated)?;
        let record = collaborators.records.load_record(id)?;
        if !record.is_owned_by(&identity.id) {
            warn!(record = %id, user = %identity.id, "record owner mismatch");
            return Err(CoreError::OwnershipMismatch {
                record: id,
                owner: record.user_id,
            });
        }
        info!(record = %id, "editing stored will");
        Ok(HydratedWizard {
            cursor: catalog.first_cursor().unwrap_or_default(),
            form: record.to_form(),
            session: SessionContext::new(),
            source: HydrationSource::RemoteRecord(id),
            warnings: Vec::new(),
        })
    }
}
