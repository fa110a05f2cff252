//! Wizard state machine over the step catalog.
//!
//! The engine owns the cursor, the in-progress [`FormState`] and the
//! session context. Every user action returns a [`Transition`] describing
//! what the front-end should render next; validation failures and allocation
//! corrections are values, not errors.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use will_domain::{FieldId, FieldValue, FormState, NavigationCursor, SectionKey};

use crate::{
    allocation::{AllocationNotice, AllocationTracker, Preset},
    catalog::{Catalog, StepDescriptor, StepId},
    complexity::{ComplexityReason, ComplexityThresholds},
    persistence::{ProgressStore, SavedProgress},
    session::SessionContext,
    validation::{validate_step, StepValidation, ValidationIssue},
    CoreError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The cursor now points at this step.
    Moved(NavigationCursor),
    /// The current step is invalid; the cursor did not move.
    Blocked(StepValidation),
    /// Advance is held until the user continues anyway.
    ComplexityInterstitial(Vec<ComplexityReason>),
    /// The last step was completed.
    ExitToReview,
    /// Retreat from the very first step.
    ExitWizard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    InProgress,
    Review,
    Exited,
}

#[derive(Debug, Clone)]
pub struct WizardEngine<'a> {
    catalog: &'a Catalog,
    thresholds: ComplexityThresholds,
    cursor: NavigationCursor,
    form: FormState,
    session: SessionContext,
    /// Set when the gate held back an advance that had already passed validation.
    interstitial_pending: bool,
    stage: Stage,
}

impl<'a> WizardEngine<'a> {
    pub fn new(catalog: &'a Catalog, thresholds: ComplexityThresholds) -> Self {
        Self::from_parts(
            catalog,
            thresholds,
            NavigationCursor::default(),
            FormState::new(),
            SessionContext::new(),
        )
    }

    /// Rebuilds an engine from hydrated state. A cursor the catalog does not
    /// know resets to the first step.
    pub fn from_parts(
        catalog: &'a Catalog,
        thresholds: ComplexityThresholds,
        cursor: NavigationCursor,
        form: FormState,
        session: SessionContext,
    ) -> Self {
        let cursor = if catalog.contains(cursor) {
            cursor
        } else {
            let fallback = catalog.first_cursor().unwrap_or_default();
            warn!(%cursor, %fallback, "cursor outside catalog; restarting");
            fallback
        };
        Self {
            catalog,
            thresholds,
            cursor,
            form,
            session,
            interstitial_pending: false,
            stage: Stage::InProgress,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn thresholds(&self) -> ComplexityThresholds {
        self.thresholds
    }

    pub fn cursor(&self) -> NavigationCursor {
        self.cursor
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        self.interstitial_pending = false;
        &mut self.form
    }

    pub fn into_form(self) -> FormState {
        self.form
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    pub fn is_interstitial_pending(&self) -> bool {
        self.interstitial_pending
    }

    pub fn current_step(&self) -> Option<&'a StepDescriptor> {
        self.catalog.step(self.cursor)
    }

    pub fn validate_current(&self) -> StepValidation {
        match self.current_step() {
            Some(step) => validate_step(step, &self.form),
            None => StepValidation::valid(),
        }
    }

    pub fn complexity_reasons(&self) -> Vec<ComplexityReason> {
        self.thresholds.reasons(&self.form)
    }

    /// Moves forward once the current step is valid.
    pub fn advance(&mut self) -> Transition {
        if let Some(parked) = self.parked_transition() {
            return parked;
        }
        let validation = self.validate_current();
        if !validation.is_valid() {
            debug!(cursor = %self.cursor, issues = validation.issues().len(), "advance blocked");
            return Transition::Blocked(validation);
        }
        self.proceed()
    }

    /// Clears the current step's fields and moves on as if the step were done.
    pub fn skip(&mut self) -> Transition {
        if let Some(parked) = self.parked_transition() {
            return parked;
        }
        let Some(step) = self.current_step() else {
            return Transition::Moved(self.cursor);
        };
        if step.skip.is_none() {
            return Transition::Blocked(StepValidation::single(ValidationIssue::general(
                format!("\"{}\" cannot be skipped", step.title),
            )));
        }
        for field in &step.fields {
            self.form.clear(field.id);
        }
        debug!(step = ?step.id, "step skipped");
        self.proceed()
    }

    /// "Continue anyway" on the complexity interstitial. Acknowledges for the
    /// rest of the session and resumes the held advance, if any.
    pub fn continue_anyway(&mut self) -> Transition {
        self.session.acknowledge_complexity();
        if self.interstitial_pending {
            self.interstitial_pending = false;
            self.commit()
        } else {
            Transition::Moved(self.cursor)
        }
    }

    /// Leaves the interstitial without acknowledging it.
    pub fn dismiss_interstitial(&mut self) {
        self.interstitial_pending = false;
    }

    pub fn retreat(&mut self) -> Transition {
        self.interstitial_pending = false;
        match self.stage {
            Stage::Exited => return Transition::ExitWizard,
            Stage::Review => {
                self.stage = Stage::InProgress;
                if let Some(last) = self.catalog.last_cursor() {
                    self.cursor = last;
                }
                debug!(cursor = %self.cursor, "back from review");
                return Transition::Moved(self.cursor);
            }
            Stage::InProgress => {}
        }

        let target = if self.cursor.step > 0 {
            Some(NavigationCursor::new(self.cursor.section, self.cursor.step - 1))
        } else {
            self.catalog
                .previous_section(self.cursor.section)
                .map(|previous| {
                    NavigationCursor::new(
                        previous,
                        self.catalog.step_count(previous).saturating_sub(1),
                    )
                })
        };

        match target {
            Some(cursor) => {
                debug!(from = %self.cursor, to = %cursor, "retreat");
                self.cursor = cursor;
                Transition::Moved(cursor)
            }
            None => {
                info!("wizard exited from first step");
                self.stage = Stage::Exited;
                Transition::ExitWizard
            }
        }
    }

    /// Jumps to the first step of a section, e.g. "edit" from the review screen.
    pub fn jump_to(&mut self, section: SectionKey) -> Result<Transition, CoreError> {
        if self.catalog.step_count(section) == 0 {
            return Err(CoreError::UnknownSection(section.to_string()));
        }
        self.cursor = NavigationCursor::section_start(section);
        self.stage = Stage::InProgress;
        self.interstitial_pending = false;
        debug!(cursor = %self.cursor, "jump");
        Ok(Transition::Moved(self.cursor))
    }

    /// Typed field write. The main beneficiary's share goes through the
    /// allocation tracker so it can never push the total past 100%.
    pub fn assign(
        &mut self,
        field: FieldId,
        value: FieldValue,
    ) -> Result<Option<AllocationNotice>, CoreError> {
        self.interstitial_pending = false;
        if let (FieldId::MainBeneficiaryPercentage, FieldValue::Percentage(share)) =
            (field, &value)
        {
            return Ok(AllocationTracker::set_main_percentage(
                &mut self.form.beneficiaries,
                *share,
            ));
        }
        self.form.assign(field, value)?;
        Ok(None)
    }

    pub fn add_beneficiary(
        &mut self,
        full_name: impl Into<String>,
        relationship: impl Into<String>,
    ) -> (Uuid, Option<AllocationNotice>) {
        AllocationTracker::add_beneficiary(&mut self.form.beneficiaries, full_name, relationship)
    }

    pub fn remove_beneficiary(&mut self, id: Uuid) -> Result<(), CoreError> {
        AllocationTracker::remove_beneficiary(&mut self.form.beneficiaries, id).map(|_| ())
    }

    pub fn set_beneficiary_percentage(
        &mut self,
        id: Uuid,
        share: u32,
    ) -> Result<Option<AllocationNotice>, CoreError> {
        AllocationTracker::set_additional_percentage(&mut self.form.beneficiaries, id, share)
    }

    pub fn distribute_remaining(&mut self) -> Option<AllocationNotice> {
        AllocationTracker::distribute_remaining(&mut self.form.beneficiaries)
    }

    pub fn distribute_equally(&mut self) {
        AllocationTracker::distribute_equally(&mut self.form.beneficiaries)
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Option<AllocationNotice> {
        AllocationTracker::apply_preset(&mut self.form.beneficiaries, preset)
    }

    pub fn allocation_total(&self) -> u32 {
        AllocationTracker::total(&self.form.beneficiaries)
    }

    pub fn snapshot(&self) -> SavedProgress {
        SavedProgress::capture(self.cursor, &self.form, &self.session, Utc::now())
    }

    /// Writes the current cursor, form and acknowledgement to the local store.
    pub fn save_progress(&self, store: &dyn ProgressStore) -> Result<SavedProgress, CoreError> {
        let snapshot = self.snapshot();
        store.save(&snapshot)?;
        info!(cursor = %self.cursor, "progress saved");
        Ok(snapshot)
    }

    fn parked_transition(&self) -> Option<Transition> {
        match self.stage {
            Stage::InProgress => None,
            Stage::Review => Some(Transition::ExitToReview),
            Stage::Exited => Some(Transition::ExitWizard),
        }
    }

    fn proceed(&mut self) -> Transition {
        if !self.session.has_acknowledged_complexity() {
            let reasons = self.complexity_reasons();
            if !reasons.is_empty() {
                info!(count = reasons.len(), "complex estate detected");
                self.interstitial_pending = true;
                return Transition::ComplexityInterstitial(reasons);
            }
        }
        self.commit()
    }

    fn commit(&mut self) -> Transition {
        match self.successor(self.cursor) {
            Some(next) => {
                debug!(from = %self.cursor, to = %next, "advance");
                self.cursor = next;
                Transition::Moved(next)
            }
            None => {
                info!("wizard complete; moving to review");
                self.stage = Stage::Review;
                Transition::ExitToReview
            }
        }
    }

    /// Next cursor in catalog order, skipping the complex-assets step for
    /// estates below the threshold.
    fn successor(&self, from: NavigationCursor) -> Option<NavigationCursor> {
        let mut next = self.sequential_successor(from)?;
        while self.bypasses(next) {
            debug!(cursor = %next, "complex assets bypassed");
            next = self.sequential_successor(next)?;
        }
        Some(next)
    }

    fn sequential_successor(&self, from: NavigationCursor) -> Option<NavigationCursor> {
        if from.step + 1 < self.catalog.step_count(from.section) {
            return Some(NavigationCursor::new(from.section, from.step + 1));
        }
        self.catalog
            .next_section(from.section)
            .map(NavigationCursor::section_start)
    }

    fn bypasses(&self, cursor: NavigationCursor) -> bool {
        matches!(self.catalog.step(cursor), Some(step) if step.id == StepId::ComplexAssets)
            && self.thresholds.skips_complex_assets(&self.form)
    }
}
