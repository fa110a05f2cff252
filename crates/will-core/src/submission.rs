//! Final hand-off of a paid-for will to storage and document delivery.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use will_domain::{FormState, WillRecord, WillStatus};

use crate::{
    catalog::Catalog,
    persistence::{IdentityProvider, ProgressStore, UserIdentity, WillRecordStore},
    review::ReviewSummary,
    CoreError,
};

/// External payment-success signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub confirmed: bool,
    pub reference: String,
}

impl PaymentConfirmation {
    pub fn confirmed(reference: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            reference: reference.into(),
        }
    }
}

/// Opaque referrer attribution code. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces the will document and delivers it to the testator.
pub trait DocumentDispatcher: Send + Sync {
    fn dispatch(&self, record: &WillRecord, recipient: &UserIdentity) -> Result<(), CoreError>;
}

/// The external systems the wizard talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub progress: &'a dyn ProgressStore,
    pub records: &'a dyn WillRecordStore,
    pub identity: &'a dyn IdentityProvider,
    pub dispatcher: &'a dyn DocumentDispatcher,
}

#[derive(Debug, Clone)]
pub struct SubmissionRequest<'f> {
    pub form: &'f FormState,
    /// Set when the will being finalized was opened from a stored record.
    pub record_id: Option<Uuid>,
    pub payment: PaymentConfirmation,
    pub referral: Option<ReferralCode>,
}

pub struct SubmissionService;

impl SubmissionService {
    /// Stores the will as paid, dispatches the document, marks it completed
    /// and clears the local snapshot. The form is only ever borrowed, so a
    /// failure at any point leaves it as it was. Once the paid record exists,
    /// failures come back as [`CoreError::SubmissionInterrupted`] naming it;
    /// retrying with that id updates the same record.
    pub fn finalize(
        request: SubmissionRequest<'_>,
        catalog: &Catalog,
        collaborators: &Collaborators<'_>,
    ) -> Result<WillRecord, CoreError> {
        if !request.payment.confirmed {
            return Err(CoreError::PaymentNotConfirmed);
        }
        let identity = collaborators
            .identity
            .current_identity()
            .ok_or(CoreError::Unauthenticated)?;

        let summary = ReviewSummary::build(request.form, catalog);
        if !summary.is_complete() {
            return Err(CoreError::IncompleteWill(summary.outstanding()));
        }

        let mut record = match request.record_id {
            Some(id) => {
                let mut record = collaborators.records.load_record(id)?;
                if !record.is_owned_by(&identity.id) {
                    warn!(record = %id, user = %identity.id, "submission for foreign record");
                    return Err(CoreError::OwnershipMismatch {
                        record: id,
                        owner: record.user_id,
                    });
                }
                record.apply_form(request.form);
                record
            }
            None => WillRecord::from_form(Uuid::new_v4(), identity.id.clone(), request.form),
        };
        record.status = WillStatus::Paid;
        record.referral_code = request.referral.map(ReferralCode::into_inner);
        collaborators.records.save_record(&record).map_err(|err| {
            warn!(record = %record.id, error = %err, "saving paid will failed");
            err
        })?;
        info!(record = %record.id, payment = %request.payment.reference, "will paid");

        if let Err(err) = collaborators.dispatcher.dispatch(&record, &identity) {
            warn!(record = %record.id, error = %err, "document dispatch failed");
            return Err(interrupted(&record, err));
        }

        record.status = WillStatus::Completed;
        record.updated_at = chrono::Utc::now();
        if let Err(err) = collaborators.records.save_record(&record) {
            warn!(record = %record.id, error = %err, "marking will completed failed");
            return Err(interrupted(&record, err));
        }
        info!(record = %record.id, "will completed");

        if let Err(err) = collaborators.progress.clear() {
            warn!(error = %err, "could not clear saved progress");
        }
        Ok(record)
    }
}

fn interrupted(record: &WillRecord, err: CoreError) -> CoreError {
    CoreError::SubmissionInterrupted {
        record: record.id,
        reason: err.to_string(),
    }
}
