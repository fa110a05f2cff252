//! will-core
//!
//! Wizard logic for drafting a will: the step catalog, validation,
//! navigation state machine, beneficiary allocation policy, progress
//! persistence contracts and submission flow.
//! Depends on will-domain. No CLI, no terminal I/O, no direct storage.

pub mod allocation;
pub mod catalog;
pub mod complexity;
pub mod entry;
pub mod error;
pub mod navigation;
pub mod persistence;
pub mod review;
pub mod session;
pub mod submission;
pub mod validation;

pub use allocation::{AllocationNotice, AllocationTracker, NoticeLevel, Preset};
pub use catalog::{
    Catalog, FieldDescriptor, FieldKind, SectionDescriptor, SelectOption, SkipAffordance,
    StepDescriptor, StepId,
};
pub use complexity::{ComplexityReason, ComplexityThresholds};
pub use entry::{EntryRequest, HydratedWizard, HydrationSource, WizardEntry};
pub use error::CoreError;
pub use navigation::{Stage, Transition, WizardEngine};
pub use persistence::{
    IdentityProvider, ProgressStore, SavedProgress, UserIdentity, WillRecordStore,
    PROGRESS_STORAGE_KEY,
};
pub use review::{PendingStep, ReviewSummary, SectionReview};
pub use session::SessionContext;
pub use submission::{
    Collaborators, DocumentDispatcher, PaymentConfirmation, ReferralCode, SubmissionRequest,
    SubmissionService,
};
pub use validation::{validate_step, StepValidation, ValidationIssue};
