#![allow(dead_code)]

use tempfile::TempDir;

use mywill::cli::identity::EnvIdentity;
use mywill::core::{Catalog, Collaborators, ComplexityThresholds, StepId, UserIdentity, WizardEngine};
use mywill::domain::{
    Address, DateParts, ExecutorDetails, FormState, FuneralPreference, MainBeneficiary,
    MaritalStatus,
};
use mywill::storage::{JsonProgressStore, JsonWillRecordStore, OutboxDispatcher, StoragePaths};

/// JSON-backed collaborators rooted in a temp directory that lives as long
/// as the environment.
pub struct TestEnv {
    pub dir: TempDir,
    pub paths: StoragePaths,
    pub progress: JsonProgressStore,
    pub records: JsonWillRecordStore,
    pub dispatcher: OutboxDispatcher,
    pub identity: EnvIdentity,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let paths = StoragePaths::under(dir.path());
        let progress = JsonProgressStore::new(paths.progress_root.clone()).expect("progress store");
        let records = JsonWillRecordStore::new(&paths).expect("record store");
        let dispatcher = OutboxDispatcher::new(paths.outbox_root.clone()).expect("outbox");
        let identity = EnvIdentity::signed_in(UserIdentity {
            id: "user-1".into(),
            email: "margaret@example.com".into(),
            display_name: "Margaret".into(),
        });
        Self {
            dir,
            paths,
            progress,
            records,
            dispatcher,
            identity,
        }
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            progress: &self.progress,
            records: &self.records,
            identity: &self.identity,
            dispatcher: &self.dispatcher,
        }
    }
}

pub fn complete_form() -> FormState {
    let mut form = FormState::new();
    form.personal.full_name = "Margaret Anne Smith".into();
    form.personal.date_of_birth = DateParts::new(14, 6, 1961);
    form.personal.address = Address {
        line1: "12 Orchard Lane".into(),
        line2: String::new(),
        city: "York".into(),
        postcode: "YO1 7HH".into(),
    };
    form.personal.marital_status = Some(MaritalStatus::Widowed);
    form.personal.has_children = Some(false);
    form.estate.owns_property = Some(true);
    form.estate.estate_value = "£250,000".into();
    form.executors.primary_executor = Some(ExecutorDetails {
        full_name: "Peter Smith".into(),
        relationship: "Brother".into(),
        email: String::new(),
    });
    form.beneficiaries.main_beneficiary = Some(MainBeneficiary {
        full_name: "Jane Smith".into(),
        relationship: "Niece".into(),
        percentage: Some(100),
    });
    form.wishes.funeral_preference = Some(FuneralPreference::Cremation);
    form.legal.sound_mind = true;
    form.legal.free_will = true;
    form.legal.understands_witnessing = true;
    form
}

pub fn engine_at(step: StepId, form: FormState) -> WizardEngine<'static> {
    let catalog = Catalog::standard();
    let cursor = catalog.locate(step).expect("step in catalog");
    WizardEngine::from_parts(
        catalog,
        ComplexityThresholds::default(),
        cursor,
        form,
        Default::default(),
    )
}
