mod common;

use std::sync::atomic::{AtomicBool, Ordering};

use common::{complete_form, engine_at, TestEnv};
use mywill::cli::{ScriptInput, WizardOutcome, WizardShell};
use mywill::core::{
    Catalog, Collaborators, CoreError, DocumentDispatcher, ProgressStore, ReferralCode, StepId,
    UserIdentity, WillRecordStore,
};
use mywill::domain::{FormState, WillRecord, WillStatus};
use mywill::storage::OutboxDispatcher;

/// Fails the first delivery, then hands over to the real outbox.
struct FlakyDispatcher<'a> {
    outbox: &'a OutboxDispatcher,
    failed: AtomicBool,
}

impl DocumentDispatcher for FlakyDispatcher<'_> {
    fn dispatch(&self, record: &WillRecord, recipient: &UserIdentity) -> Result<(), CoreError> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(CoreError::Collaborator("mail relay offline".into()));
        }
        self.outbox.dispatch(record, recipient)
    }
}

fn shell<'a>(
    env: &'a TestEnv,
    step: StepId,
    form: FormState,
    script: &'static str,
) -> WizardShell<'a> {
    WizardShell::new(
        engine_at(step, form),
        Box::new(ScriptInput::new(script.as_bytes())),
        env.collaborators(),
    )
}

#[test]
fn list_entries_and_preset_balance_the_estate() {
    let env = TestEnv::new();
    let mut form = complete_form();
    form.beneficiaries.main_mut().percentage = None;
    let mut shell = shell(
        &env,
        StepId::AdditionalBeneficiaries,
        form,
        "Ann Lee, Sister\nBob Lee, Brother\n:preset 33/33/33\n\n:quit\n",
    );

    let outcome = shell.run().expect("run");
    assert!(matches!(outcome, WizardOutcome::Exited));

    let engine = shell.engine();
    let beneficiaries = &engine.form().beneficiaries;
    let shares: Vec<u32> = beneficiaries
        .additional_beneficiaries
        .iter()
        .map(|beneficiary| beneficiary.percentage)
        .collect();
    assert_eq!(beneficiaries.main_percentage(), 34);
    assert_eq!(shares, vec![33, 33]);
    assert_eq!(
        Some(engine.cursor()),
        Catalog::standard().locate(StepId::SpecificGifts)
    );
}

#[test]
fn unbalanced_shares_keep_the_step_open() {
    let env = TestEnv::new();
    let mut form = complete_form();
    form.beneficiaries.main_mut().percentage = None;
    let mut shell = shell(
        &env,
        StepId::AdditionalBeneficiaries,
        form,
        "Ann Lee, Sister\n:share 1 20\n\n:quit\n",
    );

    shell.run().expect("run");

    let engine = shell.engine();
    assert_eq!(engine.allocation_total(), 70);
    assert_eq!(
        Some(engine.cursor()),
        Catalog::standard().locate(StepId::AdditionalBeneficiaries)
    );
}

#[test]
fn complex_estate_waits_for_acknowledgement() {
    let env = TestEnv::new();
    let mut shell = shell(
        &env,
        StepId::EstateValue,
        complete_form(),
        "1500000\nno\n:continue\n\n:quit\n",
    );

    shell.run().expect("run");

    let engine = shell.engine();
    assert!(engine.session().has_acknowledged_complexity());
    assert_eq!(
        Some(engine.cursor()),
        Catalog::standard().locate(StepId::ComplexAssets)
    );
}

#[test]
fn submitting_from_review_completes_the_will() {
    let env = TestEnv::new();
    let shell_engine = engine_at(StepId::Witnessing, complete_form());
    shell_engine
        .save_progress(&env.progress)
        .expect("save snapshot");
    let mut shell = WizardShell::new(
        shell_engine,
        Box::new(ScriptInput::new("\n:submit PAY-9\n".as_bytes())),
        env.collaborators(),
    )
    .with_referral(Some(ReferralCode::new("SPRING")));

    let WizardOutcome::Submitted(record) = shell.run().expect("run") else {
        panic!("expected a submission");
    };

    assert_eq!(record.status, WillStatus::Completed);
    assert_eq!(record.referral_code.as_deref(), Some("SPRING"));
    let stored = env.records.load_record(record.id).expect("stored record");
    assert_eq!(stored.status, WillStatus::Completed);
    assert!(env.progress.load().expect("load").is_none());
    assert!(env
        .paths
        .outbox_root
        .join(format!("{}.txt", record.id))
        .exists());
}

#[test]
fn retried_submission_reuses_the_paid_record() {
    let env = TestEnv::new();
    let flaky = FlakyDispatcher {
        outbox: &env.dispatcher,
        failed: AtomicBool::new(false),
    };
    let collaborators = Collaborators {
        dispatcher: &flaky,
        ..env.collaborators()
    };
    let mut shell = WizardShell::new(
        engine_at(StepId::Witnessing, complete_form()),
        Box::new(ScriptInput::new("\n:submit PAY-9\n:submit PAY-9\n".as_bytes())),
        collaborators,
    );

    let WizardOutcome::Submitted(record) = shell.run().expect("run") else {
        panic!("expected the retry to submit");
    };

    let stored = env.records.list_records_for("user-1").expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, record.id);
    assert_eq!(stored[0].status, WillStatus::Completed);
}

#[test]
fn incomplete_will_stays_on_review() {
    let env = TestEnv::new();
    let mut form = complete_form();
    form.legal.free_will = false;
    let mut shell = shell(
        &env,
        StepId::Witnessing,
        form,
        "\n:submit PAY-1\n:quit\n",
    );

    let outcome = shell.run().expect("run");

    assert!(matches!(outcome, WizardOutcome::Exited));
    assert!(env
        .records
        .list_records_for("user-1")
        .expect("list")
        .is_empty());
}
