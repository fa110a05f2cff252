use std::fs;

use tempfile::tempdir;
use uuid::Uuid;
use will_core::{
    CoreError, DocumentDispatcher, ProgressStore, SavedProgress, SessionContext, UserIdentity,
    WillRecordStore,
};
use will_domain::{FormState, MainBeneficiary, NavigationCursor, SectionKey, WillRecord, WillStatus};
use will_storage_json::{JsonProgressStore, JsonWillRecordStore, OutboxDispatcher, StoragePaths};

fn sample_form() -> FormState {
    let mut form = FormState::new();
    form.personal.full_name = "Owen Price".into();
    form.personal.address.line1 = "3 Quay Street".into();
    form.personal.address.city = "Cardiff".into();
    form.personal.address.postcode = "CF10 1EP".into();
    form.beneficiaries.main_beneficiary = Some(MainBeneficiary {
        full_name: "Rhian Price".into(),
        relationship: "Wife".into(),
        percentage: Some(60),
    });
    form.beneficiaries.add_gift("Watch", "Dylan Price");
    form
}

#[test]
fn progress_snapshot_round_trips_through_file() {
    let dir = tempdir().expect("tempdir");
    let store = JsonProgressStore::new(dir.path().join("progress")).expect("store");
    assert!(store.load().expect("load").is_none());

    let mut session = SessionContext::new();
    session.acknowledge_complexity();
    let saved = SavedProgress::capture(
        NavigationCursor::new(SectionKey::Beneficiaries, 1),
        &sample_form(),
        &session,
        chrono::Utc::now(),
    );
    store.save(&saved).expect("save");

    assert!(store
        .path()
        .ends_with("myEasyWill_savedProgress.json"));
    let loaded = store.load().expect("load").expect("snapshot present");
    assert_eq!(loaded, saved);

    let raw = fs::read_to_string(store.path()).expect("read");
    assert!(raw.contains("\"formData\""));
    assert!(raw.contains("\"hasAcknowledgedComplexEstate\": true"));

    store.clear().expect("clear");
    assert!(store.load().expect("load").is_none());
}

#[test]
fn corrupt_snapshot_is_a_serialization_error() {
    let dir = tempdir().expect("tempdir");
    let store = JsonProgressStore::new(dir.path().to_path_buf()).expect("store");
    fs::write(store.path(), "{not json").expect("write");
    assert!(matches!(store.load(), Err(CoreError::Serialization(_))));
}

#[test]
fn records_save_load_and_list_by_owner() {
    let dir = tempdir().expect("tempdir");
    let store = JsonWillRecordStore::new(&StoragePaths::under(dir.path())).expect("store");

    let mine = WillRecord::from_form(Uuid::new_v4(), "owen", &sample_form());
    let theirs = WillRecord::from_form(Uuid::new_v4(), "someone", &sample_form());
    store.save_record(&mine).expect("save");
    store.save_record(&theirs).expect("save");

    let loaded = store.load_record(mine.id).expect("load");
    assert_eq!(loaded, mine);
    assert_eq!(loaded.to_form(), sample_form());

    let listed = store.list_records_for("owen").expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    let missing = Uuid::new_v4();
    assert!(matches!(
        store.load_record(missing),
        Err(CoreError::RecordNotFound(id)) if id == missing
    ));
}

#[test]
fn overwriting_a_record_keeps_pruned_backups() {
    let dir = tempdir().expect("tempdir");
    let store =
        JsonWillRecordStore::with_retention(&StoragePaths::under(dir.path()), 2).expect("store");

    let mut record = WillRecord::from_form(Uuid::new_v4(), "owen", &sample_form());
    store.save_record(&record).expect("first save");
    assert!(store.list_backups(record.id).expect("list").is_empty());

    for status in [WillStatus::Paid, WillStatus::Completed] {
        std::thread::sleep(std::time::Duration::from_millis(5));
        record.status = status;
        store.save_record(&record).expect("save");
    }
    std::thread::sleep(std::time::Duration::from_millis(5));
    store.save_record(&record).expect("save");

    let backups = store.list_backups(record.id).expect("list");
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|backup| backup.created_at.is_some()));
    assert!(backups[0].created_at >= backups[1].created_at);

    let oldest: WillRecord =
        serde_json::from_str(&fs::read_to_string(&backups[1].path).expect("read")).expect("json");
    assert_eq!(oldest.status, WillStatus::Paid);
}

#[test]
fn listing_skips_unreadable_records() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let store = JsonWillRecordStore::new(&paths).expect("store");

    let mine = WillRecord::from_form(Uuid::new_v4(), "owen", &sample_form());
    store.save_record(&mine).expect("save");
    fs::write(paths.records_root.join(format!("{}.json", Uuid::new_v4())), "{ truncated")
        .expect("write");

    let listed = store.list_records_for("owen").expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);
}

#[test]
fn outbox_writes_document_and_envelope() {
    let dir = tempdir().expect("tempdir");
    let outbox = OutboxDispatcher::new(dir.path().join("outbox")).expect("outbox");
    let record = WillRecord::from_form(Uuid::new_v4(), "owen", &sample_form());
    let recipient = UserIdentity {
        id: "owen".into(),
        email: "owen@example.com".into(),
        display_name: "Owen Price".into(),
    };

    outbox.dispatch(&record, &recipient).expect("dispatch");

    let document = fs::read_to_string(outbox.document_path(&record)).expect("document");
    assert!(document.starts_with("LAST WILL AND TESTAMENT"));
    assert!(document.contains("I, Owen Price,"));
    assert!(document.contains("60% to Rhian Price (Wife)."));
    assert!(document.contains("I give Watch to Dylan Price."));

    let envelope: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(outbox.envelope_path(&record)).expect("read"))
            .expect("json");
    assert_eq!(envelope["to"], "owen@example.com");
}

#[test]
fn outbox_write_failure_is_a_collaborator_error() {
    let dir = tempdir().expect("tempdir");
    let outbox_dir = dir.path().join("outbox");
    let outbox = OutboxDispatcher::new(outbox_dir.clone()).expect("outbox");
    fs::remove_dir(&outbox_dir).expect("remove");
    fs::write(&outbox_dir, "not a directory").expect("write");

    let record = WillRecord::from_form(Uuid::new_v4(), "owen", &sample_form());
    let recipient = UserIdentity {
        id: "owen".into(),
        email: "owen@example.com".into(),
        display_name: "Owen Price".into(),
    };
    let err = outbox.dispatch(&record, &recipient).unwrap_err();
    match err {
        CoreError::Collaborator(message) => assert!(message.contains("outbox")),
        other => panic!("unexpected error {:?}", other),
    }
}
