use std::{fmt::Write as _, fs, path::PathBuf};

use chrono::Utc;
use serde_json::json;
use tracing::info;
use will_core::{CoreError, DocumentDispatcher, UserIdentity};
use will_domain::WillRecord;

use crate::{write_atomic, write_json, JSON_EXTENSION};

/// Delivers finished wills by writing the document and a delivery envelope
/// to an outbox directory for a mail relay to pick up.
#[derive(Debug, Clone)]
pub struct OutboxDispatcher {
    dir: PathBuf,
}

impl OutboxDispatcher {
    pub fn new(dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn document_path(&self, record: &WillRecord) -> PathBuf {
        self.dir.join(format!("{}.txt", record.id))
    }

    pub fn envelope_path(&self, record: &WillRecord) -> PathBuf {
        self.dir.join(format!("{}.{}", record.id, JSON_EXTENSION))
    }

    fn queue(&self, record: &WillRecord, recipient: &UserIdentity) -> Result<(), CoreError> {
        let document = self.document_path(record);
        write_atomic(&document, &render_document(record))?;
        let envelope = json!({
            "record_id": record.id,
            "to": recipient.email,
            "name": recipient.display_name,
            "document": document.file_name().and_then(|name| name.to_str()),
            "queued_at": Utc::now(),
        });
        write_json(&self.envelope_path(record), &envelope)?;
        info!(record = %record.id, to = %recipient.email, "will document queued");
        Ok(())
    }
}

impl DocumentDispatcher for OutboxDispatcher {
    fn dispatch(&self, record: &WillRecord, recipient: &UserIdentity) -> Result<(), CoreError> {
        self.queue(record, recipient).map_err(|err| {
            CoreError::Collaborator(format!("outbox {}: {}", self.dir.display(), err))
        })
    }
}

/// Plain-text rendition of a will.
pub fn render_document(record: &WillRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LAST WILL AND TESTAMENT");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "I, {}, born {}, of {}, {}, {}, revoke all earlier wills and declare this to be my last will.",
        record.full_name,
        record.date_of_birth.as_deref().unwrap_or("(date of birth not given)"),
        record.address_line1,
        record.city,
        record.postcode,
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "1. Executors");
    if let Some(primary) = &record.primary_executor {
        let _ = writeln!(
            out,
            "   I appoint {} ({}) as my executor.",
            primary.full_name, primary.relationship
        );
    }
    if let Some(backup) = &record.backup_executor {
        let _ = writeln!(
            out,
            "   If they cannot act, I appoint {} ({}).",
            backup.full_name, backup.relationship
        );
    }

    let _ = writeln!(out, "2. Gifts");
    if record.specific_gifts.is_empty() {
        let _ = writeln!(out, "   I make no specific gifts.");
    }
    for gift in &record.specific_gifts {
        let _ = writeln!(out, "   I give {} to {}.", gift.description, gift.recipient);
    }

    let _ = writeln!(out, "3. Residuary estate");
    if let Some(main) = &record.main_beneficiary {
        let _ = writeln!(
            out,
            "   {}% to {} ({}).",
            main.percentage.unwrap_or(0),
            main.full_name,
            main.relationship
        );
    }
    for beneficiary in &record.additional_beneficiaries {
        let _ = writeln!(
            out,
            "   {}% to {} ({}).",
            beneficiary.percentage, beneficiary.full_name, beneficiary.relationship
        );
    }

    if !record.guardian_name.trim().is_empty() {
        let _ = writeln!(out, "4. Guardians");
        let _ = writeln!(
            out,
            "   I appoint {} as guardian of any children under 18.",
            record.guardian_name
        );
    }

    if let Some(preference) = record.funeral_preference {
        let _ = writeln!(out, "Funeral wishes: {}", preference.label());
        if !record.funeral_notes.trim().is_empty() {
            let _ = writeln!(out, "   {}", record.funeral_notes.trim());
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Signed by the testator in the presence of two witnesses, both present at the same time."
    );
    out
}
