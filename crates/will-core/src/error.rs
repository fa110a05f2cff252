use thiserror::Error;
use uuid::Uuid;
use will_domain::AssignError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Will record not found: {0}")]
    RecordNotFound(Uuid),
    #[error("No signed-in user")]
    Unauthenticated,
    #[error("Will record {record} does not belong to the signed-in user")]
    OwnershipMismatch { record: Uuid, owner: String },
    #[error("Payment has not been confirmed")]
    PaymentNotConfirmed,
    #[error("Will is incomplete: {}", .0.join("; "))]
    IncompleteWill(Vec<String>),
    #[error("Beneficiary not found: {0}")]
    BeneficiaryNotFound(Uuid),
    #[error("Invalid field value: {0}")]
    InvalidField(#[from] AssignError),
    #[error("Unknown section: {0}")]
    UnknownSection(String),
    #[error("Collaborator failure: {0}")]
    Collaborator(String),
    #[error("Will {record} is paid but submission did not finish: {reason}")]
    SubmissionInterrupted { record: Uuid, reason: String },
}

impl CoreError {
    /// The stored will a failed submission left behind, to be reused on retry.
    pub fn stored_record(&self) -> Option<Uuid> {
        match self {
            CoreError::SubmissionInterrupted { record, .. } => Some(*record),
            _ => None,
        }
    }
}
