//! Typed field identifiers plus the single read/write path into [`FormState`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::{
    Address, DateParts, ExecutorDetails, FormState, FuneralPreference, MaritalStatus,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Every input the wizard can ask for.
pub enum FieldId {
    FullName,
    DateOfBirth,
    Address,
    MaritalStatus,
    PartnerName,
    HasChildren,
    Children,
    OwnsProperty,
    EstateValue,
    HasOverseasAssets,
    HasBusinessAssets,
    HasTrusts,
    PrimaryExecutorName,
    PrimaryExecutorRelationship,
    PrimaryExecutorEmail,
    BackupExecutorName,
    BackupExecutorRelationship,
    MainBeneficiaryName,
    MainBeneficiaryRelationship,
    MainBeneficiaryPercentage,
    AdditionalBeneficiaries,
    SpecificGifts,
    GuardianName,
    FuneralPreference,
    FuneralNotes,
    SoundMind,
    FreeWill,
    UnderstandsWitnessing,
}

impl FieldId {
    /// Dotted path used in messages and stored progress diagnostics.
    pub fn path(self) -> &'static str {
        match self {
            FieldId::FullName => "fullName",
            FieldId::DateOfBirth => "dateOfBirth",
            FieldId::Address => "address",
            FieldId::MaritalStatus => "maritalStatus",
            FieldId::PartnerName => "partnerName",
            FieldId::HasChildren => "hasChildren",
            FieldId::Children => "children",
            FieldId::OwnsProperty => "ownsProperty",
            FieldId::EstateValue => "estateValue",
            FieldId::HasOverseasAssets => "hasOverseasAssets",
            FieldId::HasBusinessAssets => "hasBusinessAssets",
            FieldId::HasTrusts => "hasTrusts",
            FieldId::PrimaryExecutorName => "primaryExecutor.fullName",
            FieldId::PrimaryExecutorRelationship => "primaryExecutor.relationship",
            FieldId::PrimaryExecutorEmail => "primaryExecutor.email",
            FieldId::BackupExecutorName => "backupExecutor.fullName",
            FieldId::BackupExecutorRelationship => "backupExecutor.relationship",
            FieldId::MainBeneficiaryName => "mainBeneficiary.fullName",
            FieldId::MainBeneficiaryRelationship => "mainBeneficiary.relationship",
            FieldId::MainBeneficiaryPercentage => "mainBeneficiary.percentage",
            FieldId::AdditionalBeneficiaries => "additionalBeneficiaries",
            FieldId::SpecificGifts => "specificGifts",
            FieldId::GuardianName => "guardianName",
            FieldId::FuneralPreference => "funeralPreference",
            FieldId::FuneralNotes => "funeralNotes",
            FieldId::SoundMind => "soundMind",
            FieldId::FreeWill => "freeWill",
            FieldId::UnderstandsWitnessing => "understandsWitnessing",
        }
    }

    /// Parent object for nested fields, e.g. `primaryExecutor`.
    pub fn parent(self) -> Option<&'static str> {
        self.path().split_once('.').map(|(parent, _)| parent)
    }

    /// Collections the user may legitimately leave empty.
    pub fn is_optional_collection(self) -> bool {
        matches!(
            self,
            FieldId::Children | FieldId::AdditionalBeneficiaries | FieldId::SpecificGifts
        )
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of a single field's content.
pub enum FieldValue {
    Empty,
    Text(String),
    Flag(bool),
    Choice(String),
    Percentage(u32),
    Date(DateParts),
    Address(Address),
    /// Length of a repeatable collection; read-only.
    Items(usize),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Empty => "empty",
            FieldValue::Text(_) => "text",
            FieldValue::Flag(_) => "flag",
            FieldValue::Choice(_) => "choice",
            FieldValue::Percentage(_) => "percentage",
            FieldValue::Date(_) => "date",
            FieldValue::Address(_) => "address",
            FieldValue::Items(_) => "items",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    TypeMismatch {
        field: FieldId,
        expected: &'static str,
        found: &'static str,
    },
    InvalidChoice {
        field: FieldId,
        value: String,
    },
    /// Collections are edited through their add/remove operations.
    Collection(FieldId),
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignError::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "{field} expects a {expected} value, got {found}"),
            AssignError::InvalidChoice { field, value } => {
                write!(f, "`{value}` is not a valid option for {field}")
            }
            AssignError::Collection(field) => {
                write!(f, "{field} is a list; add or remove entries instead")
            }
        }
    }
}

impl std::error::Error for AssignError {}

fn text_value(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

fn optional_flag(value: Option<bool>) -> FieldValue {
    value.map(FieldValue::Flag).unwrap_or(FieldValue::Empty)
}

fn executor_text(
    executor: &Option<ExecutorDetails>,
    read: impl Fn(&ExecutorDetails) -> &str,
) -> FieldValue {
    executor
        .as_ref()
        .map(|details| text_value(read(details)))
        .unwrap_or(FieldValue::Empty)
}

fn expect_text(field: FieldId, value: FieldValue) -> Result<String, AssignError> {
    match value {
        FieldValue::Text(text) => Ok(text),
        FieldValue::Empty => Ok(String::new()),
        other => Err(AssignError::TypeMismatch {
            field,
            expected: "text",
            found: other.kind_name(),
        }),
    }
}

fn expect_flag(field: FieldId, value: FieldValue) -> Result<Option<bool>, AssignError> {
    match value {
        FieldValue::Flag(flag) => Ok(Some(flag)),
        FieldValue::Empty => Ok(None),
        other => Err(AssignError::TypeMismatch {
            field,
            expected: "flag",
            found: other.kind_name(),
        }),
    }
}

fn expect_choice(field: FieldId, value: FieldValue) -> Result<Option<String>, AssignError> {
    match value {
        FieldValue::Choice(choice) | FieldValue::Text(choice) => Ok(Some(choice)),
        FieldValue::Empty => Ok(None),
        other => Err(AssignError::TypeMismatch {
            field,
            expected: "choice",
            found: other.kind_name(),
        }),
    }
}

impl FormState {
    /// Whether the parent object of a nested field exists.
    pub fn has_parent(&self, field: FieldId) -> bool {
        match field {
            FieldId::PrimaryExecutorName
            | FieldId::PrimaryExecutorRelationship
            | FieldId::PrimaryExecutorEmail => self.executors.primary_executor.is_some(),
            FieldId::BackupExecutorName | FieldId::BackupExecutorRelationship => {
                self.executors.backup_executor.is_some()
            }
            FieldId::MainBeneficiaryName
            | FieldId::MainBeneficiaryRelationship
            | FieldId::MainBeneficiaryPercentage => {
                self.beneficiaries.main_beneficiary.is_some()
            }
            _ => true,
        }
    }

    pub fn value(&self, field: FieldId) -> FieldValue {
        let personal = &self.personal;
        let estate = &self.estate;
        let executors = &self.executors;
        let beneficiaries = &self.beneficiaries;
        match field {
            FieldId::FullName => text_value(&personal.full_name),
            FieldId::DateOfBirth => FieldValue::Date(personal.date_of_birth),
            FieldId::Address => FieldValue::Address(personal.address.clone()),
            FieldId::MaritalStatus => personal
                .marital_status
                .map(|status| FieldValue::Choice(status.as_str().to_string()))
                .unwrap_or(FieldValue::Empty),
            FieldId::PartnerName => text_value(&personal.partner_name),
            FieldId::HasChildren => optional_flag(personal.has_children),
            FieldId::Children => FieldValue::Items(personal.children.len()),
            FieldId::OwnsProperty => optional_flag(estate.owns_property),
            FieldId::EstateValue => text_value(&estate.estate_value),
            FieldId::HasOverseasAssets => FieldValue::Flag(estate.has_overseas_assets),
            FieldId::HasBusinessAssets => FieldValue::Flag(estate.has_business_assets),
            FieldId::HasTrusts => FieldValue::Flag(estate.has_trusts),
            FieldId::PrimaryExecutorName => {
                executor_text(&executors.primary_executor, |e| e.full_name.as_str())
            }
            FieldId::PrimaryExecutorRelationship => {
                executor_text(&executors.primary_executor, |e| e.relationship.as_str())
            }
            FieldId::PrimaryExecutorEmail => {
                executor_text(&executors.primary_executor, |e| e.email.as_str())
            }
            FieldId::BackupExecutorName => {
                executor_text(&executors.backup_executor, |e| e.full_name.as_str())
            }
            FieldId::BackupExecutorRelationship => {
                executor_text(&executors.backup_executor, |e| e.relationship.as_str())
            }
            FieldId::MainBeneficiaryName => beneficiaries
                .main_beneficiary
                .as_ref()
                .map(|main| text_value(&main.full_name))
                .unwrap_or(FieldValue::Empty),
            FieldId::MainBeneficiaryRelationship => beneficiaries
                .main_beneficiary
                .as_ref()
                .map(|main| text_value(&main.relationship))
                .unwrap_or(FieldValue::Empty),
            FieldId::MainBeneficiaryPercentage => beneficiaries
                .main_beneficiary
                .as_ref()
                .and_then(|main| main.percentage)
                .map(FieldValue::Percentage)
                .unwrap_or(FieldValue::Empty),
            FieldId::AdditionalBeneficiaries => {
                FieldValue::Items(beneficiaries.additional_beneficiaries.len())
            }
            FieldId::SpecificGifts => FieldValue::Items(beneficiaries.specific_gifts.len()),
            FieldId::GuardianName => text_value(&self.wishes.guardian_name),
            FieldId::FuneralPreference => self
                .wishes
                .funeral_preference
                .map(|pref| FieldValue::Choice(pref.as_str().to_string()))
                .unwrap_or(FieldValue::Empty),
            FieldId::FuneralNotes => text_value(&self.wishes.funeral_notes),
            FieldId::SoundMind => FieldValue::Flag(self.legal.sound_mind),
            FieldId::FreeWill => FieldValue::Flag(self.legal.free_will),
            FieldId::UnderstandsWitnessing => FieldValue::Flag(self.legal.understands_witnessing),
        }
    }

    /// Writes a single field. Nested fields create their parent object on demand.
    pub fn assign(&mut self, field: FieldId, value: FieldValue) -> Result<(), AssignError> {
        match field {
            FieldId::FullName => self.personal.full_name = expect_text(field, value)?,
            FieldId::DateOfBirth => match value {
                FieldValue::Date(parts) => self.personal.date_of_birth = parts,
                FieldValue::Empty => self.personal.date_of_birth = DateParts::default(),
                other => {
                    return Err(AssignError::TypeMismatch {
                        field,
                        expected: "date",
                        found: other.kind_name(),
                    })
                }
            },
            FieldId::Address => match value {
                FieldValue::Address(address) => self.personal.address = address,
                FieldValue::Empty => self.personal.address = Address::default(),
                other => {
                    return Err(AssignError::TypeMismatch {
                        field,
                        expected: "address",
                        found: other.kind_name(),
                    })
                }
            },
            FieldId::MaritalStatus => {
                self.personal.marital_status = match expect_choice(field, value)? {
                    Some(raw) => Some(raw.parse::<MaritalStatus>().map_err(|_| {
                        AssignError::InvalidChoice { field, value: raw }
                    })?),
                    None => None,
                }
            }
            FieldId::PartnerName => self.personal.partner_name = expect_text(field, value)?,
            FieldId::HasChildren => self.personal.has_children = expect_flag(field, value)?,
            FieldId::OwnsProperty => self.estate.owns_property = expect_flag(field, value)?,
            FieldId::EstateValue => self.estate.estate_value = expect_text(field, value)?,
            FieldId::HasOverseasAssets => {
                self.estate.has_overseas_assets = expect_flag(field, value)?.unwrap_or(false)
            }
            FieldId::HasBusinessAssets => {
                self.estate.has_business_assets = expect_flag(field, value)?.unwrap_or(false)
            }
            FieldId::HasTrusts => {
                self.estate.has_trusts = expect_flag(field, value)?.unwrap_or(false)
            }
            FieldId::PrimaryExecutorName => {
                let text = expect_text(field, value)?;
                self.executors
                    .primary_executor
                    .get_or_insert_with(ExecutorDetails::default)
                    .full_name = text;
            }
            FieldId::PrimaryExecutorRelationship => {
                let text = expect_text(field, value)?;
                self.executors
                    .primary_executor
                    .get_or_insert_with(ExecutorDetails::default)
                    .relationship = text;
            }
            FieldId::PrimaryExecutorEmail => {
                let text = expect_text(field, value)?;
                self.executors
                    .primary_executor
                    .get_or_insert_with(ExecutorDetails::default)
                    .email = text;
            }
            FieldId::BackupExecutorName => {
                let text = expect_text(field, value)?;
                self.executors
                    .backup_executor
                    .get_or_insert_with(ExecutorDetails::default)
                    .full_name = text;
            }
            FieldId::BackupExecutorRelationship => {
                let text = expect_text(field, value)?;
                self.executors
                    .backup_executor
                    .get_or_insert_with(ExecutorDetails::default)
                    .relationship = text;
            }
            FieldId::MainBeneficiaryName => {
                self.beneficiaries.main_mut().full_name = expect_text(field, value)?
            }
            FieldId::MainBeneficiaryRelationship => {
                self.beneficiaries.main_mut().relationship = expect_text(field, value)?
            }
            FieldId::MainBeneficiaryPercentage => match value {
                FieldValue::Percentage(share) => {
                    self.beneficiaries.main_mut().percentage = Some(share)
                }
                FieldValue::Empty => self.beneficiaries.main_mut().percentage = None,
                other => {
                    return Err(AssignError::TypeMismatch {
                        field,
                        expected: "percentage",
                        found: other.kind_name(),
                    })
                }
            },
            FieldId::Children | FieldId::AdditionalBeneficiaries | FieldId::SpecificGifts => {
                return Err(AssignError::Collection(field))
            }
            FieldId::GuardianName => self.wishes.guardian_name = expect_text(field, value)?,
            FieldId::FuneralPreference => {
                self.wishes.funeral_preference = match expect_choice(field, value)? {
                    Some(raw) => Some(raw.parse::<FuneralPreference>().map_err(|_| {
                        AssignError::InvalidChoice { field, value: raw }
                    })?),
                    None => None,
                }
            }
            FieldId::FuneralNotes => self.wishes.funeral_notes = expect_text(field, value)?,
            FieldId::SoundMind => {
                self.legal.sound_mind = expect_flag(field, value)?.unwrap_or(false)
            }
            FieldId::FreeWill => self.legal.free_will = expect_flag(field, value)?.unwrap_or(false),
            FieldId::UnderstandsWitnessing => {
                self.legal.understands_witnessing = expect_flag(field, value)?.unwrap_or(false)
            }
        }
        Ok(())
    }

    /// Resets a field to its empty representation. Clearing any nested field
    /// drops the whole parent object.
    pub fn clear(&mut self, field: FieldId) {
        match field {
            FieldId::FullName => self.personal.full_name.clear(),
            FieldId::DateOfBirth => self.personal.date_of_birth = DateParts::default(),
            FieldId::Address => self.personal.address = Address::default(),
            FieldId::MaritalStatus => self.personal.marital_status = None,
            FieldId::PartnerName => self.personal.partner_name.clear(),
            FieldId::HasChildren => self.personal.has_children = None,
            FieldId::Children => self.personal.children.clear(),
            FieldId::OwnsProperty => self.estate.owns_property = None,
            FieldId::EstateValue => self.estate.estate_value.clear(),
            FieldId::HasOverseasAssets => self.estate.has_overseas_assets = false,
            FieldId::HasBusinessAssets => self.estate.has_business_assets = false,
            FieldId::HasTrusts => self.estate.has_trusts = false,
            FieldId::PrimaryExecutorName
            | FieldId::PrimaryExecutorRelationship
            | FieldId::PrimaryExecutorEmail => self.executors.primary_executor = None,
            FieldId::BackupExecutorName | FieldId::BackupExecutorRelationship => {
                self.executors.backup_executor = None
            }
            FieldId::MainBeneficiaryName
            | FieldId::MainBeneficiaryRelationship
            | FieldId::MainBeneficiaryPercentage => self.beneficiaries.main_beneficiary = None,
            FieldId::AdditionalBeneficiaries => {
                self.beneficiaries.additional_beneficiaries.clear()
            }
            FieldId::SpecificGifts => self.beneficiaries.specific_gifts.clear(),
            FieldId::GuardianName => self.wishes.guardian_name.clear(),
            FieldId::FuneralPreference => self.wishes.funeral_preference = None,
            FieldId::FuneralNotes => self.wishes.funeral_notes.clear(),
            FieldId::SoundMind => self.legal.sound_mind = false,
            FieldId::FreeWill => self.legal.free_will = false,
            FieldId::UnderstandsWitnessing => self.legal.understands_witnessing = false,
        }
    }
}
