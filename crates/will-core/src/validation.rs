//! Per-step validation run before the wizard may advance.

use std::fmt;

use will_domain::{FieldId, FieldValue, FormState};

use crate::{
    allocation::{AllocationTracker, FULL_ALLOCATION},
    catalog::{FieldDescriptor, FieldKind, StepDescriptor, StepId},
};

/// A single reason the current step cannot be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: Option<FieldId>,
    pub message: String,
}

impl ValidationIssue {
    pub fn for_field(field: FieldId, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepValidation {
    issues: Vec<ValidationIssue>,
}

impl StepValidation {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|issue| issue.message.clone()).collect()
    }
}

/// Checks required fields and step-specific cross-field rules.
pub fn validate_step(step: &StepDescriptor, form: &FormState) -> StepValidation {
    let mut issues: Vec<ValidationIssue> = step
        .required_fields()
        .filter(|field| !is_satisfied(field, form))
        .map(|field| ValidationIssue::for_field(field.id, missing_message(field)))
        .collect();

    if step.id == StepId::AdditionalBeneficiaries {
        let beneficiaries = &form.beneficiaries;
        if !beneficiaries.additional_beneficiaries.is_empty() {
            let total = AllocationTracker::total(beneficiaries);
            if total != FULL_ALLOCATION {
                issues.push(ValidationIssue::for_field(
                    FieldId::AdditionalBeneficiaries,
                    format!(
                        "Shares must add up to exactly {}% (currently {}%)",
                        FULL_ALLOCATION, total
                    ),
                ));
            }
        }
    }

    StepValidation { issues }
}

fn is_satisfied(field: &FieldDescriptor, form: &FormState) -> bool {
    if field.id.is_optional_collection() {
        return true;
    }
    if field.id.parent().is_some() && !form.has_parent(field.id) {
        return false;
    }
    let value = form.value(field.id);
    match &field.kind {
        FieldKind::Text
        | FieldKind::LongText
        | FieldKind::Email
        | FieldKind::Currency => matches!(&value, FieldValue::Text(text) if !text.trim().is_empty()),
        FieldKind::Select(_) => matches!(value, FieldValue::Choice(_)),
        FieldKind::YesNo => matches!(value, FieldValue::Flag(_)),
        FieldKind::Checkbox => value == FieldValue::Flag(true),
        FieldKind::Percentage => matches!(value, FieldValue::Percentage(_)),
        FieldKind::DateParts => matches!(&value, FieldValue::Date(parts) if parts.is_complete()),
        FieldKind::Address => matches!(&value, FieldValue::Address(address) if address.is_complete()),
        FieldKind::RepeatableList => matches!(value, FieldValue::Items(count) if count > 0),
    }
}

fn missing_message(field: &FieldDescriptor) -> String {
    match &field.kind {
        FieldKind::Checkbox => format!("Please confirm: {}", field.label),
        FieldKind::DateParts => format!("{} needs a day, month and year", field.label),
        FieldKind::Address => format!("{} needs line 1, city and postcode", field.label),
        FieldKind::Select(_) | FieldKind::YesNo => format!("Please choose: {}", field.label),
        FieldKind::Text
        | FieldKind::LongText
        | FieldKind::Email
        | FieldKind::Currency
        | FieldKind::Percentage
        | FieldKind::RepeatableList => format!("{} is required", field.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use will_domain::{AdditionalBeneficiary, DateParts, ExecutorDetails};

    fn step(id: StepId) -> &'static StepDescriptor {
        let catalog = Catalog::standard();
        catalog
            .step(catalog.locate(id).expect("step exists"))
            .expect("descriptor")
    }

    #[test]
    fn date_of_birth_needs_every_part() {
        let mut form = FormState::new();
        form.personal.date_of_birth = DateParts {
            day: Some(1),
            month: Some(2),
            year: None,
        };
        assert!(!validate_step(step(StepId::DateOfBirth), &form).is_valid());
        form.personal.date_of_birth.year = Some(1970);
        assert!(validate_step(step(StepId::DateOfBirth), &form).is_valid());
    }

    #[test]
    fn address_line2_is_optional() {
        let mut form = FormState::new();
        form.personal.address.line1 = "2 Bank Road".into();
        form.personal.address.city = "Bath".into();
        assert!(!validate_step(step(StepId::Address), &form).is_valid());
        form.personal.address.postcode = "BA1 1AA".into();
        assert!(validate_step(step(StepId::Address), &form).is_valid());
    }

    #[test]
    fn nested_fields_require_parent_and_child() {
        let mut form = FormState::new();
        let validation = validate_step(step(StepId::PrimaryExecutor), &form);
        assert_eq!(validation.issues().len(), 2);

        form.executors.primary_executor = Some(ExecutorDetails {
            full_name: "Lee Carter".into(),
            relationship: String::new(),
            email: String::new(),
        });
        let validation = validate_step(step(StepId::PrimaryExecutor), &form);
        assert_eq!(
            validation.issues()[0].field,
            Some(FieldId::PrimaryExecutorRelationship)
        );
    }

    #[test]
    fn checkboxes_must_be_ticked() {
        let mut form = FormState::new();
        form.legal.sound_mind = true;
        let validation = validate_step(step(StepId::Declarations), &form);
        assert_eq!(validation.issues().len(), 1);
        assert!(validation.messages()[0].starts_with("Please confirm"));
    }

    #[test]
    fn optional_collections_never_block() {
        let mut form = FormState::new();
        form.personal.has_children = Some(true);
        assert!(validate_step(step(StepId::Children), &form).is_valid());
        assert!(validate_step(step(StepId::SpecificGifts), &form).is_valid());
    }

    #[test]
    fn additional_beneficiaries_require_exact_total() {
        let mut form = FormState::new();
        assert!(validate_step(step(StepId::AdditionalBeneficiaries), &form).is_valid());

        form.beneficiaries.main_mut().percentage = Some(60);
        let mut extra = AdditionalBeneficiary::new("Ruth Ellis", "Friend");
        extra.percentage = 30;
        form.beneficiaries.additional_beneficiaries.push(extra);
        let validation = validate_step(step(StepId::AdditionalBeneficiaries), &form);
        assert!(!validation.is_valid());
        assert!(validation.messages()[0].contains("currently 90%"));

        form.beneficiaries.additional_beneficiaries[0].percentage = 40;
        assert!(validate_step(step(StepId::AdditionalBeneficiaries), &form).is_valid());
    }

    #[test]
    fn under_allocation_is_tolerated_on_main_beneficiary_step() {
        let mut form = FormState::new();
        let main = form.beneficiaries.main_mut();
        main.full_name = "Ana Price".into();
        main.relationship = "Daughter".into();
        main.percentage = Some(40);
        assert!(validate_step(step(StepId::MainBeneficiary), &form).is_valid());
    }
}
