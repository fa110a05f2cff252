//! Whole-form review run before submission.

use will_domain::{FieldValue, FormState, SectionKey};

use crate::{
    allocation::{AllocationTracker, FULL_ALLOCATION},
    catalog::{Catalog, StepDescriptor, StepId},
    validation::{validate_step, StepValidation},
};

/// A step that still has outstanding issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStep {
    pub id: StepId,
    pub title: &'static str,
    pub validation: StepValidation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReview {
    pub key: SectionKey,
    pub step_count: usize,
    pub pending: Vec<PendingStep>,
}

impl SectionReview {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub sections: Vec<SectionReview>,
    pub allocation_total: u32,
}

impl ReviewSummary {
    pub fn build(form: &FormState, catalog: &Catalog) -> Self {
        let sections = catalog
            .sections()
            .iter()
            .map(|section| SectionReview {
                key: section.key,
                step_count: section.steps.len(),
                pending: section
                    .steps
                    .iter()
                    .filter(|step| !was_skipped(step, form))
                    .filter_map(|step| {
                        let validation = validate_step(step, form);
                        (!validation.is_valid()).then_some(PendingStep {
                            id: step.id,
                            title: step.title,
                            validation,
                        })
                    })
                    .collect(),
            })
            .collect();
        Self {
            sections,
            allocation_total: AllocationTracker::total(&form.beneficiaries),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(SectionReview::is_complete)
    }

    /// Under-allocation is reported but does not make the will incomplete.
    pub fn is_under_allocated(&self) -> bool {
        self.allocation_total < FULL_ALLOCATION
    }

    pub fn first_incomplete_section(&self) -> Option<SectionKey> {
        self.sections
            .iter()
            .find(|section| !section.is_complete())
            .map(|section| section.key)
    }

    /// Flat "Section / Step: message" lines.
    pub fn outstanding(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.pending.iter().flat_map(move |step| {
                    step.validation.issues().iter().map(move |issue| {
                        format!("{} / {}: {}", section.key.title(), step.title, issue)
                    })
                })
            })
            .collect()
    }
}

/// A skippable step whose fields are all blank was skipped on purpose.
fn was_skipped(step: &StepDescriptor, form: &FormState) -> bool {
    step.skip.is_some()
        && step.fields.iter().all(|field| match form.value(field.id) {
            FieldValue::Empty | FieldValue::Flag(false) | FieldValue::Items(0) => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            _ => false,
        })
}
