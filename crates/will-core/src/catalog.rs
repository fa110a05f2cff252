//! Static declaration of the wizard's question flow.
//!
//! The catalog is pure data: ordered sections, each holding ordered steps,
//! each step declaring its fields. Step counts and progress are always
//! derived by walking the catalog so steps can be inserted or removed
//! without touching counters elsewhere.

use once_cell::sync::Lazy;
use will_domain::{FieldId, FuneralPreference, MaritalStatus, NavigationCursor, SectionKey};

/// Option offered by a select field. `value` is what gets stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl SelectOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Input kinds. Front-ends match on this exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Select(Vec<SelectOption>),
    YesNo,
    Checkbox,
    Currency,
    Percentage,
    DateParts,
    Address,
    RepeatableList,
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: Option<&'static str>,
}

impl FieldDescriptor {
    pub fn new(id: FieldId, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            required: true,
            placeholder: None,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// A "skip this" affordance shown on optional steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipAffordance {
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Stable identity of a step, independent of its position.
pub enum StepId {
    YourName,
    DateOfBirth,
    Address,
    MaritalStatus,
    Children,
    Property,
    EstateValue,
    ComplexAssets,
    PrimaryExecutor,
    BackupExecutor,
    MainBeneficiary,
    AdditionalBeneficiaries,
    SpecificGifts,
    Guardians,
    FuneralWishes,
    Declarations,
    Witnessing,
}

#[derive(Debug, Clone)]
pub struct StepDescriptor {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
    pub help: Option<&'static str>,
    pub fields: Vec<FieldDescriptor>,
    pub skip: Option<SkipAffordance>,
}

impl StepDescriptor {
    pub fn new(id: StepId, title: &'static str, description: &'static str) -> Self {
        Self {
            id,
            title,
            description,
            help: None,
            fields: Vec::new(),
            skip: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_skip(mut self, label: &'static str) -> Self {
        self.skip = Some(SkipAffordance { label });
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.required)
    }
}

#[derive(Debug, Clone)]
pub struct SectionDescriptor {
    pub key: SectionKey,
    pub title: &'static str,
    pub steps: Vec<StepDescriptor>,
}

impl SectionDescriptor {
    pub fn new(key: SectionKey, steps: Vec<StepDescriptor>) -> Self {
        Self {
            key,
            title: key.title(),
            steps,
        }
    }
}

/// Ordered sections of the wizard.
#[derive(Debug, Clone)]
pub struct Catalog {
    sections: Vec<SectionDescriptor>,
}

static STANDARD: Lazy<Catalog> = Lazy::new(Catalog::build_standard);

impl Catalog {
    /// Sections without steps are dropped so every cursor stays addressable.
    pub fn new(sections: Vec<SectionDescriptor>) -> Self {
        Self {
            sections: sections
                .into_iter()
                .filter(|section| !section.steps.is_empty())
                .collect(),
        }
    }

    /// The will wizard's question flow.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn section_keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.sections.iter().map(|section| section.key)
    }

    pub fn section(&self, key: SectionKey) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|section| section.key == key)
    }

    pub fn steps(&self, key: SectionKey) -> &[StepDescriptor] {
        self.section(key)
            .map(|section| section.steps.as_slice())
            .unwrap_or(&[])
    }

    pub fn step(&self, cursor: NavigationCursor) -> Option<&StepDescriptor> {
        self.steps(cursor.section).get(cursor.step)
    }

    pub fn contains(&self, cursor: NavigationCursor) -> bool {
        self.step(cursor).is_some()
    }

    pub fn step_count(&self, key: SectionKey) -> usize {
        self.steps(key).len()
    }

    pub fn total_steps(&self) -> usize {
        self.sections.iter().map(|section| section.steps.len()).sum()
    }

    pub fn first_cursor(&self) -> Option<NavigationCursor> {
        self.sections
            .first()
            .map(|section| NavigationCursor::section_start(section.key))
    }

    pub fn last_cursor(&self) -> Option<NavigationCursor> {
        self.sections
            .last()
            .map(|section| NavigationCursor::new(section.key, section.steps.len() - 1))
    }

    fn position(&self, key: SectionKey) -> Option<usize> {
        self.sections.iter().position(|section| section.key == key)
    }

    pub fn next_section(&self, key: SectionKey) -> Option<SectionKey> {
        let index = self.position(key)?;
        self.sections.get(index + 1).map(|section| section.key)
    }

    pub fn previous_section(&self, key: SectionKey) -> Option<SectionKey> {
        let index = self.position(key)?;
        index
            .checked_sub(1)
            .and_then(|prev| self.sections.get(prev))
            .map(|section| section.key)
    }

    /// 1-based section number and section count, for "Section 2 of 6".
    pub fn section_position(&self, key: SectionKey) -> Option<(usize, usize)> {
        self.position(key)
            .map(|index| (index + 1, self.sections.len()))
    }

    /// Zero-based index of the cursor across all sections.
    pub fn overall_index(&self, cursor: NavigationCursor) -> Option<usize> {
        if !self.contains(cursor) {
            return None;
        }
        let before: usize = self
            .sections
            .iter()
            .take_while(|section| section.key != cursor.section)
            .map(|section| section.steps.len())
            .sum();
        Some(before + cursor.step)
    }

    pub fn progress_percent(&self, cursor: NavigationCursor) -> u8 {
        let total = self.total_steps();
        match self.overall_index(cursor) {
            Some(index) if total > 0 => ((index * 100) / total) as u8,
            _ => 0,
        }
    }

    pub fn locate(&self, id: StepId) -> Option<NavigationCursor> {
        self.sections.iter().find_map(|section| {
            section
                .steps
                .iter()
                .position(|step| step.id == id)
                .map(|index| NavigationCursor::new(section.key, index))
        })
    }

    fn build_standard() -> Self {
        Self::new(vec![
            SectionDescriptor::new(SectionKey::Personal, personal_steps()),
            SectionDescriptor::new(SectionKey::Estate, estate_steps()),
            SectionDescriptor::new(SectionKey::Executors, executor_steps()),
            SectionDescriptor::new(SectionKey::Beneficiaries, beneficiary_steps()),
            SectionDescriptor::new(SectionKey::Wishes, wishes_steps()),
            SectionDescriptor::new(SectionKey::Legal, legal_steps()),
        ])
    }
}

fn yes_no(id: FieldId, label: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(id, label, FieldKind::YesNo)
}

fn marital_options() -> Vec<SelectOption> {
    MaritalStatus::ALL
        .iter()
        .map(|status| SelectOption::new(status.as_str(), status.label()))
        .collect()
}

fn funeral_options() -> Vec<SelectOption> {
    FuneralPreference::ALL
        .iter()
        .map(|pref| SelectOption::new(pref.as_str(), pref.label()))
        .collect()
}

fn personal_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            StepId::YourName,
            "Your name",
            "Enter your full legal name as it appears on official documents.",
        )
        .field(
            FieldDescriptor::new(FieldId::FullName, "Full legal name", FieldKind::Text)
                .with_placeholder("e.g. Margaret Anne Smith"),
        ),
        StepDescriptor::new(
            StepId::DateOfBirth,
            "Date of birth",
            "You must be 18 or over to make a will in England and Wales.",
        )
        .field(FieldDescriptor::new(
            FieldId::DateOfBirth,
            "Date of birth",
            FieldKind::DateParts,
        )),
        StepDescriptor::new(
            StepId::Address,
            "Your address",
            "Your current permanent address in the UK.",
        )
        .field(FieldDescriptor::new(
            FieldId::Address,
            "Home address",
            FieldKind::Address,
        )),
        StepDescriptor::new(
            StepId::MaritalStatus,
            "Marital status",
            "Marriage or civil partnership can revoke an existing will.",
        )
        .with_help("If you marry after making this will, it will usually be revoked unless it was made in contemplation of that marriage.")
        .field(FieldDescriptor::new(
            FieldId::MaritalStatus,
            "Marital status",
            FieldKind::Select(marital_options()),
        ))
        .field(
            FieldDescriptor::new(FieldId::PartnerName, "Partner's full name", FieldKind::Text)
                .with_optional(),
        ),
        StepDescriptor::new(
            StepId::Children,
            "Children",
            "Tell us about any children, including adopted children.",
        )
        .field(yes_no(FieldId::HasChildren, "Do you have children?"))
        .field(FieldDescriptor::new(
            FieldId::Children,
            "Children's names",
            FieldKind::RepeatableList,
        )),
    ]
}

fn estate_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            StepId::Property,
            "Property",
            "Property is usually the largest part of an estate.",
        )
        .field(yes_no(FieldId::OwnsProperty, "Do you own property?")),
        StepDescriptor::new(
            StepId::EstateValue,
            "Estate value",
            "A rough estimate of everything you own, minus debts.",
        )
        .with_help("Include property, savings, investments and pensions not already nominated. An estimate is fine.")
        .field(
            FieldDescriptor::new(
                FieldId::EstateValue,
                "Approximate estate value",
                FieldKind::Currency,
            )
            .with_placeholder("e.g. £250,000"),
        ),
        StepDescriptor::new(
            StepId::ComplexAssets,
            "Complex assets",
            "Some assets need specialist advice.",
        )
        .field(
            FieldDescriptor::new(
                FieldId::HasOverseasAssets,
                "I own assets outside the UK",
                FieldKind::Checkbox,
            )
            .with_optional(),
        )
        .field(
            FieldDescriptor::new(
                FieldId::HasBusinessAssets,
                "I own a business or business assets",
                FieldKind::Checkbox,
            )
            .with_optional(),
        )
        .field(
            FieldDescriptor::new(
                FieldId::HasTrusts,
                "I have set up or benefit from a trust",
                FieldKind::Checkbox,
            )
            .with_optional(),
        ),
    ]
}

fn executor_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            StepId::PrimaryExecutor,
            "Primary executor",
            "The person who will carry out the instructions in your will.",
        )
        .field(FieldDescriptor::new(
            FieldId::PrimaryExecutorName,
            "Executor's full name",
            FieldKind::Text,
        ))
        .field(FieldDescriptor::new(
            FieldId::PrimaryExecutorRelationship,
            "Relationship to you",
            FieldKind::Text,
        ))
        .field(
            FieldDescriptor::new(FieldId::PrimaryExecutorEmail, "Email", FieldKind::Email)
                .with_optional(),
        ),
        StepDescriptor::new(
            StepId::BackupExecutor,
            "Backup executor",
            "Steps in if your primary executor cannot act.",
        )
        .with_skip("I don't want a backup executor")
        .field(FieldDescriptor::new(
            FieldId::BackupExecutorName,
            "Backup executor's full name",
            FieldKind::Text,
        ))
        .field(FieldDescriptor::new(
            FieldId::BackupExecutorRelationship,
            "Relationship to you",
            FieldKind::Text,
        )),
    ]
}

fn beneficiary_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            StepId::MainBeneficiary,
            "Main beneficiary",
            "The person who receives most of your estate.",
        )
        .field(FieldDescriptor::new(
            FieldId::MainBeneficiaryName,
            "Beneficiary's full name",
            FieldKind::Text,
        ))
        .field(FieldDescriptor::new(
            FieldId::MainBeneficiaryRelationship,
            "Relationship to you",
            FieldKind::Text,
        ))
        .field(FieldDescriptor::new(
            FieldId::MainBeneficiaryPercentage,
            "Share of estate (%)",
            FieldKind::Percentage,
        )),
        StepDescriptor::new(
            StepId::AdditionalBeneficiaries,
            "Additional beneficiaries",
            "Share your estate between more people.",
        )
        .with_help("When you add beneficiaries, every share including the main beneficiary's must add up to exactly 100%.")
        .with_skip("No additional beneficiaries")
        .field(FieldDescriptor::new(
            FieldId::AdditionalBeneficiaries,
            "Additional beneficiaries",
            FieldKind::RepeatableList,
        )),
        StepDescriptor::new(
            StepId::SpecificGifts,
            "Specific gifts",
            "Leave particular items or sums to named people.",
        )
        .with_skip("No specific gifts")
        .field(FieldDescriptor::new(
            FieldId::SpecificGifts,
            "Gifts",
            FieldKind::RepeatableList,
        )),
    ]
}

fn wishes_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            StepId::Guardians,
            "Guardians",
            "Who should look after children under 18?",
        )
        .with_skip("Not applicable")
        .field(
            FieldDescriptor::new(FieldId::GuardianName, "Guardian's full name", FieldKind::Text)
                .with_optional(),
        ),
        StepDescriptor::new(
            StepId::FuneralWishes,
            "Funeral wishes",
            "Your wishes are not legally binding but help your family.",
        )
        .field(FieldDescriptor::new(
            FieldId::FuneralPreference,
            "Preference",
            FieldKind::Select(funeral_options()),
        ))
        .field(
            FieldDescriptor::new(FieldId::FuneralNotes, "Anything else", FieldKind::LongText)
                .with_optional(),
        ),
    ]
}

fn legal_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new(
            StepId::Declarations,
            "Declarations",
            "Confirm the following to make your will valid.",
        )
        .field(FieldDescriptor::new(
            FieldId::SoundMind,
            "I am of sound mind and understand what I am signing",
            FieldKind::Checkbox,
        ))
        .field(FieldDescriptor::new(
            FieldId::FreeWill,
            "I am making this will of my own free will",
            FieldKind::Checkbox,
        )),
        StepDescriptor::new(
            StepId::Witnessing,
            "Signing and witnessing",
            "Your will must be signed in front of two independent adult witnesses.",
        )
        .with_help("Witnesses must not be beneficiaries, or married to or in a civil partnership with a beneficiary.")
        .field(FieldDescriptor::new(
            FieldId::UnderstandsWitnessing,
            "I understand how to sign and witness my will",
            FieldKind::Checkbox,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_derived_from_sections() {
        let catalog = Catalog::standard();
        let summed: usize = catalog
            .section_keys()
            .map(|key| catalog.step_count(key))
            .sum();
        assert_eq!(catalog.total_steps(), summed);
        assert_eq!(catalog.section_keys().count(), SectionKey::ALL.len());
    }

    #[test]
    fn complex_assets_closes_the_estate_section() {
        let catalog = Catalog::standard();
        let estate_value = catalog.locate(StepId::EstateValue).expect("estate value");
        let complex = catalog.locate(StepId::ComplexAssets).expect("complex assets");
        assert_eq!(complex.section, SectionKey::Estate);
        assert_eq!(complex.step, estate_value.step + 1);
        assert_eq!(complex.step, catalog.step_count(SectionKey::Estate) - 1);
    }

    #[test]
    fn additional_beneficiaries_has_no_strictly_required_input() {
        let catalog = Catalog::standard();
        let cursor = catalog
            .locate(StepId::AdditionalBeneficiaries)
            .expect("step");
        let step = catalog.step(cursor).expect("descriptor");
        assert!(step
            .required_fields()
            .all(|field| field.id.is_optional_collection()));
        assert!(step.skip.is_some());
    }

    #[test]
    fn overall_index_walks_previous_sections() {
        let catalog = Catalog::standard();
        let first_estate = NavigationCursor::section_start(SectionKey::Estate);
        assert_eq!(
            catalog.overall_index(first_estate),
            Some(catalog.step_count(SectionKey::Personal))
        );
        assert_eq!(catalog.progress_percent(catalog.first_cursor().unwrap()), 0);
        assert_eq!(
            catalog.overall_index(NavigationCursor::new(SectionKey::Estate, 99)),
            None
        );
    }

    #[test]
    fn custom_catalog_drops_empty_sections() {
        let catalog = Catalog::new(vec![
            SectionDescriptor::new(SectionKey::Personal, Vec::new()),
            SectionDescriptor::new(
                SectionKey::Legal,
                vec![StepDescriptor::new(StepId::Declarations, "Declarations", "")],
            ),
        ]);
        assert_eq!(
            catalog.first_cursor(),
            Some(NavigationCursor::section_start(SectionKey::Legal))
        );
        assert_eq!(catalog.next_section(SectionKey::Legal), None);
    }
}
