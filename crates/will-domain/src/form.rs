//! The in-progress will aggregate and its typed sub-objects.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Complete mutable state of a will being drafted.
pub struct FormState {
    pub personal: PersonalDetails,
    pub estate: EstateDetails,
    pub executors: Executors,
    pub beneficiaries: Beneficiaries,
    pub wishes: Wishes,
    pub legal: LegalDeclarations,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PersonalDetails {
    pub full_name: String,
    pub date_of_birth: DateParts,
    pub address: Address,
    pub marital_status: Option<MaritalStatus>,
    pub partner_name: String,
    pub has_children: Option<bool>,
    pub children: Vec<Child>,
}

impl PersonalDetails {
    pub fn add_child(&mut self, full_name: impl Into<String>) -> Uuid {
        let child = Child::new(full_name);
        let id = child.id;
        self.children.push(child);
        id
    }

    pub fn remove_child(&mut self, id: Uuid) -> Option<Child> {
        let index = self.children.iter().position(|child| child.id == id)?;
        Some(self.children.remove(index))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Child {
    pub id: Uuid,
    pub full_name: String,
}

impl Child {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Day/month/year entered as separate inputs; the composed date is derived.
pub struct DateParts {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<u32>,
}

impl DateParts {
    pub fn new(day: u32, month: u32, year: u32) -> Self {
        Self {
            day: Some(day),
            month: Some(month),
            year: Some(year),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.day.is_some() && self.month.is_some() && self.year.is_some()
    }

    /// `DD/MM/YYYY`, only when every part is present.
    pub fn composed(&self) -> Option<String> {
        match (self.day, self.month, self.year) {
            (Some(day), Some(month), Some(year)) => {
                Some(format!("{:02}/{:02}/{:04}", day, month, year))
            }
            _ => None,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year? as i32, self.month?, self.day?)
    }

    /// Parses `DD/MM/YYYY` (also accepts `-` or `.` separators).
    pub fn parse(input: &str) -> Option<Self> {
        let parts: Vec<&str> = input
            .trim()
            .split(|c| matches!(c, '/' | '-' | '.'))
            .collect();
        if parts.len() != 3 {
            return None;
        }
        let day = parts[0].trim().parse().ok()?;
        let month = parts[1].trim().parse().ok()?;
        let year = parts[2].trim().parse().ok()?;
        let parsed = Self::new(day, month, year);
        parsed.to_date().map(|_| parsed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub postcode: String,
}

impl Address {
    /// Line 2 is optional; line 1, city and postcode are not.
    pub fn is_complete(&self) -> bool {
        !self.line1.trim().is_empty()
            && !self.city.trim().is_empty()
            && !self.postcode.trim().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.line1.trim().is_empty()
            && self.line2.trim().is_empty()
            && self.city.trim().is_empty()
            && self.postcode.trim().is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.line1, &self.line2, &self.city, &self.postcode]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    CivilPartnership,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 5] = [
        MaritalStatus::Single,
        MaritalStatus::Married,
        MaritalStatus::CivilPartnership,
        MaritalStatus::Divorced,
        MaritalStatus::Widowed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::CivilPartnership => "civil_partnership",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Widowed => "widowed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::CivilPartnership => "In a civil partnership",
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Widowed => "Widowed",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        MaritalStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown marital status `{}`", value.trim()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EstateDetails {
    pub owns_property: Option<bool>,
    /// Raw currency text as entered, e.g. `£340,000`.
    pub estate_value: String,
    pub has_overseas_assets: bool,
    pub has_business_assets: bool,
    pub has_trusts: bool,
}

impl EstateDetails {
    /// Whole pounds after stripping currency symbols, grouping and whitespace.
    pub fn estate_value_amount(&self) -> Option<u64> {
        parse_currency_amount(&self.estate_value)
    }
}

/// Strips currency formatting (`£`, `,`, spaces) and returns whole units.
pub fn parse_currency_amount(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let whole = cleaned.split('.').next().unwrap_or_default();
    if whole.is_empty() {
        return Some(0);
    }
    whole.parse().ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Executors {
    pub primary_executor: Option<ExecutorDetails>,
    pub backup_executor: Option<ExecutorDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutorDetails {
    pub full_name: String,
    pub relationship: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Beneficiaries {
    pub main_beneficiary: Option<MainBeneficiary>,
    pub additional_beneficiaries: Vec<AdditionalBeneficiary>,
    pub specific_gifts: Vec<SpecificGift>,
}

impl Beneficiaries {
    pub fn main_percentage(&self) -> u32 {
        self.main_beneficiary
            .as_ref()
            .and_then(|main| main.percentage)
            .unwrap_or(0)
    }

    pub fn main_mut(&mut self) -> &mut MainBeneficiary {
        self.main_beneficiary.get_or_insert_with(MainBeneficiary::default)
    }

    pub fn additional(&self, id: Uuid) -> Option<&AdditionalBeneficiary> {
        self.additional_beneficiaries
            .iter()
            .find(|beneficiary| beneficiary.id == id)
    }

    pub fn additional_mut(&mut self, id: Uuid) -> Option<&mut AdditionalBeneficiary> {
        self.additional_beneficiaries
            .iter_mut()
            .find(|beneficiary| beneficiary.id == id)
    }

    pub fn add_gift(
        &mut self,
        description: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Uuid {
        let gift = SpecificGift::new(description, recipient);
        let id = gift.id;
        self.specific_gifts.push(gift);
        id
    }

    pub fn remove_gift(&mut self, id: Uuid) -> Option<SpecificGift> {
        let index = self.specific_gifts.iter().position(|gift| gift.id == id)?;
        Some(self.specific_gifts.remove(index))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MainBeneficiary {
    pub full_name: String,
    pub relationship: String,
    pub percentage: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdditionalBeneficiary {
    pub id: Uuid,
    pub full_name: String,
    pub relationship: String,
    pub percentage: u32,
}

impl AdditionalBeneficiary {
    pub fn new(full_name: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            relationship: relationship.into(),
            percentage: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecificGift {
    pub id: Uuid,
    pub description: String,
    pub recipient: String,
}

impl SpecificGift {
    pub fn new(description: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            recipient: recipient.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Wishes {
    pub guardian_name: String,
    pub funeral_preference: Option<FuneralPreference>,
    pub funeral_notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FuneralPreference {
    Burial,
    Cremation,
    NoPreference,
}

impl FuneralPreference {
    pub const ALL: [FuneralPreference; 3] = [
        FuneralPreference::Burial,
        FuneralPreference::Cremation,
        FuneralPreference::NoPreference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FuneralPreference::Burial => "burial",
            FuneralPreference::Cremation => "cremation",
            FuneralPreference::NoPreference => "no_preference",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuneralPreference::Burial => "Burial",
            FuneralPreference::Cremation => "Cremation",
            FuneralPreference::NoPreference => "No preference",
        }
    }
}

impl FromStr for FuneralPreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        FuneralPreference::ALL
            .iter()
            .copied()
            .find(|pref| pref.as_str() == normalized)
            .ok_or_else(|| format!("unknown funeral preference `{}`", value.trim()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LegalDeclarations {
    pub sound_mind: bool,
    pub free_will: bool,
    pub understands_witnessing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_amount_strips_formatting() {
        assert_eq!(parse_currency_amount("£340,000"), Some(340_000));
        assert_eq!(parse_currency_amount(" 1 250 000.75 "), Some(1_250_000));
        assert_eq!(parse_currency_amount("£"), None);
        assert_eq!(parse_currency_amount(""), None);
    }

    #[test]
    fn date_parts_compose_only_when_complete() {
        let mut parts = DateParts::new(7, 3, 1961);
        assert_eq!(parts.composed().as_deref(), Some("07/03/1961"));
        parts.month = None;
        assert!(!parts.is_complete());
        assert_eq!(parts.composed(), None);
    }

    #[test]
    fn date_parts_parse_rejects_impossible_dates() {
        assert_eq!(DateParts::parse("31/12/1980"), Some(DateParts::new(31, 12, 1980)));
        assert_eq!(DateParts::parse("31/02/1980"), None);
        assert_eq!(DateParts::parse("1980-12"), None);
    }

    #[test]
    fn address_requires_line1_city_postcode() {
        let mut address = Address {
            line1: "1 High Street".into(),
            line2: String::new(),
            city: "Leeds".into(),
            postcode: "LS1 1AA".into(),
        };
        assert!(address.is_complete());
        address.city.clear();
        assert!(!address.is_complete());
    }

    #[test]
    fn main_percentage_defaults_to_zero() {
        let mut beneficiaries = Beneficiaries::default();
        assert_eq!(beneficiaries.main_percentage(), 0);
        beneficiaries.main_mut().percentage = Some(40);
        assert_eq!(beneficiaries.main_percentage(), 40);
    }
}
