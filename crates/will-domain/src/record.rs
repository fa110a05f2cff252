//! Flattened, snake-cased projection of a will as kept by the record store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{
    AdditionalBeneficiary, Address, Beneficiaries, Child, DateParts, EstateDetails,
    ExecutorDetails, Executors, FormState, FuneralPreference, LegalDeclarations,
    MainBeneficiary, MaritalStatus, PersonalDetails, SpecificGift, Wishes,
};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WillStatus {
    #[default]
    Draft,
    Paid,
    Completed,
}

impl fmt::Display for WillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WillStatus::Draft => "draft",
            WillStatus::Paid => "paid",
            WillStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// One stored will, owned by `user_id`.
pub struct WillRecord {
    pub id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub status: WillStatus,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub birth_day: Option<u32>,
    #[serde(default)]
    pub birth_month: Option<u32>,
    #[serde(default)]
    pub birth_year: Option<u32>,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub partner_name: String,
    #[serde(default)]
    pub has_children: Option<bool>,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub owns_property: Option<bool>,
    #[serde(default)]
    pub estate_value: String,
    #[serde(default)]
    pub has_overseas_assets: bool,
    #[serde(default)]
    pub has_business_assets: bool,
    #[serde(default)]
    pub has_trusts: bool,
    #[serde(default)]
    pub primary_executor: Option<ExecutorDetails>,
    #[serde(default)]
    pub backup_executor: Option<ExecutorDetails>,
    #[serde(default)]
    pub main_beneficiary: Option<MainBeneficiary>,
    #[serde(default)]
    pub additional_beneficiaries: Vec<AdditionalBeneficiary>,
    #[serde(default)]
    pub specific_gifts: Vec<SpecificGift>,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub funeral_preference: Option<FuneralPreference>,
    #[serde(default)]
    pub funeral_notes: String,
    #[serde(default)]
    pub sound_mind: bool,
    #[serde(default)]
    pub free_will: bool,
    #[serde(default)]
    pub understands_witnessing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WillRecord {
    /// Builds a draft record for `user_id` from the current form.
    pub fn from_form(id: Uuid, user_id: impl Into<String>, form: &FormState) -> Self {
        let now = Utc::now();
        let mut record = Self {
            id,
            user_id: user_id.into(),
            status: WillStatus::Draft,
            full_name: String::new(),
            date_of_birth: None,
            birth_day: None,
            birth_month: None,
            birth_year: None,
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            postcode: String::new(),
            marital_status: None,
            partner_name: String::new(),
            has_children: None,
            children: Vec::new(),
            owns_property: None,
            estate_value: String::new(),
            has_overseas_assets: false,
            has_business_assets: false,
            has_trusts: false,
            primary_executor: None,
            backup_executor: None,
            main_beneficiary: None,
            additional_beneficiaries: Vec::new(),
            specific_gifts: Vec::new(),
            guardian_name: String::new(),
            funeral_preference: None,
            funeral_notes: String::new(),
            sound_mind: false,
            free_will: false,
            understands_witnessing: false,
            referral_code: None,
            created_at: now,
            updated_at: now,
        };
        record.apply_form(form);
        record
    }

    /// Overwrites every form-derived column, keeping identity and ownership.
    pub fn apply_form(&mut self, form: &FormState) {
        let personal = &form.personal;
        self.full_name = personal.full_name.clone();
        self.date_of_birth = personal.date_of_birth.composed();
        self.birth_day = personal.date_of_birth.day;
        self.birth_month = personal.date_of_birth.month;
        self.birth_year = personal.date_of_birth.year;
        self.address_line1 = personal.address.line1.clone();
        self.address_line2 = personal.address.line2.clone();
        self.city = personal.address.city.clone();
        self.postcode = personal.address.postcode.clone();
        self.marital_status = personal.marital_status;
        self.partner_name = personal.partner_name.clone();
        self.has_children = personal.has_children;
        self.children = personal.children.clone();

        let estate = &form.estate;
        self.owns_property = estate.owns_property;
        self.estate_value = estate.estate_value.clone();
        self.has_overseas_assets = estate.has_overseas_assets;
        self.has_business_assets = estate.has_business_assets;
        self.has_trusts = estate.has_trusts;

        self.primary_executor = form.executors.primary_executor.clone();
        self.backup_executor = form.executors.backup_executor.clone();

        let beneficiaries = &form.beneficiaries;
        self.main_beneficiary = beneficiaries.main_beneficiary.clone();
        self.additional_beneficiaries = beneficiaries.additional_beneficiaries.clone();
        self.specific_gifts = beneficiaries.specific_gifts.clone();

        self.guardian_name = form.wishes.guardian_name.clone();
        self.funeral_preference = form.wishes.funeral_preference;
        self.funeral_notes = form.wishes.funeral_notes.clone();

        self.sound_mind = form.legal.sound_mind;
        self.free_will = form.legal.free_will;
        self.understands_witnessing = form.legal.understands_witnessing;
        self.updated_at = Utc::now();
    }

    pub fn to_form(&self) -> FormState {
        FormState {
            personal: PersonalDetails {
                full_name: self.full_name.clone(),
                date_of_birth: DateParts {
                    day: self.birth_day,
                    month: self.birth_month,
                    year: self.birth_year,
                },
                address: Address {
                    line1: self.address_line1.clone(),
                    line2: self.address_line2.clone(),
                    city: self.city.clone(),
                    postcode: self.postcode.clone(),
                },
                marital_status: self.marital_status,
                partner_name: self.partner_name.clone(),
                has_children: self.has_children,
                children: self.children.clone(),
            },
            estate: EstateDetails {
                owns_property: self.owns_property,
                estate_value: self.estate_value.clone(),
                has_overseas_assets: self.has_overseas_assets,
                has_business_assets: self.has_business_assets,
                has_trusts: self.has_trusts,
            },
            executors: Executors {
                primary_executor: self.primary_executor.clone(),
                backup_executor: self.backup_executor.clone(),
            },
            beneficiaries: Beneficiaries {
                main_beneficiary: self.main_beneficiary.clone(),
                additional_beneficiaries: self.additional_beneficiaries.clone(),
                specific_gifts: self.specific_gifts.clone(),
            },
            wishes: Wishes {
                guardian_name: self.guardian_name.clone(),
                funeral_preference: self.funeral_preference,
                funeral_notes: self.funeral_notes.clone(),
            },
            legal: LegalDeclarations {
                sound_mind: self.sound_mind,
                free_will: self.free_will,
                understands_witnessing: self.understands_witnessing,
            },
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> FormState {
        let mut form = FormState::new();
        form.personal.full_name = "Ada Brook".into();
        form.personal.date_of_birth = DateParts::new(2, 9, 1958);
        form.personal.address.line1 = "4 Mill Lane".into();
        form.personal.address.city = "York".into();
        form.personal.address.postcode = "YO1 7HH".into();
        form.personal.add_child("Tom Brook");
        form.executors.primary_executor = Some(ExecutorDetails {
            full_name: "Jo Brook".into(),
            relationship: "Sister".into(),
            email: String::new(),
        });
        form.beneficiaries.main_mut().percentage = Some(100);
        form
    }

    #[test]
    fn record_projection_preserves_form() {
        let form = sample_form();
        let record = WillRecord::from_form(Uuid::new_v4(), "user-1", &form);
        assert_eq!(record.date_of_birth.as_deref(), Some("02/09/1958"));
        assert_eq!(record.to_form(), form);
    }

    #[test]
    fn record_serializes_snake_case_nested_objects() {
        let record = WillRecord::from_form(Uuid::new_v4(), "user-1", &sample_form());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["user_id"], "user-1");
        assert_eq!(json["primary_executor"]["full_name"], "Jo Brook");
        assert_eq!(json["children"][0]["full_name"], "Tom Brook");
        assert_eq!(json["status"], "draft");
    }
}
