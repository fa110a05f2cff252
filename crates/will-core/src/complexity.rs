//! Signals that an estate likely needs professional legal advice.

use std::fmt;

use will_domain::FormState;

/// Estate value boundaries, in whole pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityThresholds {
    /// Estates valued below this skip the complex-assets step.
    pub complex_assets_skip: u64,
    /// Estates valued above this are flagged as complex.
    pub high_value_estate: u64,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            complex_assets_skip: 400_000,
            high_value_estate: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityReason {
    OverseasAssets,
    BusinessAssets,
    Trusts,
    HighValueEstate { value: u64, threshold: u64 },
}

impl fmt::Display for ComplexityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityReason::OverseasAssets => f.write_str("You own assets outside the UK"),
            ComplexityReason::BusinessAssets => f.write_str("You own business assets"),
            ComplexityReason::Trusts => f.write_str("You are involved with a trust"),
            ComplexityReason::HighValueEstate { value, threshold } => write!(
                f,
                "Your estate (£{}) is above £{}",
                group_thousands(*value),
                group_thousands(*threshold)
            ),
        }
    }
}

impl ComplexityThresholds {
    /// Every reason the estate counts as complex; empty means simple.
    pub fn reasons(&self, form: &FormState) -> Vec<ComplexityReason> {
        let estate = &form.estate;
        let mut reasons = Vec::new();
        if estate.has_overseas_assets {
            reasons.push(ComplexityReason::OverseasAssets);
        }
        if estate.has_business_assets {
            reasons.push(ComplexityReason::BusinessAssets);
        }
        if estate.has_trusts {
            reasons.push(ComplexityReason::Trusts);
        }
        if let Some(value) = estate.estate_value_amount() {
            if value > self.high_value_estate {
                reasons.push(ComplexityReason::HighValueEstate {
                    value,
                    threshold: self.high_value_estate,
                });
            }
        }
        reasons
    }

    pub fn is_complex(&self, form: &FormState) -> bool {
        !self.reasons(form).is_empty()
    }

    /// True when a declared estate value sits below the complex-assets threshold.
    /// An empty or unreadable value never skips.
    pub fn skips_complex_assets(&self, form: &FormState) -> bool {
        form.estate
            .estate_value_amount()
            .map(|value| value < self.complex_assets_skip)
            .unwrap_or(false)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
