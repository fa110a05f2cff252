//! Keeps beneficiary percentage shares coherent.
//!
//! Every operation here is a policy correction rather than a failure: values
//! that would push the total past 100% are clamped, new entrants get a share
//! based on what is left, and presets that cannot be filled are refused.
//! Outcomes worth telling the user about come back as [`AllocationNotice`].

use std::{fmt, str::FromStr};

use tracing::{debug, warn};
use uuid::Uuid;
use will_domain::{AdditionalBeneficiary, Beneficiaries};

use crate::CoreError;

pub const FULL_ALLOCATION: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationNotice {
    /// The edited share was lowered so the total stays at 100%.
    Clamped { requested: u32, applied: u32 },
    /// The first additional beneficiary split the estate 50/50 with the main one.
    SplitWithMain { share: u32 },
    /// A new beneficiary received whatever was unallocated.
    AssignedRemainder { share: u32 },
    /// Everything was already allocated; the new beneficiary starts at 0%.
    ManualRebalanceRequired,
    NothingToDistribute,
    PresetUnavailable {
        preset: Preset,
        required: usize,
        available: usize,
    },
}

impl AllocationNotice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            AllocationNotice::Clamped { .. }
            | AllocationNotice::SplitWithMain { .. }
            | AllocationNotice::AssignedRemainder { .. }
            | AllocationNotice::NothingToDistribute => NoticeLevel::Info,
            AllocationNotice::ManualRebalanceRequired
            | AllocationNotice::PresetUnavailable { .. } => NoticeLevel::Warning,
        }
    }
}

impl fmt::Display for AllocationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationNotice::Clamped { requested, applied } => write!(
                f,
                "{}% would take the total over 100%, so the share was set to {}%",
                requested, applied
            ),
            AllocationNotice::SplitWithMain { share } => write!(
                f,
                "The estate is now split {}/{} with your main beneficiary",
                share, share
            ),
            AllocationNotice::AssignedRemainder { share } => {
                write!(f, "The new beneficiary received the remaining {}%", share)
            }
            AllocationNotice::ManualRebalanceRequired => f.write_str(
                "100% is already allocated. The new beneficiary starts at 0%; adjust the shares manually",
            ),
            AllocationNotice::NothingToDistribute => {
                f.write_str("There is no unallocated share to distribute")
            }
            AllocationNotice::PresetUnavailable {
                preset,
                required,
                available,
            } => write!(
                f,
                "The {} split needs {} additional beneficiaries but you have {}",
                preset, required, available
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Fixed splits across the main beneficiary and the first additional ones.
pub enum Preset {
    FiftyFifty,
    ThreeWay,
    FourWay,
    SixtyForty,
    SeventyThirty,
    EightyTwenty,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::FiftyFifty,
        Preset::ThreeWay,
        Preset::FourWay,
        Preset::SixtyForty,
        Preset::SeventyThirty,
        Preset::EightyTwenty,
    ];

    /// Main beneficiary first, then additional beneficiaries in list order.
    /// The three-way split hands the odd percent to the main beneficiary.
    pub fn shares(self) -> &'static [u32] {
        match self {
            Preset::FiftyFifty => &[50, 50],
            Preset::ThreeWay => &[34, 33, 33],
            Preset::FourWay => &[25, 25, 25, 25],
            Preset::SixtyForty => &[60, 40],
            Preset::SeventyThirty => &[70, 30],
            Preset::EightyTwenty => &[80, 20],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::FiftyFifty => "50/50",
            Preset::ThreeWay => "33/33/33",
            Preset::FourWay => "25/25/25/25",
            Preset::SixtyForty => "60/40",
            Preset::SeventyThirty => "70/30",
            Preset::EightyTwenty => "80/20",
        }
    }

    pub fn additional_slots(self) -> usize {
        self.shares().len() - 1
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "50/50" | "50-50" => Ok(Preset::FiftyFifty),
            "33/33/33" | "33-33-33" | "thirds" => Ok(Preset::ThreeWay),
            "25/25/25/25" | "25x4" | "quarters" => Ok(Preset::FourWay),
            "60/40" | "60-40" => Ok(Preset::SixtyForty),
            "70/30" | "70-30" => Ok(Preset::SeventyThirty),
            "80/20" | "80-20" => Ok(Preset::EightyTwenty),
            other => Err(format!("unknown split `{}`", other)),
        }
    }
}

/// Percentage policy over the main and additional beneficiaries.
pub struct AllocationTracker;

impl AllocationTracker {
    /// Literal sum of the stored shares.
    pub fn total(beneficiaries: &Beneficiaries) -> u32 {
        beneficiaries.main_percentage()
            + beneficiaries
                .additional_beneficiaries
                .iter()
                .map(|beneficiary| beneficiary.percentage)
                .sum::<u32>()
    }

    pub fn unallocated(beneficiaries: &Beneficiaries) -> u32 {
        FULL_ALLOCATION.saturating_sub(Self::total(beneficiaries))
    }

    pub fn set_main_percentage(
        beneficiaries: &mut Beneficiaries,
        requested: u32,
    ) -> Option<AllocationNotice> {
        let others = Self::total(beneficiaries) - beneficiaries.main_percentage();
        let (applied, notice) = clamp(requested, others);
        beneficiaries.main_mut().percentage = Some(applied);
        notice
    }

    pub fn set_additional_percentage(
        beneficiaries: &mut Beneficiaries,
        id: Uuid,
        requested: u32,
    ) -> Result<Option<AllocationNotice>, CoreError> {
        let current = beneficiaries
            .additional(id)
            .map(|beneficiary| beneficiary.percentage)
            .ok_or(CoreError::BeneficiaryNotFound(id))?;
        let others = Self::total(beneficiaries) - current;
        let (applied, notice) = clamp(requested, others);
        if let Some(beneficiary) = beneficiaries.additional_mut(id) {
            beneficiary.percentage = applied;
        }
        Ok(notice)
    }

    /// Appends a beneficiary and gives them a starting share.
    pub fn add_beneficiary(
        beneficiaries: &mut Beneficiaries,
        full_name: impl Into<String>,
        relationship: impl Into<String>,
    ) -> (Uuid, Option<AllocationNotice>) {
        let mut entrant = AdditionalBeneficiary::new(full_name, relationship);
        let id = entrant.id;
        let total = Self::total(beneficiaries);

        let notice = if total >= FULL_ALLOCATION {
            entrant.percentage = 0;
            AllocationNotice::ManualRebalanceRequired
        } else if beneficiaries.additional_beneficiaries.is_empty() {
            let share = FULL_ALLOCATION / 2;
            beneficiaries.main_mut().percentage = Some(share);
            entrant.percentage = share;
            AllocationNotice::SplitWithMain { share }
        } else {
            entrant.percentage = FULL_ALLOCATION - total;
            AllocationNotice::AssignedRemainder {
                share: entrant.percentage,
            }
        };

        debug!(%id, share = entrant.percentage, "beneficiary added");
        beneficiaries.additional_beneficiaries.push(entrant);
        (id, Some(notice))
    }

    /// Removes a beneficiary. Shares are not rebalanced afterwards.
    pub fn remove_beneficiary(
        beneficiaries: &mut Beneficiaries,
        id: Uuid,
    ) -> Result<AdditionalBeneficiary, CoreError> {
        let index = beneficiaries
            .additional_beneficiaries
            .iter()
            .position(|beneficiary| beneficiary.id == id)
            .ok_or(CoreError::BeneficiaryNotFound(id))?;
        Ok(beneficiaries.additional_beneficiaries.remove(index))
    }

    /// Spreads the unallocated share over the additional beneficiaries; the
    /// first one absorbs any remainder.
    pub fn distribute_remaining(beneficiaries: &mut Beneficiaries) -> Option<AllocationNotice> {
        let remaining = Self::unallocated(beneficiaries);
        let count = beneficiaries.additional_beneficiaries.len() as u32;
        if remaining == 0 || count == 0 {
            return Some(AllocationNotice::NothingToDistribute);
        }
        let each = remaining / count;
        let leftover = remaining % count;
        for (index, beneficiary) in beneficiaries
            .additional_beneficiaries
            .iter_mut()
            .enumerate()
        {
            beneficiary.percentage += each;
            if index == 0 {
                beneficiary.percentage += leftover;
            }
        }
        None
    }

    /// Resets every share to an even split of 100; the main beneficiary takes
    /// any remainder.
    pub fn distribute_equally(beneficiaries: &mut Beneficiaries) {
        let count = beneficiaries.additional_beneficiaries.len() as u32 + 1;
        let share = FULL_ALLOCATION / count;
        let leftover = FULL_ALLOCATION % count;
        beneficiaries.main_mut().percentage = Some(share + leftover);
        for beneficiary in &mut beneficiaries.additional_beneficiaries {
            beneficiary.percentage = share;
        }
    }

    /// Applies a fixed split, or refuses without touching anything when there
    /// are too few additional beneficiaries to fill it.
    pub fn apply_preset(
        beneficiaries: &mut Beneficiaries,
        preset: Preset,
    ) -> Option<AllocationNotice> {
        let required = preset.additional_slots();
        let available = beneficiaries.additional_beneficiaries.len();
        if available < required {
            warn!(%preset, required, available, "preset refused");
            return Some(AllocationNotice::PresetUnavailable {
                preset,
                required,
                available,
            });
        }
        let shares = preset.shares();
        beneficiaries.main_mut().percentage = Some(shares[0]);
        for (index, beneficiary) in beneficiaries
            .additional_beneficiaries
            .iter_mut()
            .enumerate()
        {
            beneficiary.percentage = shares.get(index + 1).copied().unwrap_or(0);
        }
        None
    }
}

fn clamp(requested: u32, others: u32) -> (u32, Option<AllocationNotice>) {
    let ceiling = FULL_ALLOCATION.saturating_sub(others);
    if requested > ceiling {
        warn!(requested, applied = ceiling, "share clamped");
        (
            ceiling,
            Some(AllocationNotice::Clamped {
                requested,
                applied: ceiling,
            }),
        )
    } else {
        (requested, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_main(share: u32) -> Beneficiaries {
        let mut beneficiaries = Beneficiaries::default();
        beneficiaries.main_mut().percentage = Some(share);
        beneficiaries
    }

    fn shares(beneficiaries: &Beneficiaries) -> Vec<u32> {
        std::iter::once(beneficiaries.main_percentage())
            .chain(
                beneficiaries
                    .additional_beneficiaries
                    .iter()
                    .map(|b| b.percentage),
            )
            .collect()
    }

    #[test]
    fn main_edit_is_clamped_against_others() {
        let mut beneficiaries = with_main(50);
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Bea", "Niece");
        let notice = AllocationTracker::set_main_percentage(&mut beneficiaries, 80);
        assert_eq!(
            notice,
            Some(AllocationNotice::Clamped {
                requested: 80,
                applied: 50
            })
        );
        assert_eq!(AllocationTracker::total(&beneficiaries), 100);
    }

    #[test]
    fn additional_edit_is_clamped() {
        let mut beneficiaries = with_main(10);
        let (id, _) = AllocationTracker::add_beneficiary(&mut beneficiaries, "Cal", "Son");
        AllocationTracker::set_main_percentage(&mut beneficiaries, 70);
        let notice =
            AllocationTracker::set_additional_percentage(&mut beneficiaries, id, 45).unwrap();
        assert_eq!(
            notice,
            Some(AllocationNotice::Clamped {
                requested: 45,
                applied: 30
            })
        );
    }

    #[test]
    fn unknown_beneficiary_is_reported() {
        let mut beneficiaries = with_main(10);
        let err = AllocationTracker::set_additional_percentage(
            &mut beneficiaries,
            Uuid::new_v4(),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::BeneficiaryNotFound(_)));
    }

    #[test]
    fn first_addition_splits_with_main() {
        let mut beneficiaries = with_main(70);
        let (_, notice) = AllocationTracker::add_beneficiary(&mut beneficiaries, "Dee", "Friend");
        assert_eq!(notice, Some(AllocationNotice::SplitWithMain { share: 50 }));
        assert_eq!(shares(&beneficiaries), vec![50, 50]);
    }

    #[test]
    fn later_additions_take_remainder() {
        let mut beneficiaries = with_main(40);
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Eve", "Friend");
        AllocationTracker::set_main_percentage(&mut beneficiaries, 30);
        let (_, notice) = AllocationTracker::add_beneficiary(&mut beneficiaries, "Fay", "Aunt");
        assert_eq!(notice, Some(AllocationNotice::AssignedRemainder { share: 20 }));
        assert_eq!(shares(&beneficiaries), vec![30, 50, 20]);
    }

    #[test]
    fn full_allocation_gives_new_entrant_zero() {
        let mut beneficiaries = with_main(100);
        let (_, notice) = AllocationTracker::add_beneficiary(&mut beneficiaries, "Gil", "Cousin");
        assert_eq!(notice, Some(AllocationNotice::ManualRebalanceRequired));
        assert_eq!(shares(&beneficiaries), vec![100, 0]);
        assert_eq!(notice.unwrap().level(), NoticeLevel::Warning);
    }

    #[test]
    fn removal_does_not_rebalance() {
        let mut beneficiaries = with_main(0);
        let (id, _) = AllocationTracker::add_beneficiary(&mut beneficiaries, "Hal", "Son");
        AllocationTracker::remove_beneficiary(&mut beneficiaries, id).unwrap();
        assert_eq!(AllocationTracker::total(&beneficiaries), 50);
    }

    #[test]
    fn distribute_remaining_gives_leftover_to_first() {
        let mut beneficiaries = with_main(0);
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Ivy", "Friend");
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Jon", "Friend");
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Kit", "Friend");
        for beneficiary in &mut beneficiaries.additional_beneficiaries {
            beneficiary.percentage = 0;
        }
        AllocationTracker::set_main_percentage(&mut beneficiaries, 50);
        assert_eq!(AllocationTracker::distribute_remaining(&mut beneficiaries), None);
        assert_eq!(shares(&beneficiaries), vec![50, 18, 16, 16]);
    }

    #[test]
    fn distribute_remaining_without_remainder_is_noop() {
        let mut beneficiaries = with_main(100);
        assert_eq!(
            AllocationTracker::distribute_remaining(&mut beneficiaries),
            Some(AllocationNotice::NothingToDistribute)
        );
    }

    #[test]
    fn equal_split_gives_remainder_to_main() {
        let mut beneficiaries = with_main(10);
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Lou", "Friend");
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Max", "Friend");
        AllocationTracker::distribute_equally(&mut beneficiaries);
        assert_eq!(shares(&beneficiaries), vec![34, 33, 33]);
    }

    #[test]
    fn presets_zero_beneficiaries_past_their_slots() {
        let mut beneficiaries = with_main(0);
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Ned", "Friend");
        AllocationTracker::add_beneficiary(&mut beneficiaries, "Oli", "Friend");
        assert_eq!(
            AllocationTracker::apply_preset(&mut beneficiaries, Preset::SeventyThirty),
            None
        );
        assert_eq!(shares(&beneficiaries), vec![70, 30, 0]);
    }

    #[test]
    fn preset_labels_parse() {
        for preset in Preset::ALL {
            assert_eq!(preset.label().parse::<Preset>(), Ok(preset));
            assert_eq!(preset.shares().iter().sum::<u32>(), FULL_ALLOCATION);
        }
        assert_eq!("25x4".parse::<Preset>(), Ok(Preset::FourWay));
    }
}
