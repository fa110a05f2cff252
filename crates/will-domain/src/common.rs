//! Section keys and the wizard cursor.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
/// Fixed, ordered sections of the will wizard.
pub enum SectionKey {
    Personal,
    Estate,
    Executors,
    Beneficiaries,
    Wishes,
    Legal,
}

impl SectionKey {
    pub const ALL: [SectionKey; 6] = [
        SectionKey::Personal,
        SectionKey::Estate,
        SectionKey::Executors,
        SectionKey::Beneficiaries,
        SectionKey::Wishes,
        SectionKey::Legal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Personal => "personal",
            SectionKey::Estate => "estate",
            SectionKey::Executors => "executors",
            SectionKey::Beneficiaries => "beneficiaries",
            SectionKey::Wishes => "wishes",
            SectionKey::Legal => "legal",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKey::Personal => "About You",
            SectionKey::Estate => "Your Estate",
            SectionKey::Executors => "Executors",
            SectionKey::Beneficiaries => "Beneficiaries",
            SectionKey::Wishes => "Your Wishes",
            SectionKey::Legal => "Legal Declarations",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when a string does not name a known section.
pub struct ParseSectionError(pub String);

impl fmt::Display for ParseSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section `{}`", self.0)
    }
}

impl std::error::Error for ParseSectionError {}

impl FromStr for SectionKey {
    type Err = ParseSectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        SectionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| ParseSectionError(value.trim().to_string()))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Current `(section, step)` position in the wizard.
pub struct NavigationCursor {
    pub section: SectionKey,
    pub step: usize,
}

impl NavigationCursor {
    pub fn new(section: SectionKey, step: usize) -> Self {
        Self { section, step }
    }

    pub fn section_start(section: SectionKey) -> Self {
        Self::new(section, 0)
    }
}

impl Default for NavigationCursor {
    fn default() -> Self {
        Self::section_start(SectionKey::Personal)
    }
}

impl fmt::Display for NavigationCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.section, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_keys_parse_case_insensitively() {
        assert_eq!("Estate".parse::<SectionKey>(), Ok(SectionKey::Estate));
        assert_eq!(" legal ".parse::<SectionKey>(), Ok(SectionKey::Legal));
        assert!("assets".parse::<SectionKey>().is_err());
    }

    #[test]
    fn section_keys_serialize_lowercase() {
        let json = serde_json::to_string(&SectionKey::Beneficiaries).unwrap();
        assert_eq!(json, "\"beneficiaries\"");
    }
}
