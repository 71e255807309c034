//! Enumerated labels: staff roles and service names.
//!
//! Each label has one canonical spelling, which is what gets stored. Parsing
//! is tolerant of the legacy spellings found in older data (`ADMIN`,
//! `FRONT DESK`, mixed case) and always yields the canonical variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Fold a raw label to a comparable form: trimmed, lowercase, with spaces and
/// hyphens turned into underscores.
pub fn fold_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Role of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Doctor,
    Nurse,
    NursingAssistant,
    Admin,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Doctor,
        StaffRole::Nurse,
        StaffRole::NursingAssistant,
        StaffRole::Admin,
    ];

    /// Canonical stored spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Doctor => "doctor",
            StaffRole::Nurse => "nurse",
            StaffRole::NursingAssistant => "nursing_assistant",
            StaffRole::Admin => "admin",
        }
    }

    /// Canonical spellings of every role.
    pub fn canonical_names() -> &'static [&'static str] {
        &["doctor", "nurse", "nursing_assistant", "admin"]
    }
}

impl FromStr for StaffRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_label(s);
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == folded)
            .ok_or_else(|| CoreError::unknown_label("staff role", s))
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hospital service a patient, staff member or metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLabel {
    Emergency,
    Surgery,
    GeneralMedicine,
    #[serde(rename = "ICU")]
    Icu,
    FrontDesk,
}

impl ServiceLabel {
    pub const ALL: [ServiceLabel; 5] = [
        ServiceLabel::Emergency,
        ServiceLabel::Surgery,
        ServiceLabel::GeneralMedicine,
        ServiceLabel::Icu,
        ServiceLabel::FrontDesk,
    ];

    /// Canonical stored spelling. `ICU` keeps its upper case.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLabel::Emergency => "emergency",
            ServiceLabel::Surgery => "surgery",
            ServiceLabel::GeneralMedicine => "general_medicine",
            ServiceLabel::Icu => "ICU",
            ServiceLabel::FrontDesk => "front_desk",
        }
    }

    /// Canonical spellings of every service.
    pub fn canonical_names() -> &'static [&'static str] {
        &["emergency", "surgery", "general_medicine", "ICU", "front_desk"]
    }
}

impl FromStr for ServiceLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_label(s);
        Self::ALL
            .into_iter()
            .find(|service| service.as_str().to_ascii_lowercase() == folded)
            .ok_or_else(|| CoreError::unknown_label("service", s))
    }
}

impl fmt::Display for ServiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
