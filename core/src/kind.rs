//! Entity kinds and their storage names.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The business entities Wardbook stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Patient,
    Staff,
    StaffSchedule,
    ServiceWeekly,
}

impl EntityKind {
    /// Every kind, in a stable order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Patient,
        EntityKind::Staff,
        EntityKind::StaffSchedule,
        EntityKind::ServiceWeekly,
    ];

    /// Table (or collection) name for this kind.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Patient => "patients",
            EntityKind::Staff => "staff",
            EntityKind::StaffSchedule => "staff_schedule",
            EntityKind::ServiceWeekly => "services_weekly",
        }
    }

    /// Resolve a kind from its table name.
    pub fn from_table(table: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.table_name() == table)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_table(s).ok_or_else(|| CoreError::UnknownTable(s.to_string()))
    }
}
