//! Business rules: ranges and date ordering.

use wardbook_core::{EntityKind, Fields, Value};

use crate::{RuleError, Violation, Violations};

/// A cross-field or range rule. Rules only look at present, non-null values
/// of the expected type; anything else is the shape check's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Integer field within inclusive bounds.
    Range {
        field: &'static str,
        min: Option<i64>,
        max: Option<i64>,
    },
    /// Date field not earlier than another date field.
    NotBefore {
        field: &'static str,
        earlier: &'static str,
    },
}

impl Rule {
    fn score(field: &'static str) -> Self {
        Rule::Range {
            field,
            min: Some(0),
            max: Some(100),
        }
    }

    fn non_negative(field: &'static str) -> Self {
        Rule::Range {
            field,
            min: Some(0),
            max: None,
        }
    }

    /// Check this rule, returning a violation if it is broken.
    pub fn check(&self, candidate: &Fields) -> Option<Violation> {
        match self {
            Rule::Range { field, min, max } => {
                let value = candidate.get(*field).and_then(Value::as_int)?;
                let below = min.is_some_and(|min| value < min);
                let above = max.is_some_and(|max| value > max);
                (below || above).then(|| Violation::new(*field, format!("{}={}", field, value)))
            }
            Rule::NotBefore { field, earlier } => {
                let later = candidate.get(*field).and_then(Value::as_date)?;
                let first = candidate.get(*earlier).and_then(Value::as_date)?;
                (later < first).then(|| {
                    Violation::new(
                        *field,
                        format!("{}={} before {}={}", field, later, earlier, first),
                    )
                })
            }
        }
    }
}

/// Rules for an entity kind, in reporting order.
pub fn rules_for(kind: EntityKind) -> Vec<Rule> {
    match kind {
        EntityKind::Patient => vec![
            Rule::score("satisfaction"),
            Rule::non_negative("age"),
            Rule::NotBefore {
                field: "departure_date",
                earlier: "arrival_date",
            },
        ],
        EntityKind::ServiceWeekly => vec![
            Rule::Range {
                field: "week",
                min: Some(1),
                max: Some(53),
            },
            Rule::Range {
                field: "month",
                min: Some(1),
                max: Some(12),
            },
            Rule::non_negative("available_beds"),
            Rule::non_negative("patients_request"),
            Rule::non_negative("patients_admitted"),
            Rule::non_negative("patients_refused"),
            Rule::score("patient_satisfaction"),
            Rule::score("staff_morale"),
        ],
        EntityKind::Staff | EntityKind::StaffSchedule => Vec::new(),
    }
}

/// Validate every rule for the kind, collecting all violations.
pub fn validate_rules(kind: EntityKind, candidate: &Fields) -> Result<(), RuleError> {
    let mut violations = Violations::new();
    for rule in rules_for(kind) {
        if let Some(violation) = rule.check(candidate) {
            violations.push(violation);
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(RuleError { violations })
    }
}
