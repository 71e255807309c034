//! Wardbook Constraint
//!
//! Validate candidate records before they reach storage.
//!
//! Responsibilities:
//! - Check a record against its declared shape contract (first mismatch wins,
//!   in declaration order)
//! - Check cross-field and range rules, collecting every violation
//! - Produce messages fit for the rejection log
//!
//! Both validators are pure and know nothing about storage.

mod error;
mod rules;
mod shape;
mod violation;

pub use error::{RuleError, ShapeError};
pub use rules::{rules_for, validate_rules, Rule};
pub use shape::validate_shape;
pub use violation::{Violation, Violations};
