//! Scenario definitions.
//!
//! A scenario is an ordered list of write steps. Rows created by a step are
//! named by an alias so later steps can target them without knowing the
//! key the backend assigned.

use wardbook_core::{EntityKind, Fields};
use wardbook_mutation::WriteKind;

use crate::assertion::Assertion;

/// Key used for steps that target a row that never existed.
pub const GHOST_KEY: &str = "ghost-0000";

/// What a step does.
#[derive(Debug, Clone)]
pub enum Action {
    Create {
        alias: String,
        kind: EntityKind,
        fields: Fields,
    },
    Replace {
        alias: String,
        fields: Fields,
    },
    Patch {
        alias: String,
        fields: Fields,
    },
    Delete {
        alias: String,
    },
    /// A keyed write against [`GHOST_KEY`].
    Ghost {
        kind: EntityKind,
        write: WriteKind,
        fields: Fields,
    },
}

impl Action {
    /// Alias of the row this step targets, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Action::Create { alias, .. }
            | Action::Replace { alias, .. }
            | Action::Patch { alias, .. }
            | Action::Delete { alias } => Some(alias),
            Action::Ghost { .. } => None,
        }
    }
}

/// One named step.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub action: Action,
    pub assertion: Assertion,
}

/// An ordered list of steps.
#[derive(Debug)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
        }
    }

    fn step<F>(mut self, name: &str, action: Action, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.steps.push(Step {
            name: name.to_string(),
            action,
            assertion: f(Assertion::new()),
        });
        self
    }

    pub fn create<F>(self, name: &str, alias: &str, kind: EntityKind, fields: Fields, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let action = Action::Create {
            alias: alias.to_string(),
            kind,
            fields,
        };
        self.step(name, action, f)
    }

    pub fn replace<F>(self, name: &str, alias: &str, fields: Fields, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let action = Action::Replace {
            alias: alias.to_string(),
            fields,
        };
        self.step(name, action, f)
    }

    pub fn patch<F>(self, name: &str, alias: &str, fields: Fields, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let action = Action::Patch {
            alias: alias.to_string(),
            fields,
        };
        self.step(name, action, f)
    }

    pub fn delete<F>(self, name: &str, alias: &str, f: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        let action = Action::Delete {
            alias: alias.to_string(),
        };
        self.step(name, action, f)
    }

    pub fn ghost<F>(
        self,
        name: &str,
        kind: EntityKind,
        write: WriteKind,
        fields: Fields,
        f: F,
    ) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.step(name, Action::Ghost { kind, write, fields }, f)
    }
}
