//! Per-request pipeline state.
//!
//! ```text
//! Received -> ShapeChecked -> RuleChecked -> Applied
//!     \             \              \
//!      +-------------+--------------+-> Rejected
//! ```
//!
//! Paths that skip a check (deletes, the document backend's missing rule
//! step) move straight to the next state they reach.

use std::fmt;
use tracing::debug;
use wardbook_core::EntityKind;

use crate::request::WriteKind;

/// Where a request is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    ShapeChecked,
    RuleChecked,
    Applied,
    Rejected,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Received => "RECEIVED",
            PipelineState::ShapeChecked => "SHAPE_CHECKED",
            PipelineState::RuleChecked => "RULE_CHECKED",
            PipelineState::Applied => "APPLIED",
            PipelineState::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Applied | PipelineState::Rejected)
    }

    /// Whether `next` may follow this state.
    pub fn can_advance_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Received, ShapeChecked | Applied | Rejected) => true,
            (ShapeChecked, RuleChecked | Applied | Rejected) => true,
            (RuleChecked, Applied | Rejected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one request through the pipeline and logs every transition.
#[derive(Debug)]
pub struct Progress {
    kind: EntityKind,
    write: WriteKind,
    state: PipelineState,
}

impl Progress {
    pub fn start(kind: EntityKind, write: WriteKind) -> Self {
        debug!(
            table = kind.table_name(),
            write = %write,
            state = %PipelineState::Received,
            "request received"
        );
        Self {
            kind,
            write,
            state: PipelineState::Received,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Move to `next`. Illegal moves are ignored and logged; they indicate a
    /// pipeline bug, not a bad request.
    pub fn advance(&mut self, next: PipelineState) {
        if !self.state.can_advance_to(next) {
            debug!(
                table = self.kind.table_name(),
                write = %self.write,
                from = %self.state,
                to = %next,
                "ignored illegal pipeline transition"
            );
            return;
        }
        debug!(
            table = self.kind.table_name(),
            write = %self.write,
            from = %self.state,
            to = %next,
            "pipeline transition"
        );
        self.state = next;
    }
}
