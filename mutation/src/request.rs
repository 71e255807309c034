//! Write requests.

use std::fmt;
use wardbook_core::{EntityKind, Fields, RowKey};

/// Kind of write a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    /// Full replace: absent nullable fields become null.
    Replace,
    /// Partial update: only the supplied fields change.
    Patch,
    Delete,
}

impl WriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Create => "create",
            WriteKind::Replace => "replace",
            WriteKind::Patch => "patch",
            WriteKind::Delete => "delete",
        }
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound write.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    pub kind: EntityKind,
    pub write: WriteKind,
    /// Target row; `None` only for creates.
    pub key: Option<RowKey>,
    /// Supplied fields. For patches, absence means "leave alone" and an
    /// explicit null means "clear".
    pub fields: Fields,
    /// Overrides the configured actor for audit records.
    pub actor: Option<String>,
}

impl MutationRequest {
    fn new(kind: EntityKind, write: WriteKind, key: Option<RowKey>, fields: Fields) -> Self {
        Self {
            kind,
            write,
            key,
            fields,
            actor: None,
        }
    }

    pub fn create(kind: EntityKind, fields: Fields) -> Self {
        Self::new(kind, WriteKind::Create, None, fields)
    }

    pub fn replace(kind: EntityKind, key: impl Into<RowKey>, fields: Fields) -> Self {
        Self::new(kind, WriteKind::Replace, Some(key.into()), fields)
    }

    pub fn patch(kind: EntityKind, key: impl Into<RowKey>, fields: Fields) -> Self {
        Self::new(kind, WriteKind::Patch, Some(key.into()), fields)
    }

    pub fn delete(kind: EntityKind, key: impl Into<RowKey>) -> Self {
        Self::new(kind, WriteKind::Delete, Some(key.into()), Fields::new())
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}
