//! # ForumError
//!
//! Every rejected mutation intent comes back as one of these variants so the
//! presentation layer can render an accurate message. None of them are fatal.

use crate::ids::{ChildCount, EntityKind, ThreadId};
use thiserror::Error;

/// The error type for all forum content operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForumError {
    /// Operation targeted an id that does not exist.
    #[error("{kind} not found with ID {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Parent still owns children; nothing was changed.
    #[error("{kind} {id} cannot be deleted: contains {children}")]
    DeletionBlocked {
        kind: EntityKind,
        id: String,
        children: ChildCount,
    },

    /// Actor lacks the required role or ownership.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Reply attempted on a locked thread by a non-admin.
    #[error("thread {0} is locked")]
    ThreadLocked(ThreadId),

    /// Malformed input (e.g. title or content outside its length bounds).
    #[error("validation error: {field}: {message}")]
    ValidationFailed { field: &'static str, message: String },
}

impl ForumError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound { kind, id: id.to_string() }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied(reason.into())
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::ValidationFailed { field, message: message.into() }
    }

    /// Number of blocking children when this is a [`ForumError::DeletionBlocked`].
    pub fn blocking_children(&self) -> Option<usize> {
        match self {
            Self::DeletionBlocked { children, .. } => Some(children.count),
            _ => None,
        }
    }
}

/// A specialized Result type for forum content logic.
pub type Result<T> = std::result::Result<T, ForumError>;
