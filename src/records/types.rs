//! Record-level data types and error definitions.

use crate::store::{InvalidStudentId, StoreError, StoredStudent};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// What a not-found outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// No student carries the requested identifier.
    Student,
    /// No student name matched the search fragment.
    NameMatches,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Student => "Student not found",
            Self::NameMatches => "No students found with the given name",
        })
    }
}

/// Errors emitted by the record access service.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The create payload lacked a required field or carried an unusable one.
    #[error("{0}")]
    Validation(String),
    /// The identifier could not be converted to the store's native form.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidStudentId),
    /// A raw-mode search fragment was not a valid pattern.
    #[error("Invalid name pattern: {0}")]
    InvalidPattern(String),
    /// Lookup, delete, or search matched nothing.
    #[error("{0}")]
    NotFound(NotFound),
    /// The document store failed.
    #[error("Store request failed: {0}")]
    Store(#[from] StoreError),
}

impl RecordError {
    /// Whether this error reports an absent record rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Student as exposed to callers, with the identifier in its string form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    /// Hex form of the store-assigned identifier.
    pub id: String,
    /// Display name exactly as submitted.
    pub name: Value,
    /// Age exactly as submitted.
    pub age: Value,
}

impl From<StoredStudent> for Student {
    fn from(stored: StoredStudent) -> Self {
        Self {
            id: stored.id.to_string(),
            name: stored.name,
            age: stored.age,
        }
    }
}

/// Reachability snapshot for the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHealthSnapshot {
    /// Whether the store answered a ping.
    pub reachable: bool,
    /// Diagnostic captured when the ping failed.
    pub error: Option<String>,
}
