//! Shared types used by the student store implementations.

use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned while interacting with the backing document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver reported a failure (connection, command, or cursor).
    #[error("MongoDB request failed: {0}")]
    Driver(#[from] mongodb::error::Error),
    /// An insert succeeded but the store did not hand back an ObjectId.
    #[error("Store returned a non-ObjectId identifier: {0}")]
    UnexpectedInsertedId(String),
    /// A stored document lacked a field every student must carry.
    #[error("Malformed student document: field '{field}' {reason}")]
    MalformedDocument {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Raised when an identifier string is not a valid ObjectId.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid student id: '{raw}'")]
pub struct InvalidStudentId {
    /// The identifier exactly as the caller supplied it.
    pub raw: String,
}

/// Store-native identifier of a student document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentId(ObjectId);

impl StudentId {
    /// Parse the external string form (24 hex characters) into a store identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidStudentId> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidStudentId {
                raw: raw.to_string(),
            })
    }

    /// Allocate a fresh identifier the same way the store would.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Underlying BSON ObjectId.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for StudentId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl FromStr for StudentId {
    type Err = InvalidStudentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// Validated fields of a student that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    /// Display name exactly as submitted; usually, but not necessarily, a string.
    pub name: Value,
    /// Age exactly as submitted; no type or range is enforced.
    pub age: Value,
}

/// Student document as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredStudent {
    /// Identifier assigned by the store at insert time.
    pub id: StudentId,
    /// Display name exactly as stored.
    pub name: Value,
    /// Age exactly as stored.
    pub age: Value,
}

impl StoredStudent {
    /// Attach a store-assigned identifier to freshly inserted fields.
    pub fn from_new(id: StudentId, student: NewStudent) -> Self {
        Self {
            id,
            name: student.name,
            age: student.age,
        }
    }
}
