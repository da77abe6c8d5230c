//! Document store integration for student records.

pub mod client;
pub mod filter;
pub mod memory;
pub mod types;

pub use client::MongoStudentStore;
pub use filter::{NamePattern, PatternError};
pub use memory::MemoryStore;
pub use types::{InvalidStudentId, NewStudent, StoreError, StoredStudent, StudentId};

use async_trait::async_trait;

/// Operations the record service needs from a document store.
///
/// Implementations must be safe to share across concurrent requests; single-document atomicity
/// is whatever the backend provides.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Persist a new student and return the identifier the store assigned.
    async fn insert(&self, student: NewStudent) -> Result<StudentId, StoreError>;

    /// Return every student in the store's natural iteration order.
    async fn find_all(&self) -> Result<Vec<StoredStudent>, StoreError>;

    /// Look up a single student by identifier.
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<StoredStudent>, StoreError>;

    /// Return all students whose name satisfies `pattern`.
    async fn find_by_name(&self, pattern: &NamePattern) -> Result<Vec<StoredStudent>, StoreError>;

    /// Remove at most one student, returning how many documents were deleted.
    async fn delete_by_id(&self, id: &StudentId) -> Result<u64, StoreError>;

    /// Round-trip to the backend to confirm it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
