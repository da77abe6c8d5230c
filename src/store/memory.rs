//! In-process student store with the same observable semantics as the MongoDB backend.

use super::{NamePattern, NewStudent, StoreError, StoredStudent, StudentId, StudentStore};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Student store kept entirely in memory, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    students: RwLock<Vec<StoredStudent>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of students currently held.
    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    /// Whether the store holds no students.
    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn insert(&self, student: NewStudent) -> Result<StudentId, StoreError> {
        let id = StudentId::generate();
        self.students
            .write()
            .await
            .push(StoredStudent::from_new(id, student));
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<StoredStudent>, StoreError> {
        Ok(self.students.read().await.clone())
    }

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<StoredStudent>, StoreError> {
        let guard = self.students.read().await;
        Ok(guard.iter().find(|student| &student.id == id).cloned())
    }

    async fn find_by_name(&self, pattern: &NamePattern) -> Result<Vec<StoredStudent>, StoreError> {
        let guard = self.students.read().await;
        Ok(guard
            .iter()
            .filter(|student| pattern.is_match(&student.name))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: &StudentId) -> Result<u64, StoreError> {
        let mut guard = self.students.write().await;
        match guard.iter().position(|student| &student.id == id) {
            Some(index) => {
                guard.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
