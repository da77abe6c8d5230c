//! Record access service translating caller requests into store operations.

use crate::{
    config::NameSearchMode,
    metrics::{MetricsSnapshot, RecordMetrics},
    records::{
        types::{NotFound, RecordError, StoreHealthSnapshot, Student},
        validate::new_student_from_payload,
    },
    store::{NamePattern, StudentId, StudentStore},
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Stateless facade over the student collection.
///
/// Every operation is a single store round-trip; the service keeps nothing between requests
/// apart from the shared store handle and activity counters.
pub struct RecordService {
    store: Arc<dyn StudentStore>,
    name_search_mode: NameSearchMode,
    metrics: Arc<RecordMetrics>,
}

/// Abstraction over the record operations used by the HTTP surface.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Validate `payload` and persist a new student.
    async fn create(&self, payload: Value) -> Result<Student, RecordError>;

    /// Return every stored student.
    async fn list_all(&self) -> Result<Vec<Student>, RecordError>;

    /// Fetch one student by its string identifier.
    async fn get_by_id(&self, id: &str) -> Result<Student, RecordError>;

    /// Delete one student by its string identifier.
    async fn delete_by_id(&self, id: &str) -> Result<(), RecordError>;

    /// Return students whose name contains `fragment`, ignoring case.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, RecordError>;

    /// Ping the document store and report whether it answered.
    async fn store_health(&self) -> StoreHealthSnapshot;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl RecordService {
    /// Build a service over an already-connected store.
    pub fn new(store: Arc<dyn StudentStore>, name_search_mode: NameSearchMode) -> Self {
        Self {
            store,
            name_search_mode,
            metrics: Arc::new(RecordMetrics::new()),
        }
    }

    /// Validate the payload and insert exactly its `name` and `age`.
    pub async fn create(&self, payload: Value) -> Result<Student, RecordError> {
        let draft = new_student_from_payload(&payload)?;
        let id = self.store.insert(draft.clone()).await.inspect_err(|err| {
            tracing::error!(error = %err, "Failed to insert student");
        })?;
        self.metrics.record_created();
        tracing::info!(id = %id, name = %draft.name, "Student created");
        Ok(Student {
            id: id.to_string(),
            name: draft.name,
            age: draft.age,
        })
    }

    /// Return all students in the store's natural order.
    pub async fn list_all(&self) -> Result<Vec<Student>, RecordError> {
        let students = self.store.find_all().await.inspect_err(|err| {
            tracing::error!(error = %err, "Failed to list students");
        })?;
        tracing::debug!(count = students.len(), "Listed students");
        Ok(students.into_iter().map(Student::from).collect())
    }

    /// Fetch one student, failing with [`NotFound::Student`] when absent.
    pub async fn get_by_id(&self, id: &str) -> Result<Student, RecordError> {
        let id = StudentId::parse(id)?;
        match self.store.find_by_id(&id).await? {
            Some(stored) => Ok(Student::from(stored)),
            None => Err(self.miss(NotFound::Student, &id)),
        }
    }

    /// Delete one student, failing with [`NotFound::Student`] when nothing was removed.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), RecordError> {
        let id = StudentId::parse(id)?;
        let deleted = self.store.delete_by_id(&id).await.inspect_err(|err| {
            tracing::error!(id = %id, error = %err, "Failed to delete student");
        })?;
        if deleted == 0 {
            return Err(self.miss(NotFound::Student, &id));
        }
        self.metrics.record_deleted();
        tracing::info!(id = %id, "Student deleted");
        Ok(())
    }

    /// Case-insensitive substring search on names.
    ///
    /// An empty result is reported as [`NotFound::NameMatches`].
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, RecordError> {
        let pattern = NamePattern::new(fragment, self.name_search_mode)
            .map_err(|err| RecordError::InvalidPattern(err.to_string()))?;
        let matches = self.store.find_by_name(&pattern).await?;
        if matches.is_empty() {
            self.metrics.record_miss();
            tracing::debug!(fragment, "No students matched name fragment");
            return Err(RecordError::NotFound(NotFound::NameMatches));
        }
        tracing::debug!(fragment, matches = matches.len(), "Name search completed");
        Ok(matches.into_iter().map(Student::from).collect())
    }

    /// Ping the store and summarize the outcome.
    pub async fn store_health(&self) -> StoreHealthSnapshot {
        match self.store.ping().await {
            Ok(()) => StoreHealthSnapshot {
                reachable: true,
                error: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "Store health check failed");
                StoreHealthSnapshot {
                    reachable: false,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn miss(&self, what: NotFound, id: &StudentId) -> RecordError {
        self.metrics.record_miss();
        tracing::debug!(id = %id, "Student not found");
        RecordError::NotFound(what)
    }
}

#[async_trait]
impl RecordApi for RecordService {
    async fn create(&self, payload: Value) -> Result<Student, RecordError> {
        RecordService::create(self, payload).await
    }

    async fn list_all(&self) -> Result<Vec<Student>, RecordError> {
        RecordService::list_all(self).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Student, RecordError> {
        RecordService::get_by_id(self, id).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RecordError> {
        RecordService::delete_by_id(self, id).await
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, RecordError> {
        RecordService::search_by_name(self, fragment).await
    }

    async fn store_health(&self) -> StoreHealthSnapshot {
        RecordService::store_health(self).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        RecordService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::collections::HashSet;

    fn service_with(store: Arc<MemoryStore>, mode: NameSearchMode) -> RecordService {
        RecordService::new(store, mode)
    }

    fn service() -> (Arc<MemoryStore>, RecordService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), service_with(store, NameSearchMode::Literal))
    }

    #[tokio::test]
    async fn create_then_get_returns_equal_record() {
        let (_, service) = service();
        let created = service
            .create(json!({"name": "Bob", "age": 21}))
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Bob");
        assert_eq!(created.age, json!(21));

        let fetched = service.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(service.metrics_snapshot().students_created, 1);
    }

    #[tokio::test]
    async fn invalid_create_performs_no_insert() {
        let (store, service) = service();
        let err = service.create(json!({"name": "Bob"})).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_all_returns_every_created_record() {
        let (_, service) = service();
        assert!(service.list_all().await.unwrap().is_empty());

        let mut expected = HashSet::new();
        for (name, age) in [("Ann", 19), ("Ben", 20), ("Cy", 21)] {
            let created = service
                .create(json!({"name": name, "age": age}))
                .await
                .unwrap();
            expected.insert(created.id);
        }

        let listed: HashSet<_> = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found_second_time() {
        let (store, service) = service();
        let created = service
            .create(json!({"name": "Bob", "age": 21}))
            .await
            .unwrap();
        service
            .create(json!({"name": "Eve", "age": 22}))
            .await
            .unwrap();

        service.delete_by_id(&created.id).await.unwrap();
        let err = service.delete_by_id(&created.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.len().await, 1);

        let err = service.get_by_id(&created.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Student not found");

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.students_deleted, 1);
        assert_eq!(snapshot.lookups_missed, 2);
    }

    #[tokio::test]
    async fn malformed_identifiers_are_rejected_before_the_store() {
        let (_, service) = service();
        let err = service.get_by_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, RecordError::InvalidIdentifier(_)));
        let err = service.delete_by_id("123").await.unwrap_err();
        assert!(matches!(err, RecordError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let (_, service) = service();
        service
            .create(json!({"name": "Alice", "age": 30}))
            .await
            .unwrap();

        for fragment in ["alice", "ALI", "ice"] {
            let hits = service.search_by_name(fragment).await.unwrap();
            assert_eq!(hits.len(), 1, "fragment {fragment}");
            assert_eq!(hits[0].name, "Alice");
        }

        let err = service.search_by_name("zzz").await.unwrap_err();
        assert_eq!(err.to_string(), "No students found with the given name");
    }

    #[tokio::test]
    async fn search_mode_controls_metacharacters() {
        let store = Arc::new(MemoryStore::new());
        let literal = service_with(store.clone(), NameSearchMode::Literal);
        let raw = service_with(store, NameSearchMode::Raw);
        literal
            .create(json!({"name": "Alice", "age": 30}))
            .await
            .unwrap();

        assert!(literal.search_by_name("A.ice").await.unwrap_err().is_not_found());
        assert_eq!(raw.search_by_name("A.ice").await.unwrap().len(), 1);

        let err = raw.search_by_name("(").await.unwrap_err();
        assert!(matches!(err, RecordError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn raw_search_accepts_lookahead() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store, NameSearchMode::Raw);
        service
            .create(json!({"name": "Alice", "age": 30}))
            .await
            .unwrap();
        service
            .create(json!({"name": "Alan", "age": 31}))
            .await
            .unwrap();

        let hits = service.search_by_name("Al(?=i)").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Alice");
    }

    #[tokio::test]
    async fn non_string_names_are_stored_and_listed() {
        let (_, service) = service();
        let created = service
            .create(json!({"name": 7, "age": 21}))
            .await
            .unwrap();
        assert_eq!(created.name, json!(7));

        let listed = service.list_all().await.unwrap();
        assert_eq!(listed, vec![created]);
        assert!(service.search_by_name("7").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn memory_store_reports_healthy() {
        let (_, service) = service();
        let health = service.store_health().await;
        assert!(health.reachable);
        assert!(health.error.is_none());
    }
}
