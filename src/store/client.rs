//! MongoDB-backed student store.

use super::{NamePattern, NewStudent, StoreError, StoredStudent, StudentId, StudentStore};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, Document, doc},
};
use serde_json::Value;

/// Thin wrapper over a MongoDB collection of student documents.
///
/// The driver client pools connections internally, so one instance is shared by every request.
pub struct MongoStudentStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl MongoStudentStore {
    /// Build a driver client for `uri` and bind it to `database.collection`.
    ///
    /// The driver connects lazily; call [`StudentStore::ping`] to confirm reachability.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        tracing::debug!(
            database = %database.name(),
            collection = %collection.name(),
            "Initialized MongoDB client"
        );
        Ok(Self {
            client,
            database,
            collection,
        })
    }

    /// Close pooled connections. Outstanding operations finish first.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }

    async fn collect(&self, filter: Document) -> Result<Vec<StoredStudent>, StoreError> {
        let documents: Vec<Document> = self.collection.find(filter).await?.try_collect().await?;
        documents.into_iter().map(decode_student).collect()
    }
}

#[async_trait]
impl StudentStore for MongoStudentStore {
    async fn insert(&self, student: NewStudent) -> Result<StudentId, StoreError> {
        let document = encode_student(&student);
        let result = self.collection.insert_one(document).await?;
        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(StudentId::from(oid)),
            other => Err(StoreError::UnexpectedInsertedId(other.to_string())),
        }
    }

    async fn find_all(&self) -> Result<Vec<StoredStudent>, StoreError> {
        self.collect(doc! {}).await
    }

    async fn find_by_id(&self, id: &StudentId) -> Result<Option<StoredStudent>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.object_id() })
            .await?
            .map(decode_student)
            .transpose()
    }

    async fn find_by_name(&self, pattern: &NamePattern) -> Result<Vec<StoredStudent>, StoreError> {
        self.collect(doc! {
            "name": { "$regex": pattern.source(), "$options": "i" }
        })
        .await
    }

    async fn delete_by_id(&self, id: &StudentId) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

fn encode_student(student: &NewStudent) -> Document {
    doc! {
        "name": json_to_bson(&student.name),
        "age": json_to_bson(&student.age),
    }
}

/// Convert caller-supplied JSON into BSON without failing.
///
/// Integers that fit `i64` stay integral; larger unsigned values become doubles since BSON has
/// no unsigned 64-bit type.
fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(flag) => Bson::Boolean(*flag),
        Value::Number(number) => match (number.as_i64(), number.as_u64(), number.as_f64()) {
            (Some(int), _, _) => Bson::Int64(int),
            (None, Some(unsigned), _) => Bson::Double(unsigned as f64),
            (None, None, Some(float)) => Bson::Double(float),
            (None, None, None) => Bson::String(number.to_string()),
        },
        Value::String(text) => Bson::String(text.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(fields) => Bson::Document(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), json_to_bson(value)))
                .collect(),
        ),
    }
}

fn decode_student(document: Document) -> Result<StoredStudent, StoreError> {
    let id = document
        .get_object_id("_id")
        .map_err(|err| StoreError::MalformedDocument {
            field: "_id",
            reason: err.to_string(),
        })?;

    Ok(StoredStudent {
        id: StudentId::from(id),
        name: required_field(&document, "name")?,
        age: required_field(&document, "age")?,
    })
}

fn required_field(document: &Document, field: &'static str) -> Result<Value, StoreError> {
    match document.get(field) {
        Some(Bson::Null) | None => Err(StoreError::MalformedDocument {
            field,
            reason: "is missing".into(),
        }),
        Some(value) => Ok(value.clone().into_relaxed_extjson()),
    }
}
