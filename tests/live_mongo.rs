use std::sync::Arc;

use serde_json::json;
use student_registry::{
    config::{Config, NameSearchMode},
    records::RecordService,
    store::{MongoStudentStore, StudentStore},
};

async fn live_store() -> Arc<MongoStudentStore> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("MONGODB_URI or ANKIT_MONGO_URI must be set");
    let store = MongoStudentStore::connect(
        &config.mongodb_uri,
        &config.database_name,
        &format!("{}_live_test", config.collection_name),
    )
    .await
    .expect("client");
    Arc::new(store)
}

#[tokio::test]
#[ignore = "Requires live MongoDB"]
async fn live_mongo_ping() {
    let store = live_store().await;
    store.ping().await.expect("MongoDB should answer ping");
    store.shutdown().await;
}

#[tokio::test]
#[ignore = "Requires live MongoDB"]
async fn live_mongo_create_search_delete() {
    let store = live_store().await;
    let service = RecordService::new(store.clone(), NameSearchMode::Literal);
    let unique = format!("Live{}", std::process::id());

    let created = service
        .create(json!({ "name": unique, "age": 21 }))
        .await
        .expect("create");
    assert_eq!(service.get_by_id(&created.id).await.expect("get"), created);

    let hits = service
        .search_by_name(&unique.to_lowercase())
        .await
        .expect("search");
    assert!(hits.iter().any(|hit| hit.id == created.id));

    service.delete_by_id(&created.id).await.expect("delete");
    assert!(
        service
            .delete_by_id(&created.id)
            .await
            .unwrap_err()
            .is_not_found()
    );

    store.shutdown().await;
}
