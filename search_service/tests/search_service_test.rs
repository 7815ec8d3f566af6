use chrono::Utc;
use record_object::query_builder::{Condition, ListOptions, OrderBy, Query, RelationalOperator};
use record_object::traits::{Capability, Persisted, Store, Timestamps};
use record_object::StoreError;
use search_service::{MemorySearchClient, SearchStore};
use serde_json::{json, Value};
use std::sync::Arc;

const COLLECTION: &str = "automobiles";

async fn insert(store: &SearchStore, document: Value) -> Result<(), StoreError> {
    let id = document["id"].as_str().unwrap_or_default().to_string();
    store
        .persist(
            COLLECTION,
            Persisted {
                id: &id,
                timestamps: &Timestamps::default(),
                document,
            },
        )
        .await
}

async fn seeded_store() -> (SearchStore, MemorySearchClient) {
    let client = MemorySearchClient::new();
    let store = SearchStore::new(Arc::new(client.clone()));

    for document in [
        json!({"id": "1", "year": 2010, "make": "porsche", "model": "panamera", "safety_rating": 5}),
        json!({"id": "2", "year": 2014, "make": "tesla", "model": "model s", "safety_rating": 5}),
        json!({"id": "3", "year": 1960, "make": "austin healey", "model": "sprite", "safety_rating": 2}),
    ] {
        insert(&store, document).await.unwrap();
    }

    (store, client)
}

fn models(rows: &[Value]) -> Vec<&str> {
    rows.iter().filter_map(|row| row["model"].as_str()).collect()
}

#[tokio::test]
async fn test_eq_and_gte_filters() {
    let (store, _) = seeded_store().await;

    let mut query = Query::new();
    query
        .filter(Condition::eq("year", 2010))
        .filter(Condition::eq("model", "panamera"));
    assert_eq!(models(&store.search(COLLECTION, &query).await.unwrap()), vec!["panamera"]);

    let mut query = Query::new();
    query
        .filter(Condition::eq("year", 2010))
        .filter(Condition::eq("model", "sprite").or());
    assert_eq!(
        models(&store.search(COLLECTION, &query).await.unwrap()),
        vec!["panamera", "sprite"]
    );

    let mut query = Query::new();
    query.filter(Condition::gte("year", 2010));
    assert_eq!(
        models(&store.search(COLLECTION, &query).await.unwrap()),
        vec!["panamera", "model s"]
    );
}

#[tokio::test]
async fn test_unsupported_operator_makes_no_call() {
    let (store, client) = seeded_store().await;
    let before = client.request_count();

    let mut query = Query::new();
    query.filter(Condition::lt("year", 2010));
    let err = store.search(COLLECTION, &query).await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::Unsupported {
            capability: Capability::Operator(RelationalOperator::Lt),
            ..
        }
    ));
    assert_eq!(client.request_count(), before);
}

#[tokio::test]
async fn test_projection_and_aggregation_are_unsupported() {
    let (store, client) = seeded_store().await;
    let before = client.request_count();

    let mut query = Query::new();
    query.pluck(["year"]);
    let err = store.search(COLLECTION, &query).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Unsupported {
            capability: Capability::Projection,
            ..
        }
    ));

    let mut query = Query::new();
    query.sum(["safety_rating"]);
    let err = store.search(COLLECTION, &query).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Unsupported {
            capability: Capability::Aggregation,
            ..
        }
    ));

    assert_eq!(client.request_count(), before);
}

#[tokio::test]
async fn test_composite_sort() {
    let (store, _) = seeded_store().await;
    insert(
        &store,
        json!({"id": "4", "year": 2010, "make": "porsche", "model": "cayenne"}),
    )
    .await
    .unwrap();

    let mut query = Query::new();
    query.order(OrderBy::asc("year")).order(OrderBy::desc("model"));
    let rows = store.search(COLLECTION, &query).await.unwrap();

    assert_eq!(models(&rows), vec!["sprite", "panamera", "cayenne", "model s"]);
}

#[tokio::test]
async fn test_insert_conflicts_but_update_overwrites() {
    let (store, _) = seeded_store().await;

    let err = insert(&store, json!({"id": "1", "year": 2011, "model": "cayman"}))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let now = Utc::now();
    let updated = Timestamps {
        created_at: Some(now),
        updated_at: Some(now),
    };
    store
        .persist(
            COLLECTION,
            Persisted {
                id: "1",
                timestamps: &updated,
                document: json!({"id": "1", "year": 2011, "model": "cayman"}),
            },
        )
        .await
        .unwrap();

    let found = store.find_by_id(COLLECTION, "1").await.unwrap().unwrap();
    assert_eq!(found["model"], "cayman");
}

#[tokio::test]
async fn test_list_all_paging() {
    let (store, _) = seeded_store().await;

    let rows = store.list_all(COLLECTION, &ListOptions::new()).await.unwrap();
    assert_eq!(rows.len(), 3);

    let rows = store
        .list_all(COLLECTION, &ListOptions::new().limit(1).after("1"))
        .await
        .unwrap();
    assert_eq!(models(&rows), vec!["model s"]);

    let rows = store
        .list_all(COLLECTION, &ListOptions::new().start("2"))
        .await
        .unwrap();
    assert_eq!(models(&rows), vec!["model s", "sprite"]);
}

#[tokio::test]
async fn test_list_all_rejects_oversized_pages() {
    let (store, client) = seeded_store().await;
    let before = client.request_count();

    let err = store
        .list_all(COLLECTION, &ListOptions::new().limit(101))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::InvalidOption(_)));
    assert_eq!(client.request_count(), before);
}

#[tokio::test]
async fn test_delete_and_truncate() {
    let (store, _) = seeded_store().await;

    store.delete(COLLECTION, "1").await.unwrap();
    store.delete(COLLECTION, "1").await.unwrap();
    assert!(store.find_by_id(COLLECTION, "1").await.unwrap().is_none());

    assert_eq!(store.truncate(COLLECTION).await.unwrap(), None);
    assert!(store
        .list_all(COLLECTION, &ListOptions::new())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_capabilities() {
    let (store, _) = seeded_store().await;
    let capabilities = store.capabilities();

    assert!(capabilities.supports(Capability::Patch));
    assert!(capabilities.supports(Capability::Operator(RelationalOperator::Gte)));
    assert!(!capabilities.supports(Capability::Operator(RelationalOperator::Ne)));
    assert!(!capabilities.supports(Capability::Projection));
}

#[tokio::test]
async fn test_offline_service_reports_connection_error() {
    let (store, client) = seeded_store().await;
    client.set_offline(true);

    let err = store.find_by_id(COLLECTION, "1").await.unwrap_err();
    assert!(matches!(err, StoreError::Connection(_)));

    client.set_offline(false);
    assert!(store.find_by_id(COLLECTION, "1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_negative_number_terms() {
    let (store, _) = seeded_store().await;
    insert(
        &store,
        json!({"id": "4", "year": 1999, "model": "recalled", "safety_rating": -2}),
    )
    .await
    .unwrap();

    let mut query = Query::new();
    query.filter(Condition::eq("safety_rating", -2));
    assert_eq!(models(&store.search(COLLECTION, &query).await.unwrap()), vec!["recalled"]);

    let mut query = Query::new();
    query.filter(Condition::gte("safety_rating", -3));
    assert_eq!(store.search(COLLECTION, &query).await.unwrap().len(), 4);
}
