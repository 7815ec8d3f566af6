use activehaus::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Record)]
#[record(generate_id)]
pub struct Automobile {
    #[serde(default)]
    pub id: String,

    #[serde(flatten)]
    pub timestamps: Timestamps,

    #[record(required)]
    #[serde(default)]
    pub year: i32,

    #[serde(default)]
    pub make: String,

    #[record(required)]
    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub safety_rating: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Record)]
#[record(name = "fleet_vans", validate_with = "check_seats")]
pub struct Van {
    #[record(id)]
    #[serde(default)]
    pub plate: String,

    #[record(timestamps)]
    #[serde(flatten)]
    pub stamps: Timestamps,

    #[serde(default)]
    pub seats: u32,
}

fn check_seats(van: &Van, validation: &mut Validation) {
    validation.range("seats", van.seats, 2, 9);
}

fn automobile(year: i32, make: &str, model: &str, safety_rating: i32) -> Automobile {
    Automobile {
        year,
        make: make.to_string(),
        model: model.to_string(),
        safety_rating,
        ..Default::default()
    }
}

struct Harness {
    haus: ActiveHaus,
    search: MemorySearchClient,
}

fn harness() -> Harness {
    let search = MemorySearchClient::new();
    let haus = ActiveHaus::new()
        .with_document_client(Arc::new(MemoryDocumentClient::new()))
        .with_search_client(Arc::new(search.clone()))
        .with_table_client(Arc::new(MemoryTableClient::new()));
    Harness { haus, search }
}

const ALL_BACKENDS: [Backend; 3] = [Backend::Document, Backend::Search, Backend::Table];
const QUERYABLE: [Backend; 2] = [Backend::Document, Backend::Search];

async fn seed(haus: &ActiveHaus, backend: Backend) -> Vec<String> {
    let mut ids = Vec::new();
    for car in [
        automobile(2010, "porsche", "panamera", 5),
        automobile(2014, "tesla", "model s", 5),
        automobile(1960, "austin healey", "sprite", 2),
    ] {
        let mut record = haus.record(car, backend).unwrap();
        assert!(record.save().await.unwrap());
        ids.push(record.id.clone());
    }
    ids
}

fn models(cars: &[Automobile]) -> Vec<&str> {
    cars.iter().map(|car| car.model.as_str()).collect()
}

#[tokio::test]
async fn test_invalid_save_skips_backend() {
    let Harness { haus, search } = harness();
    let mut record = haus
        .record(automobile(0, "porsche", "", 5), Backend::Search)
        .unwrap();

    assert!(!record.save().await.unwrap());
    assert_eq!(search.request_count(), 0);

    let errors = record.errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors["year"].message, "year is required");
    assert!(errors.contains_key("model"));
    assert!(record.timestamps.created_at.is_none());
}

#[tokio::test]
async fn test_save_sets_created_then_updated() {
    let Harness { haus, .. } = harness();

    for backend in ALL_BACKENDS {
        let mut record = haus
            .record(automobile(2010, "porsche", "panamera", 4), backend)
            .unwrap();

        assert!(record.save().await.unwrap());
        assert!(!record.id.is_empty(), "{}", backend);
        let created_at = record.timestamps.created_at;
        assert!(created_at.is_some());
        assert!(record.timestamps.updated_at.is_none());

        record.safety_rating = 5;
        assert!(record.save().await.unwrap());
        assert_eq!(record.timestamps.created_at, created_at);
        assert!(record.timestamps.updated_at.is_some());

        let found = record.find(&record.id).await.unwrap().into_model();
        assert_eq!(found.safety_rating, 5);
        assert_eq!(found.timestamps, record.timestamps);
    }
}

#[tokio::test]
async fn test_find_missing_errors_on_every_backend() {
    let Harness { haus, .. } = harness();

    for backend in ALL_BACKENDS {
        let record = haus.record(Automobile::default(), backend).unwrap();
        let err = record.find("does-not-exist").await.unwrap_err();
        assert!(err.is_not_found(), "{}: {}", backend, err);
        assert_eq!(err.to_string(), "automobiles record not found: does-not-exist");
    }
}

#[tokio::test]
async fn test_delete_on_every_backend() {
    let Harness { haus, .. } = harness();

    for backend in ALL_BACKENDS {
        let mut record = haus
            .record(automobile(2014, "tesla", "model s", 5), backend)
            .unwrap();
        assert!(record.save().await.unwrap());

        record.delete().await.unwrap();
        assert!(record.find(&record.id).await.unwrap_err().is_not_found());
    }
}

#[tokio::test]
async fn test_patch_updates_only_given_fields() {
    let Harness { haus, .. } = harness();

    for backend in [Backend::Search, Backend::Table] {
        let mut original = haus
            .record(automobile(2010, "porsche", "panamera", 4), backend)
            .unwrap();
        assert!(original.save().await.unwrap());

        let sparse = Automobile {
            id: original.id.clone(),
            safety_rating: 5,
            ..Default::default()
        };
        let mut patch = haus.record(sparse, backend).unwrap();
        assert!(patch.patch().await.unwrap(), "{}", backend);
        assert!(patch.timestamps.updated_at.is_some());

        let found = original.find(&original.id).await.unwrap().into_model();
        assert_eq!(found.year, 2010);
        assert_eq!(found.make, "porsche");
        assert_eq!(found.model, "panamera");
        assert_eq!(found.safety_rating, 5);
        assert_eq!(found.timestamps.created_at, original.timestamps.created_at);
        assert!(found.timestamps.updated_at.is_some());
    }
}

#[tokio::test]
async fn test_patch_clearing_resets_named_fields() {
    let Harness { haus, .. } = harness();

    let mut original = haus
        .record(automobile(2010, "porsche", "panamera", 4), Backend::Table)
        .unwrap();
    assert!(original.save().await.unwrap());

    let sparse = Automobile {
        id: original.id.clone(),
        ..Default::default()
    };
    let mut patch = haus.record(sparse, Backend::Table).unwrap();
    assert!(patch.patch_clearing(&["make"]).await.unwrap());

    let found = original.find(&original.id).await.unwrap().into_model();
    assert_eq!(found.make, "");
    assert_eq!(found.model, "panamera");
}

#[tokio::test]
async fn test_patch_is_unsupported_on_document_store() {
    let Harness { haus, .. } = harness();
    let ids = seed(&haus, Backend::Document).await;

    let sparse = Automobile {
        id: ids[0].clone(),
        safety_rating: 1,
        ..Default::default()
    };
    let err = haus
        .record(sparse, Backend::Document)
        .unwrap()
        .patch()
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unsupported { .. }));
}

#[tokio::test]
async fn test_patch_of_missing_record_fails() {
    let Harness { haus, .. } = harness();

    let sparse = Automobile {
        id: "ghost".to_string(),
        safety_rating: 1,
        ..Default::default()
    };
    let err = haus
        .record(sparse, Backend::Search)
        .unwrap()
        .patch()
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_and_or_query_combination() {
    let Harness { haus, .. } = harness();

    for backend in QUERYABLE {
        seed(&haus, backend).await;
        let mut record = haus.record(Automobile::default(), backend).unwrap();

        record
            .filter(Condition::eq("year", 2010))
            .filter(Condition::eq("model", "panamera"));
        let cars: Vec<Automobile> = record.run().await.unwrap();
        assert_eq!(models(&cars), vec!["panamera"], "{}", backend);

        record
            .filter(Condition::eq("year", 2010))
            .filter(Condition::eq("model", "sprite").or());
        let mut cars: Vec<Automobile> = record.run().await.unwrap();
        cars.sort_by_key(|car| car.year);
        assert_eq!(models(&cars), vec!["sprite", "panamera"], "{}", backend);
    }
}

#[tokio::test]
async fn test_composite_sort() {
    let Harness { haus, .. } = harness();

    for backend in QUERYABLE {
        seed(&haus, backend).await;
        let mut extra = haus
            .record(automobile(2010, "porsche", "cayenne", 4), backend)
            .unwrap();
        assert!(extra.save().await.unwrap());

        let mut record = haus.record(Automobile::default(), backend).unwrap();
        record.order(OrderBy::asc("year")).order(OrderBy::desc("model"));
        let cars: Vec<Automobile> = record.run().await.unwrap();

        assert_eq!(
            models(&cars),
            vec!["sprite", "panamera", "cayenne", "model s"],
            "{}",
            backend
        );
    }
}

#[tokio::test]
async fn test_sum_aggregation() {
    let Harness { haus, .. } = harness();
    seed(&haus, Backend::Document).await;
    let mut record = haus.record(Automobile::default(), Backend::Document).unwrap();

    record.sum(["year"]);
    let total: Vec<f64> = record.run().await.unwrap();
    assert_eq!(total, vec![5984.0]);

    record.sum(["year"]);
    let total: Vec<i64> = record.run().await.unwrap();
    assert_eq!(total, vec![5984]);

    record.sum(["year", "safety_rating"]);
    assert!(record.run::<f64>().await.is_err());
}

#[tokio::test]
async fn test_pluck_and_distinct() {
    let Harness { haus, .. } = harness();
    seed(&haus, Backend::Document).await;
    let mut record = haus.record(Automobile::default(), Backend::Document).unwrap();

    record
        .pluck(["safety_rating"])
        .order(OrderBy::desc("safety_rating"))
        .distinct();
    let ratings: Vec<serde_json::Value> = record.run().await.unwrap();
    assert_eq!(
        ratings,
        vec![
            serde_json::json!({"safety_rating": 5}),
            serde_json::json!({"safety_rating": 2}),
        ]
    );
}

#[tokio::test]
async fn test_search_service_rejects_unsupported_queries() {
    let Harness { haus, search } = harness();
    seed(&haus, Backend::Search).await;
    let before = search.request_count();
    let mut record = haus.record(Automobile::default(), Backend::Search).unwrap();

    record.filter(Condition::ne("year", 2010));
    assert!(matches!(
        record.run::<Automobile>().await.unwrap_err(),
        StoreError::Unsupported { .. }
    ));
    // the failed query stays pending
    assert_eq!(record.query().conditions().len(), 1);

    record.promote();
    record.sum(["year"]);
    assert!(record.run::<f64>().await.is_err());
    assert_eq!(search.request_count(), before);
}

#[tokio::test]
async fn test_table_refuses_search_and_listing() {
    let Harness { haus, .. } = harness();
    seed(&haus, Backend::Table).await;
    let mut record = haus.record(Automobile::default(), Backend::Table).unwrap();

    record.filter(Condition::eq("year", 2010));
    let err = record.run::<Automobile>().await.unwrap_err();
    assert!(matches!(err, StoreError::ViewRequired { .. }));

    let err = record.all(&ListOptions::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::ViewRequired { .. }));
    assert!(err.to_string().contains("materialized view"));
}

#[tokio::test]
async fn test_all_and_truncate() {
    let Harness { haus, .. } = harness();

    for backend in QUERYABLE {
        seed(&haus, backend).await;
        let record = haus.record(Automobile::default(), backend).unwrap();

        let cars = record.all(&ListOptions::new()).await.unwrap();
        assert_eq!(cars.len(), 3, "{}", backend);

        record.truncate().await.unwrap();
        assert!(record.all(&ListOptions::new()).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_derive_options() {
    let Harness { haus, .. } = harness();
    let mut van = haus
        .record(
            Van {
                plate: "AB-123".to_string(),
                seats: 12,
                ..Default::default()
            },
            Backend::Document,
        )
        .unwrap();

    assert_eq!(van.model_name(), "fleet_vans");
    assert!(!van.save().await.unwrap());
    assert!(van.errors().contains_key("seats"));

    van.seats = 7;
    assert!(van.save().await.unwrap());
    assert_eq!(van.find("AB-123").await.unwrap().seats, 7);
}

#[tokio::test]
async fn test_unconfigured_backend() {
    let haus = ActiveHaus::new().with_search_client(Arc::new(MemorySearchClient::new()));

    assert!(haus.is_configured(Backend::Search));
    assert!(matches!(
        haus.store(Backend::Table).unwrap_err(),
        ActiveHausError::BackendNotConfigured(Backend::Table)
    ));
    assert!(matches!(
        haus.ensure_collection::<Automobile>(false).await.unwrap_err(),
        ActiveHausError::BackendNotConfigured(Backend::Document)
    ));
}

#[tokio::test]
async fn test_ensure_collection_and_health_check() {
    let document = MemoryDocumentClient::new();
    let haus = ActiveHaus::new().with_document_client(Arc::new(document.clone()));

    haus.ensure_collection::<Automobile>(true).await.unwrap();
    haus.health_check().await.unwrap();

    document.set_offline(true);
    assert!(haus.health_check().await.is_err());
}
