//! In-memory document client
//!
//! Evaluates translated plans against documents held in process, with the
//! same ordering rules as the PostgreSQL client. Used by tests and local
//! development.

use crate::client::DocumentClient;
use crate::plan::{DocumentPlan, Expr};
use async_trait::async_trait;
use record_object::query_builder::{ListCursor, ListOptions, RelationalOperator, SortOrder};
use record_object::value::{compare, compare_fields, dedup, field, number_value, project};
use record_object::{StoreError, StoreResult};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Collections = HashMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentClient {
    collections: Arc<RwLock<Collections>>,
    offline: Arc<AtomicBool>,
}

impl MemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with a connection error until reset
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Number of documents stored in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.read()
            .map(|collections| collections.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Connection("document store is offline".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.check_online()?;
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("document collections lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.check_online()?;
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("document collections lock poisoned".to_string()))
    }

    fn documents(&self, collection: &str) -> StoreResult<Vec<Value>> {
        Ok(self
            .read()?
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Whether a document satisfies an expression; a missing field never matches
pub fn matches(expr: &Expr, document: &Value) -> bool {
    match expr {
        Expr::Compare {
            key,
            operator,
            value,
        } => {
            let Some(actual) = field(document, key) else {
                return false;
            };
            let ordering = compare(actual, value);
            match operator {
                RelationalOperator::Eq => ordering == Ordering::Equal,
                RelationalOperator::Ne => ordering != Ordering::Equal,
                RelationalOperator::Lt => ordering == Ordering::Less,
                RelationalOperator::Lte => ordering != Ordering::Greater,
                RelationalOperator::Gt => ordering == Ordering::Greater,
                RelationalOperator::Gte => ordering != Ordering::Less,
            }
        }
        Expr::And(left, right) => matches(left, document) && matches(right, document),
        Expr::Or(left, right) => matches(left, document) || matches(right, document),
    }
}

fn evaluate(mut documents: Vec<Value>, plan: &DocumentPlan) -> Vec<Value> {
    if let Some(filter) = &plan.filter {
        documents.retain(|document| matches(filter, document));
    }

    if let Some(sum_field) = &plan.sum {
        let mut values: Vec<Value> = documents
            .iter()
            .filter_map(|document| field(document, sum_field))
            .filter(|value| value.is_number())
            .cloned()
            .collect();
        if plan.distinct {
            values = dedup(values);
        }
        let total: f64 = values.iter().filter_map(Value::as_f64).sum();
        return vec![number_value(total)];
    }

    documents.sort_by(|a, b| {
        plan.order
            .iter()
            .map(|order_by| {
                let ordering = compare_fields(field(a, &order_by.key), field(b, &order_by.key));
                match order_by.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    if let Some(keys) = &plan.projection {
        documents = documents.iter().map(|document| project(document, keys)).collect();
    }

    if plan.distinct {
        documents = dedup(documents);
    }

    documents
}

#[async_trait]
impl DocumentClient for MemoryDocumentClient {
    async fn upsert(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        if let Some(documents) = self.write()?.get_mut(collection) {
            documents.remove(id);
        }
        Ok(())
    }

    async fn scan(&self, collection: &str, options: &ListOptions) -> StoreResult<Vec<Value>> {
        let collections = self.read()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let after_cursor = |id: &String| match &options.cursor {
            Some(ListCursor::After(key)) => id > key,
            Some(ListCursor::Start(key)) => id >= key,
            None => true,
        };

        Ok(documents
            .iter()
            .filter(|(id, _)| after_cursor(id))
            .take(options.limit.unwrap_or(usize::MAX))
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn query(&self, collection: &str, plan: &DocumentPlan) -> StoreResult<Vec<Value>> {
        let documents = self.documents(collection)?;
        Ok(evaluate(documents, plan))
    }

    async fn delete_all(&self, collection: &str) -> StoreResult<u64> {
        let removed = self
            .write()?
            .get_mut(collection)
            .map(|documents| {
                let count = documents.len() as u64;
                documents.clear();
                count
            })
            .unwrap_or(0);
        Ok(removed)
    }

    async fn create_collection(&self, collection: &str, recreate: bool) -> StoreResult<()> {
        let mut collections = self.write()?;
        let documents = collections.entry(collection.to_string()).or_default();
        if recreate {
            documents.clear();
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }

    async fn close(&self) {}
}
