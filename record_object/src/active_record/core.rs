use crate::errors::{StoreError, StoreResult};
use crate::merge::merge_sparse;
use crate::naming;
use crate::query_builder::{Condition, ListOptions, OrderBy, Query};
use crate::traits::{Capability, Model, Persisted, Store, Timestamps};
use crate::validation::{ErrorMap, Validation};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, warn};

/// A model bound to a store
#[derive(Debug)]
pub struct ActiveRecord<M: Model> {
    model: M,
    store: Arc<dyn Store>,
    query: Query,
    validation: Validation,
}

/// Promote any model to an active record
pub trait Promote: Model + Sized {
    fn promote(self, store: Arc<dyn Store>) -> ActiveRecord<Self> {
        ActiveRecord::new(self, store)
    }
}

impl<M: Model> Promote for M {}

impl<M: Model> Deref for ActiveRecord<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M: Model> DerefMut for ActiveRecord<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.model
    }
}

impl<M: Model> ActiveRecord<M> {
    pub fn new(model: M, store: Arc<dyn Store>) -> Self {
        Self {
            model,
            store,
            query: Query::new(),
            validation: Validation::new(),
        }
    }

    /// Discard any pending query. Calling it again is harmless.
    pub fn promote(&mut self) -> &mut Self {
        self.query = Query::new();
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The query the builder methods have collected so far
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn model_name(&self) -> &'static str {
        naming::model_name::<M>()
    }

    /// Run the model's rules and report whether none failed
    pub fn valid(&mut self) -> bool {
        self.validation.clear();
        self.model.validate(&mut self.validation);
        !self.validation.has_errors()
    }

    /// Errors from the last validation run
    pub fn errors(&self) -> &ErrorMap {
        self.validation.error_map()
    }

    /// Validate, stamp and persist the record.
    ///
    /// Returns `Ok(false)` without touching the store when validation fails.
    /// The first successful save sets `created_at`; later ones set `updated_at`.
    pub async fn save(&mut self) -> StoreResult<bool> {
        if let Some(hook) = self.model.before_save_hook() {
            hook.before_save().map_err(StoreError::Hook)?;
        }

        let collection = self.model_name();
        if !self.valid() {
            debug!(
                "[SAVE] {} {} failed validation: {:?}",
                collection,
                self.model.id(),
                self.validation.error_map().keys().collect::<Vec<_>>()
            );
            return Ok(false);
        }

        if self.model.id().is_empty() {
            return Err(StoreError::MissingId);
        }

        let previous = self.model.timestamps().clone();
        let kind = self.model.timestamps_mut().touch(Utc::now());
        debug!("[SAVE] {:?} {} {}", kind, collection, self.model.id());

        if let Err(error) = write(self.store.as_ref(), collection, &self.model).await {
            *self.model.timestamps_mut() = previous;
            return Err(error);
        }

        self.after_save(collection);
        Ok(true)
    }

    /// Merge the populated fields of this record into the persisted one.
    ///
    /// Blank fields are left as stored. Returns `Ok(false)` when the merged
    /// record fails validation.
    pub async fn patch(&mut self) -> StoreResult<bool> {
        self.patch_clearing(&[]).await
    }

    /// Like [`patch`](Self::patch), but resets the `clear` fields (dotted
    /// paths allowed) to their zero value
    pub async fn patch_clearing(&mut self, clear: &[&str]) -> StoreResult<bool> {
        if !self.store.capabilities().patch {
            return Err(StoreError::Unsupported {
                backend: self.store.backend(),
                capability: Capability::Patch,
            });
        }

        let id = self.model.id().to_string();
        if id.is_empty() {
            return Err(StoreError::MissingId);
        }

        let collection = self.model_name();
        let mut merged = self
            .store
            .find_by_id(collection, &id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, &id))?;

        let sparse = serde_json::to_value(&self.model)?;
        merge_sparse(&mut merged, &sparse, clear);

        let mut candidate: M = serde_json::from_value(merged)?;
        candidate.set_id(id);
        candidate.timestamps_mut().updated_at = Some(Utc::now());

        self.validation.clear();
        candidate.validate(&mut self.validation);
        if self.validation.has_errors() {
            return Ok(false);
        }

        debug!("[PATCH] {} {}", collection, candidate.id());
        write(self.store.as_ref(), collection, &candidate).await?;
        self.model = candidate;
        Ok(true)
    }

    pub async fn delete(&self) -> StoreResult<()> {
        self.store.delete(self.model_name(), self.model.id()).await
    }

    /// Load a record by identifier into a new active record on the same store
    pub async fn find(&self, id: &str) -> StoreResult<ActiveRecord<M>> {
        let collection = self.model_name();
        let document = self
            .store
            .find_by_id(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        let mut model: M = serde_json::from_value(document)?;
        model.set_id(id.to_string());
        Ok(ActiveRecord::new(model, Arc::clone(&self.store)))
    }

    pub async fn all(&self, options: &ListOptions) -> StoreResult<Vec<M>> {
        let rows = self.store.list_all(self.model_name(), options).await?;
        decode_rows(rows)
    }

    /// Delete every record of this model's collection
    pub async fn truncate(&self) -> StoreResult<Option<u64>> {
        self.store.truncate(self.model_name()).await
    }

    pub fn filter(&mut self, condition: Condition) -> &mut Self {
        self.query.filter(condition);
        self
    }

    pub fn order(&mut self, order_by: OrderBy) -> &mut Self {
        self.query.order(order_by);
        self
    }

    pub fn pluck<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.pluck(fields);
        self
    }

    /// Sum one numeric field. `run` yields a single total, decodable as an
    /// integer when it has no fractional part.
    pub fn sum<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.sum(fields);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.query.distinct();
        self
    }

    /// Run the pending query and decode each row into `R`.
    ///
    /// `R` is usually `M`; projections decode into a smaller type and a sum
    /// yields a single number. The query is cleared only on success.
    pub async fn run<R: DeserializeOwned>(&mut self) -> StoreResult<Vec<R>> {
        let capabilities = self.store.capabilities();
        if capabilities.search {
            if let Some(capability) = capabilities.missing_for(&self.query) {
                return Err(StoreError::Unsupported {
                    backend: self.store.backend(),
                    capability,
                });
            }
        }

        let rows = self.store.search(self.model_name(), &self.query).await?;
        let decoded = decode_rows(rows)?;
        self.query = Query::new();
        Ok(decoded)
    }

    fn after_save(&mut self, collection: &str) {
        let id = self.model.id().to_string();
        if let Some(hook) = self.model.after_save_hook() {
            if let Err(error) = hook.after_save() {
                warn!("[SAVE] after_save hook failed for {} {}: {}", collection, id, error);
            }
        }
    }
}

async fn write<M: Model>(store: &dyn Store, collection: &str, model: &M) -> StoreResult<()> {
    let document = serde_json::to_value(model)?;
    let timestamps: &Timestamps = model.timestamps();
    store
        .persist(
            collection,
            Persisted {
                id: model.id(),
                timestamps,
                document,
            },
        )
        .await
}

fn decode_rows<R: DeserializeOwned>(rows: Vec<serde_json::Value>) -> StoreResult<Vec<R>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}
