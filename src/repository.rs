//! In-memory collections persisted wholesale after every mutation.

use crate::errors::{StoreError, StoreResult};
use crate::storage::{Backend, load_document, save_document};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};
use uuid::Uuid;

/// A record type that lives in a [`Repository`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Storage key of the whole collection.
    const KEY: &'static str;

    fn id(&self) -> Uuid;

    /// Collection used when nothing usable is stored yet.
    fn seed(today: NaiveDate) -> Vec<Self>;

    /// Repairs and recomputes derived fields. Runs once per record at load
    /// time.
    fn normalize(&mut self, _today: NaiveDate) {}

    /// Recomputes the fields that depend on "today". Runs on every read, so
    /// implementations should stay cheaper than a full [`Record::normalize`].
    fn refresh(&mut self, today: NaiveDate) {
        self.normalize(today);
    }
}

/// Handle for a delete that is waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeleteToken(pub Uuid);

pub struct Repository<T: Record> {
    backend: Arc<dyn Backend>,
    items: Vec<T>,
    pending: HashMap<DeleteToken, Uuid>,
}

impl<T: Record> Repository<T> {
    /// Loads the stored collection, falling back to the seed collection when
    /// the document is absent or unreadable.
    pub async fn load(backend: Arc<dyn Backend>, today: NaiveDate) -> Self {
        let mut items = match load_document::<Vec<T>>(backend.as_ref(), T::KEY).await {
            Some(items) => items,
            None => {
                info!("seeding {} with defaults", T::KEY);
                T::seed(today)
            }
        };
        for item in &mut items {
            item.normalize(today);
        }

        Self {
            backend,
            items,
            pending: HashMap::new(),
        }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Recomputes derived fields for a new day without persisting.
    pub fn refresh(&mut self, today: NaiveDate) {
        for item in &mut self.items {
            item.refresh(today);
        }
    }

    /// Appends a new record.
    pub async fn insert(&mut self, item: T) -> StoreResult<T> {
        self.items.push(item.clone());
        self.persist().await?;
        info!("created {} record {}", T::KEY, item.id());
        Ok(item)
    }

    /// Adds a record in front of the others.
    pub async fn insert_first(&mut self, item: T) -> StoreResult<T> {
        self.items.insert(0, item.clone());
        self.persist().await?;
        info!("created {} record {}", T::KEY, item.id());
        Ok(item)
    }

    /// Replaces the record with the same id, or appends it.
    pub async fn upsert(&mut self, item: T) -> StoreResult<T> {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item.clone(),
            None => self.items.push(item.clone()),
        }
        self.persist().await?;
        info!("saved {} record {}", T::KEY, item.id());
        Ok(item)
    }

    /// Applies `change` to the record with `id` and persists the collection.
    pub async fn update<R>(
        &mut self,
        id: Uuid,
        change: impl FnOnce(&mut T) -> StoreResult<R>,
    ) -> StoreResult<R> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        let result = change(item)?;
        self.persist().await?;
        info!("updated {} record {id}", T::KEY);
        Ok(result)
    }

    /// Applies `change` to every record and persists once.
    pub async fn update_all(&mut self, mut change: impl FnMut(&mut T)) -> StoreResult<()> {
        for item in &mut self.items {
            change(item);
        }
        self.persist().await?;
        info!("updated all {} records", T::KEY);
        Ok(())
    }

    pub async fn remove(&mut self, id: Uuid) -> StoreResult<T> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = self.items.remove(index);
        self.pending.retain(|_, pending_id| *pending_id != id);
        self.persist().await?;
        info!("deleted {} record {id}", T::KEY);
        Ok(removed)
    }

    /// First phase of a delete: nothing changes until the token is confirmed.
    pub fn request_delete(&mut self, id: Uuid) -> StoreResult<DeleteToken> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        let token = DeleteToken(Uuid::new_v4());
        self.pending.insert(token, id);
        Ok(token)
    }

    pub async fn confirm_delete(&mut self, token: DeleteToken) -> StoreResult<T> {
        let id = self
            .pending
            .remove(&token)
            .ok_or(StoreError::UnknownToken(token.0))?;
        self.remove(id).await
    }

    /// Drops a pending delete. Returns whether the token was known.
    pub fn cancel_delete(&mut self, token: DeleteToken) -> bool {
        self.pending.remove(&token).is_some()
    }

    /// Writes the whole collection. On failure the in-memory state is kept
    /// as it is.
    async fn persist(&self) -> StoreResult<()> {
        if let Err(err) = save_document(self.backend.as_ref(), T::KEY, &self.items).await {
            warn!("failed to persist {}: {err}", T::KEY);
            return Err(err);
        }
        Ok(())
    }
}
