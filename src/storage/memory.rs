use super::protocol::{StatusResponse, Storage, StorageError};
use crate::types::{QueryParams, Resource};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory reference backend. Nothing is persisted.
///
/// The outer map guards collection names, each collection owns its own map of
/// resources; both are sharded reader/writer maps, so reads proceed in
/// parallel and every insert, replace or removal is exclusive.
#[derive(Clone, Default)]
pub struct MapStorage {
    data: Arc<DashMap<String, DashMap<String, Resource>>>,
}

impl MapStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collections<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let storage = Self::new();
        for collection in collections {
            storage
                .data
                .entry(collection.into())
                .or_insert_with(DashMap::new);
        }
        storage
    }

    /// Registers an empty collection. Equivalent to creating a table.
    pub fn add_collection(&self, collection: &str) -> Result<(), StorageError> {
        match self.data.entry(collection.to_string()) {
            Entry::Occupied(_) => Err(StorageError::CollectionExists),
            Entry::Vacant(slot) => {
                slot.insert(DashMap::new());
                tracing::info!("Added collection '{}'", collection);
                Ok(())
            }
        }
    }

    /// Drops a collection together with all of its resources.
    pub fn remove_collection(&self, collection: &str) -> Result<(), StorageError> {
        match self.data.remove(collection) {
            Some(_) => {
                tracing::info!("Removed collection '{}'", collection);
                Ok(())
            }
            None => Err(StorageError::CollectionNotFound),
        }
    }

    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn resource_count(&self, collection: &str) -> Option<usize> {
        self.data.get(collection).map(|resources| resources.len())
    }

    fn insert_new(&self, collection: &str, resource: Resource) -> Result<String, StorageError> {
        let resources = self
            .data
            .get(collection)
            .ok_or(StorageError::CollectionNotFound)?;

        let id = Uuid::new_v4().to_string();
        let outcome = match resources.entry(id.clone()) {
            Entry::Occupied(_) => Err(StorageError::ResourceExists),
            Entry::Vacant(slot) => {
                slot.insert(resource);
                Ok(id)
            }
        };
        outcome
    }

    fn find(&self, collection: &str, id: &str) -> Result<Resource, StorageError> {
        let resources = self
            .data
            .get(collection)
            .ok_or(StorageError::CollectionNotFound)?;
        let resource = resources.get(id).ok_or(StorageError::ResourceNotFound)?;
        Ok(resource.value().clone())
    }

    fn find_all(&self, collection: &str) -> Result<Vec<Resource>, StorageError> {
        let resources = self
            .data
            .get(collection)
            .ok_or(StorageError::CollectionNotFound)?;
        let all = resources
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        Ok(all)
    }

    fn replace(&self, collection: &str, id: &str, resource: Resource) -> Result<(), StorageError> {
        let resources = self
            .data
            .get(collection)
            .ok_or(StorageError::CollectionNotFound)?;
        let mut stored = resources
            .get_mut(id)
            .ok_or(StorageError::ResourceNotFound)?;
        *stored = resource;
        Ok(())
    }

    fn remove(&self, collection: &str, id: &str) -> Result<(), StorageError> {
        let resources = self
            .data
            .get(collection)
            .ok_or(StorageError::CollectionNotFound)?;
        resources
            .remove(id)
            .map(|_| ())
            .ok_or(StorageError::ResourceNotFound)
    }

    fn clear(&self, collection: &str) -> Result<(), StorageError> {
        let resources = self
            .data
            .get(collection)
            .ok_or(StorageError::CollectionNotFound)?;
        resources.clear();
        Ok(())
    }
}

#[async_trait]
impl Storage for MapStorage {
    async fn create(
        &self,
        collection: &str,
        resource: Resource,
        _params: &QueryParams,
    ) -> (Option<String>, StatusResponse) {
        match self.insert_new(collection, resource) {
            Ok(id) => {
                tracing::debug!("Created resource {} in '{}'", id, collection);
                (Some(id), StatusResponse::created())
            }
            Err(e) => (None, e.into()),
        }
    }

    async fn get(
        &self,
        collection: &str,
        id: &str,
        _params: &QueryParams,
    ) -> (Option<Resource>, StatusResponse) {
        match self.find(collection, id) {
            Ok(resource) => (Some(resource), StatusResponse::ok()),
            Err(e) => (None, e.into()),
        }
    }

    async fn get_all(
        &self,
        collection: &str,
        _params: &QueryParams,
    ) -> (Vec<Resource>, StatusResponse) {
        match self.find_all(collection) {
            Ok(resources) => (resources, StatusResponse::ok()),
            Err(e) => (Vec::new(), e.into()),
        }
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        resource: Resource,
        _params: &QueryParams,
    ) -> StatusResponse {
        match self.replace(collection, id, resource) {
            Ok(()) => StatusResponse::ok(),
            Err(e) => e.into(),
        }
    }

    async fn delete(&self, collection: &str, id: &str, _params: &QueryParams) -> StatusResponse {
        match self.remove(collection, id) {
            Ok(()) => StatusResponse::ok(),
            Err(e) => e.into(),
        }
    }

    async fn delete_all(&self, collection: &str, _params: &QueryParams) -> StatusResponse {
        match self.clear(collection) {
            Ok(()) => StatusResponse::ok(),
            Err(e) => e.into(),
        }
    }
}
