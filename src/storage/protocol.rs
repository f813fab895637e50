//! Storage Contract
//!
//! Defines the operations a backend must provide so the dispatcher can stay
//! storage-agnostic, and the status pair every operation reports back.
//!
//! Errors are returned as data: a backend never fails past this boundary, it
//! answers with a [`StatusResponse`] whose code becomes the HTTP status line
//! verbatim.

use crate::types::{QueryParams, Resource};

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

/// Error message for an unknown collection.
pub const COLLECTION_NOT_FOUND: &str = "collection not found";
/// Error message for an unknown resource within a known collection.
pub const RESOURCE_NOT_FOUND: &str = "resource not found";

/// The failures a backend can report.
///
/// Both "not found" variants map to 404; only their messages tell them apart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("collection not found")]
    CollectionNotFound,
    #[error("resource not found")]
    ResourceNotFound,
    #[error("resource already exists")]
    ResourceExists,
    #[error("collection already exists")]
    CollectionExists,
    #[error("invalid resource: {0}")]
    InvalidResource(String),
    /// Backend failure unrelated to the request, e.g. an unreachable datastore.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::CollectionNotFound | StorageError::ResourceNotFound => {
                StatusCode::NOT_FOUND
            }
            StorageError::ResourceExists | StorageError::CollectionExists => StatusCode::CONFLICT,
            StorageError::InvalidResource(_) => StatusCode::BAD_REQUEST,
            StorageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Outcome of a storage operation: an HTTP status and an optional error message.
///
/// An empty message is normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: StatusCode,
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            status,
            error: (!error.is_empty()).then_some(error),
        }
    }

    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            error: None,
        }
    }

    pub fn created() -> Self {
        Self {
            status: StatusCode::CREATED,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl From<StorageError> for StatusResponse {
    fn from(err: StorageError) -> Self {
        StatusResponse::new(err.status_code(), err.to_string())
    }
}

/// Operations a backend must provide.
///
/// Every method may be called concurrently from many requests with no
/// external synchronization; implementations do their own locking.
/// `params` carries the raw query parameters of the request.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores a new resource under a backend-assigned id and returns that id.
    async fn create(
        &self,
        collection: &str,
        resource: Resource,
        params: &QueryParams,
    ) -> (Option<String>, StatusResponse);

    async fn get(
        &self,
        collection: &str,
        id: &str,
        params: &QueryParams,
    ) -> (Option<Resource>, StatusResponse);

    /// Returns every resource of a collection, in no particular order.
    async fn get_all(
        &self,
        collection: &str,
        params: &QueryParams,
    ) -> (Vec<Resource>, StatusResponse);

    /// Replaces the stored resource wholesale.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        resource: Resource,
        params: &QueryParams,
    ) -> StatusResponse;

    async fn delete(&self, collection: &str, id: &str, params: &QueryParams) -> StatusResponse;

    /// Empties a collection, leaving it registered.
    async fn delete_all(&self, collection: &str, params: &QueryParams) -> StatusResponse;
}
