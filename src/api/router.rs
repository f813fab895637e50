use super::dispatcher::Dispatcher;
use super::handlers::*;
use super::protocol::{ENDPOINT_COLLECTION, ENDPOINT_RESOURCE};
use crate::guard::Guard;
use crate::storage::protocol::Storage;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Builder for a CRUD API bound to one storage and an optional guard.
///
/// Every instance is independent, so several APIs (e.g. one per test) can
/// live in the same process.
///
/// ```no_run
/// use crudapi::api::router::CrudApi;
/// use crudapi::storage::memory::MapStorage;
///
/// let app = CrudApi::new(MapStorage::with_collections(["artists"]))
///     .with_prefix("/v1/")
///     .router();
/// ```
#[derive(Clone)]
pub struct CrudApi {
    storage: Arc<dyn Storage>,
    guard: Option<Arc<dyn Guard>>,
    prefix: String,
}

impl CrudApi {
    pub fn new<S>(storage: S) -> Self
    where
        S: Storage + 'static,
    {
        Self::from_shared(Arc::new(storage))
    }

    pub fn from_shared(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            guard: None,
            prefix: String::new(),
        }
    }

    pub fn with_guard<G>(self, guard: G) -> Self
    where
        G: Guard + 'static,
    {
        self.with_shared_guard(Arc::new(guard))
    }

    pub fn with_shared_guard(mut self, guard: Arc<dyn Guard>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Mounts the API below `prefix`. The prefix is never matched as a collection.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = normalize_prefix(prefix);
        self
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.storage.clone(), self.guard.clone())
    }

    /// Builds the router. Methods not listed on a path, HEAD included, answer 405.
    pub fn router(self) -> Router {
        let dispatcher = Arc::new(self.dispatcher());

        let api = Router::new()
            .route(
                ENDPOINT_COLLECTION,
                post(handle_create)
                    .get(handle_get_all)
                    .delete(handle_delete_all)
                    .options(handle_options_collection)
                    .head(handle_collection_method_not_allowed)
                    .fallback(handle_collection_method_not_allowed),
            )
            .route(
                ENDPOINT_RESOURCE,
                get(handle_get)
                    .put(handle_update)
                    .delete(handle_delete)
                    .options(handle_options_resource)
                    .head(handle_resource_method_not_allowed)
                    .fallback(handle_resource_method_not_allowed),
            )
            .with_state(dispatcher);

        if self.prefix.is_empty() {
            api
        } else {
            tracing::info!("Mounting CRUD API under {}", self.prefix);
            Router::new().nest(&self.prefix, api)
        }
    }
}

/// `""` and `"/"` mean the root; otherwise one leading slash and no trailing ones.
pub fn normalize_prefix(prefix: &str) -> String {
    let cleaned = prefix.trim_end_matches('/');
    if cleaned.is_empty() {
        String::new()
    } else if cleaned.starts_with('/') {
        cleaned.to_string()
    } else {
        format!("/{}", cleaned)
    }
}
