use super::protocol::{ApiReply, ApiResponse, INTERNAL_ERROR, MALFORMED_JSON};
use crate::guard::Guard;
use crate::guard::policy::DefaultGuard;
use crate::guard::types::Action;
use crate::storage::protocol::{StatusResponse, Storage};
use crate::types::{QueryParams, Resource};

use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;

/// Translates addressed requests into storage calls and storage results into replies.
///
/// Holds no per-request state: each call is a straight-line pass through the
/// guard and then storage, so any number of requests may run concurrently.
#[derive(Clone)]
pub struct Dispatcher {
    storage: Arc<dyn Storage>,
    guard: Arc<dyn Guard>,
}

impl Dispatcher {
    /// Builds a dispatcher; without a guard every request is allowed.
    pub fn new(storage: Arc<dyn Storage>, guard: Option<Arc<dyn Guard>>) -> Self {
        Self {
            storage,
            guard: guard.unwrap_or_else(|| Arc::new(DefaultGuard) as Arc<dyn Guard>),
        }
    }

    /// Runs authentication then authorization. A denial is the final reply.
    async fn admit(
        &self,
        action: Action,
        collection: &str,
        params: &QueryParams,
    ) -> Result<(), ApiReply> {
        let client = match self.guard.authenticate(params).await {
            Ok(client) => client,
            Err(denied) => {
                tracing::warn!(
                    "Unauthenticated request: action={} collection={} params={:?} error={}",
                    action,
                    collection,
                    params,
                    denied
                );
                return Err(ApiReply::error(StatusCode::UNAUTHORIZED, denied.0));
            }
        };

        if let Err(denied) = self.guard.authorize(&client, action, collection).await {
            tracing::warn!(
                "Unauthorized request: client={} action={} collection={} error={}",
                client,
                action,
                collection,
                denied
            );
            return Err(ApiReply::error(StatusCode::FORBIDDEN, denied.0));
        }

        Ok(())
    }

    pub async fn create(&self, collection: &str, params: &QueryParams, body: &[u8]) -> ApiReply {
        if let Err(reply) = self.admit(Action::Create, collection, params).await {
            return reply;
        }

        let resource = match decode_resource(Action::Create, collection, body) {
            Ok(resource) => resource,
            Err(reply) => return reply,
        };

        let (id, status) = self.storage.create(collection, resource, params).await;
        let id = id.filter(|id| !id.is_empty());
        finish(Action::Create, collection, status, id, None)
    }

    pub async fn get_all(&self, collection: &str, params: &QueryParams) -> ApiReply {
        if let Err(reply) = self.admit(Action::GetAll, collection, params).await {
            return reply;
        }

        let (resources, status) = self.storage.get_all(collection, params).await;
        let result = status.is_success().then(|| {
            Value::Array(resources.into_iter().map(Value::Object).collect())
        });
        finish(Action::GetAll, collection, status, None, result)
    }

    pub async fn get(&self, collection: &str, id: &str, params: &QueryParams) -> ApiReply {
        if let Err(reply) = self.admit(Action::Get, collection, params).await {
            return reply;
        }

        let (resource, status) = self.storage.get(collection, id, params).await;
        finish(
            Action::Get,
            collection,
            status,
            None,
            resource.map(Value::Object),
        )
    }

    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        params: &QueryParams,
        body: &[u8],
    ) -> ApiReply {
        if let Err(reply) = self.admit(Action::Update, collection, params).await {
            return reply;
        }

        let resource = match decode_resource(Action::Update, collection, body) {
            Ok(resource) => resource,
            Err(reply) => return reply,
        };

        let status = self.storage.update(collection, id, resource, params).await;
        let id = status.is_success().then(|| id.to_string());
        finish(Action::Update, collection, status, id, None)
    }

    pub async fn delete(&self, collection: &str, id: &str, params: &QueryParams) -> ApiReply {
        if let Err(reply) = self.admit(Action::Delete, collection, params).await {
            return reply;
        }

        let status = self.storage.delete(collection, id, params).await;
        finish(Action::Delete, collection, status, None, None)
    }

    pub async fn delete_all(&self, collection: &str, params: &QueryParams) -> ApiReply {
        if let Err(reply) = self.admit(Action::DeleteAll, collection, params).await {
            return reply;
        }

        let status = self.storage.delete_all(collection, params).await;
        finish(Action::DeleteAll, collection, status, None, None)
    }
}

/// Decodes a request body into a resource; anything but one JSON object is a 400.
fn decode_resource(action: Action, collection: &str, body: &[u8]) -> Result<Resource, ApiReply> {
    serde_json::from_slice::<Resource>(body).map_err(|e| {
        tracing::warn!(
            "Malformed body: action={} collection={} error={}",
            action,
            collection,
            e
        );
        ApiReply::error(StatusCode::BAD_REQUEST, MALFORMED_JSON)
    })
}

/// Turns a storage outcome into the reply, logging failures once.
///
/// The storage status is written verbatim; only the message of a 5xx is
/// replaced so backend detail stays in the server log.
fn finish(
    action: Action,
    collection: &str,
    status: StatusResponse,
    id: Option<String>,
    result: Option<Value>,
) -> ApiReply {
    let StatusResponse { status, error } = status;

    let error = if status.is_server_error() {
        tracing::error!(
            "Storage failure: action={} collection={} status={} error={}",
            action,
            collection,
            status,
            error.as_deref().unwrap_or("")
        );
        Some(INTERNAL_ERROR.to_string())
    } else {
        if status.is_client_error() {
            tracing::warn!(
                "Request failed: action={} collection={} status={} error={}",
                action,
                collection,
                status,
                error.as_deref().unwrap_or("")
            );
        } else {
            tracing::debug!("{} on '{}' -> {}", action, collection, status);
        }
        error
    };

    ApiReply::new(status, ApiResponse { error, id, result })
}
