use super::dispatcher::Dispatcher;
use super::protocol::{
    ApiReply, COLLECTION_METHODS, MALFORMED_PATH, MALFORMED_QUERY, METHOD_NOT_ALLOWED,
    RESOURCE_METHODS,
};
use crate::types::QueryParams;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

type CollectionPath = Result<Path<String>, PathRejection>;
type ResourcePath = Result<Path<(String, String)>, PathRejection>;

/// Resolves the path segments and the query string, or the 400 reply to send instead.
fn address<T>(
    path: Result<Path<T>, PathRejection>,
    query: Option<String>,
) -> Result<(T, QueryParams), ApiReply> {
    let Path(segments) = path.map_err(|e| {
        tracing::warn!("Failed to extract path: {}", e);
        ApiReply::error(StatusCode::BAD_REQUEST, MALFORMED_PATH)
    })?;

    let params = QueryParams::parse(query.as_deref().unwrap_or_default()).map_err(|e| {
        tracing::warn!("Failed to parse query string: {}", e);
        ApiReply::error(StatusCode::BAD_REQUEST, MALFORMED_QUERY)
    })?;

    Ok((segments, params))
}

pub async fn handle_create(
    State(dispatcher): State<Arc<Dispatcher>>,
    path: CollectionPath,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiReply {
    match address(path, query) {
        Ok((collection, params)) => dispatcher.create(&collection, &params, &body).await,
        Err(reply) => reply,
    }
}

pub async fn handle_get_all(
    State(dispatcher): State<Arc<Dispatcher>>,
    path: CollectionPath,
    RawQuery(query): RawQuery,
) -> ApiReply {
    match address(path, query) {
        Ok((collection, params)) => dispatcher.get_all(&collection, &params).await,
        Err(reply) => reply,
    }
}

pub async fn handle_get(
    State(dispatcher): State<Arc<Dispatcher>>,
    path: ResourcePath,
    RawQuery(query): RawQuery,
) -> ApiReply {
    match address(path, query) {
        Ok(((collection, id), params)) => dispatcher.get(&collection, &id, &params).await,
        Err(reply) => reply,
    }
}

pub async fn handle_update(
    State(dispatcher): State<Arc<Dispatcher>>,
    path: ResourcePath,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiReply {
    match address(path, query) {
        Ok(((collection, id), params)) => {
            dispatcher.update(&collection, &id, &params, &body).await
        }
        Err(reply) => reply,
    }
}

pub async fn handle_delete_all(
    State(dispatcher): State<Arc<Dispatcher>>,
    path: CollectionPath,
    RawQuery(query): RawQuery,
) -> ApiReply {
    match address(path, query) {
        Ok((collection, params)) => dispatcher.delete_all(&collection, &params).await,
        Err(reply) => reply,
    }
}

pub async fn handle_delete(
    State(dispatcher): State<Arc<Dispatcher>>,
    path: ResourcePath,
    RawQuery(query): RawQuery,
) -> ApiReply {
    match address(path, query) {
        Ok(((collection, id), params)) => dispatcher.delete(&collection, &id, &params).await,
        Err(reply) => reply,
    }
}

// Discovery and method fallbacks never reach the guard or storage.

pub async fn handle_options_collection() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, COLLECTION_METHODS)])
}

pub async fn handle_options_resource() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, RESOURCE_METHODS)])
}

pub async fn handle_collection_method_not_allowed(method: Method) -> impl IntoResponse {
    tracing::warn!("Method {} not allowed on collection path", method);
    (
        [(header::ALLOW, COLLECTION_METHODS)],
        ApiReply::error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED),
    )
}

pub async fn handle_resource_method_not_allowed(method: Method) -> impl IntoResponse {
    tracing::warn!("Method {} not allowed on resource path", method);
    (
        [(header::ALLOW, RESOURCE_METHODS)],
        ApiReply::error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED),
    )
}
