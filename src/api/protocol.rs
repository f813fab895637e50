//! API Protocol
//!
//! Route patterns, discovery headers and the JSON envelope every CRUD
//! response is wrapped in.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

// --- API Endpoints ---

/// Operations without a resource id: Create, GetAll, DeleteAll.
pub const ENDPOINT_COLLECTION: &str = "/:collection";
/// Operations on a single resource: Get, Update, Delete.
pub const ENDPOINT_RESOURCE: &str = "/:collection/:id";

/// `Allow` header value for [`ENDPOINT_COLLECTION`].
pub const COLLECTION_METHODS: &str = "POST, GET, DELETE, OPTIONS";
/// `Allow` header value for [`ENDPOINT_RESOURCE`].
pub const RESOURCE_METHODS: &str = "GET, PUT, DELETE, OPTIONS";

// --- Error Messages ---

pub const MALFORMED_JSON: &str = "malformed json";
pub const MALFORMED_QUERY: &str = "malformed query";
pub const MALFORMED_PATH: &str = "malformed path";
pub const METHOD_NOT_ALLOWED: &str = "method not allowed";
/// Sent instead of backend detail for any 5xx coming out of storage.
pub const INTERNAL_ERROR: &str = "internal error";

// --- Envelope ---

/// Uniform response body: `{error?, id?, result?}`.
///
/// Absent fields are omitted, so an empty envelope encodes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Id of the created or updated resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// A resource (Get) or an array of resources (GetAll).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// A status line plus envelope, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: ApiResponse,
}

impl ApiReply {
    pub fn new(status: StatusCode, body: ApiResponse) -> Self {
        Self { status, body }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, ApiResponse::error(message))
    }
}

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                bytes,
            )
                .into_response(),
            Err(e) => {
                // The status line is still worth sending; the body is lost.
                tracing::error!("Failed to encode response envelope: {}", e);
                self.status.into_response()
            }
        }
    }
}
