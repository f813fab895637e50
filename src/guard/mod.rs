//! Authorization Hook Module
//!
//! Gates every dispatched request before it reaches storage.
//!
//! A [`Guard`] answers two questions in order: who is the client
//! (`authenticate`, a failure becomes 401) and may that client perform this
//! action on this collection (`authorize`, a failure becomes 403). Decisions
//! are computed fresh for every request.
//!
//! ## Submodules
//! - **`types`**: `Action`, `Client` and `Denied`.
//! - **`policy`**: the allow-all `DefaultGuard` and the allow-list `MapGuard`.

pub mod policy;
pub mod types;

use crate::types::QueryParams;
use async_trait::async_trait;
use self::types::{Action, Client, Denied};

/// Pluggable authentication and authorization gate.
///
/// Implementations must not panic: anything that prevents a decision is a
/// denial with a descriptive message.
#[async_trait]
pub trait Guard: Send + Sync {
    /// Identifies the client from the request's query parameters
    /// (e.g. an API key or a request signature).
    async fn authenticate(&self, params: &QueryParams) -> Result<Client, Denied>;

    /// Decides whether `client` may perform `action` on `collection`.
    async fn authorize(
        &self,
        client: &Client,
        action: Action,
        collection: &str,
    ) -> Result<(), Denied>;
}
