//! Generic CRUD REST Library
//!
//! Maps HTTP verbs on `/{collection}` and `/{collection}/{id}` to CRUD operations
//! against a pluggable storage backend, with an optional authorization hook in
//! front of every operation. The binary (`main.rs`) wires it to the in-memory
//! reference storage.
//!
//! ## Architecture Modules
//! - **`api`**: the dispatcher and Axum router. Extracts collection, id, query and
//!   body, consults the guard, calls storage and writes the `{error, id, result}`
//!   envelope with the status storage reported.
//! - **`guard`**: the authentication/authorization contract plus the allow-all
//!   default and an allow-list implementation.
//! - **`storage`**: the storage contract, its error taxonomy and `MapStorage`,
//!   a thread-safe in-memory backend.
//! - **`types`**: values shared by all of the above (`Resource`, `QueryParams`).
//! - **`config`**: command-line configuration for the example server.

pub mod api;
pub mod config;
pub mod guard;
pub mod storage;
pub mod types;
