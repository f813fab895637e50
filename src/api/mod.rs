//! HTTP API Module
//!
//! The request-routing and translation layer between HTTP and storage.
//!
//! ## Request Flow
//! 1. **Addressing**: `/{collection}` and `/{collection}/{id}` (below an optional prefix)
//!    select the action together with the HTTP method.
//! 2. **Guard**: the configured guard authenticates (401) and authorizes (403) the action.
//! 3. **Body**: Create and Update decode the body into a JSON object (400 `malformed json`).
//! 4. **Storage**: the matching storage operation runs.
//! 5. **Reply**: the storage status is written verbatim with the `{error, id, result}` envelope.
//!
//! ## Submodules
//! - **`protocol`**: route patterns, `Allow` values and the response envelope.
//! - **`dispatcher`**: the storage-agnostic core invoked by every handler.
//! - **`handlers`**: thin Axum handlers extracting path, query and body.
//! - **`router`**: `CrudApi`, which wires storage and guard into a `Router`.

pub mod dispatcher;
pub mod handlers;
pub mod protocol;
pub mod router;
