//! Storage Module
//!
//! Abstracts the persistence backend behind a narrow async contract so the
//! dispatcher never depends on a concrete datastore.
//!
//! ## Core Concepts
//! - **Collections**: named buckets of resources, created and destroyed by the backend.
//! - **Status responses**: every operation answers with an HTTP status and an optional
//!   error message; the dispatcher writes that status verbatim.
//! - **Reference backend**: `MapStorage` keeps everything in memory and is meant for
//!   examples and tests.

pub mod memory;
pub mod protocol;

#[cfg(test)]
mod tests;
