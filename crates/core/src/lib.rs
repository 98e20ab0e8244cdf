//! Refscope domain logic.
//!
//! Pure building blocks with no HTTP or runtime dependencies: the job
//! registry and runner, chunk window math for paged payload retrieval, the
//! sync-versus-async dispatch policy, and the in-memory project graph store.
//! The `api` crate wires these into an axum service.

pub mod chunk;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod job;
