//! Request handlers.
//!
//! Each submodule serves one route family. Handlers read query parameters
//! via [`crate::query`], call into `refscope-core`, and map failures through
//! [`AppError`](crate::error::AppError).

pub mod analysis;
pub mod asset;
pub mod health;
pub mod jobs;
pub mod script;
