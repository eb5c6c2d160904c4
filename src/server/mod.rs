//! HTTP server adapters
//!
//! This module translates between the HTTP framework and the HTTP-agnostic
//! API layer.
//!
//! Currently supported:
//! - `tiny_http` - small blocking server with a fixed pool of worker threads

pub mod tiny_http;

pub use self::tiny_http::{Reply, dispatch, serve};
