//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `json/` - File-backed JSON document store implementing every repository

pub mod json;

pub use json::JsonStore;
