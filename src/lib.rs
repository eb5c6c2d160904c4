//! idir - membership service for a community mutual-aid society
//!
//! Member records and dependents, loans and repayments, meeting and
//! common-work attendance, funeral duty rotation, fines, settings,
//! officer accounts and a basic cash book, served as a JSON REST API.

#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod core;
pub mod output;
pub mod paths;
pub mod server;
