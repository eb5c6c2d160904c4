//! Core domain logic for idir
//!
//! This module contains pure business logic with no I/O dependencies.
//! All storage interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Member, Loan, FuneralEvent, Setting, ...)
//! - `services/` - Rotation, authorization, validation, fines, cash book
//! - `ports/` - Repository traits implemented by the storage adapters

pub mod models;
pub mod ports;
pub mod services;
