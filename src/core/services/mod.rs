//! Business logic services
//!
//! Pure logic that operates on domain models. These services have no I/O
//! dependencies - they operate on data passed in and return results.
//!
//! - [`rotation`] - Funeral duty assignment and manual adjustment
//! - [`authz`] - Role-based authorization policy
//! - [`validation`] - Field-level validation results
//! - [`fines`] - Fines derived from absences
//! - [`ledger`] - Cash book summary

pub mod authz;
pub mod fines;
pub mod ledger;
pub mod rotation;
pub mod validation;

pub use authz::{Decision, authorize};
pub use fines::{FineItem, FineReason, FineSchedule, FineStatement, assess_fines};
pub use ledger::{CashSummary, summarize};
pub use rotation::{
    AdjustError, Backfill, DutyPlan, ReleaseWindow, Removal, RosterEntry, RotationPolicy,
    assign_duties, build_roster, live_carry_over, remove_from_duty,
};
pub use validation::{FieldError, FieldErrors};
