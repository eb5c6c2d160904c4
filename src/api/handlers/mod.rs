//! Pure API handlers
//!
//! These handlers contain business logic and are HTTP-agnostic. They take
//! the app context, the authenticated caller where a write is attributed,
//! and typed input, and return `Result<T, ApiError>`. Authorization is the
//! server's job; handlers assume the caller was allowed in.

mod accounts;
mod attendance;
mod funerals;
mod loans;
mod members;
mod officers;
mod settings;

pub use accounts::{add_cash_entry, cash_summary, list_cash_entries};
pub use attendance::{get_attendance, list_attendance, record_attendance};
pub use funerals::{
    create_funeral, finalize_funeral, get_funeral, list_funerals, preview_duties,
    record_funeral_absences, remove_from_funeral,
};
pub use loans::{create_loan, get_loan, list_loans, member_loans, record_payment};
pub use members::{
    add_dependent, create_member, get_member, list_members, member_fines, record_dependent_death,
    record_member_death, update_member,
};
pub use officers::{create_officer, delete_officer, get_officer, list_officers, update_officer};
pub use settings::{get_setting, list_settings, update_setting};

use std::collections::BTreeSet;

use crate::core::models::Role;
use crate::core::services::FieldErrors;

use super::error::ApiError;

/// Parse a numeric path id
pub(crate) fn parse_id(field: &str, raw: &str) -> Result<u32, ApiError> {
    raw.parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid {field}: '{raw}'")))
}

/// Parse a list of role names, recording bad ones
pub(crate) fn parse_roles(errors: &mut FieldErrors, field: &str, raw: &[String]) -> BTreeSet<Role> {
    raw.iter()
        .filter_map(|r| errors.parse::<Role>(field, r))
        .collect()
}
