//! HTTP-agnostic API layer
//!
//! This module provides typed request/response structures and business
//! logic handlers that can be used by any HTTP server implementation or
//! directly by clients (the CLI, tests).
//!
//! ## Design
//!
//! - **Handlers are plain functions**: take the [`AppContext`], the caller
//!   and typed input, return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: no HTTP types leak into this module
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for
//!   translation
//! - **Validation before writes**: request bodies are checked into typed
//!   values, collecting every field error, before the store is touched

mod context;
mod error;
mod handlers;
mod types;

pub use context::{AppContext, SYSTEM_USER};
pub use error::{ApiError, ApiErrorData, ErrorCode};
pub use handlers::{
    add_cash_entry, add_dependent, cash_summary, create_funeral, create_loan, create_member,
    create_officer, delete_officer, finalize_funeral, get_attendance, get_funeral, get_loan,
    get_member, get_officer, get_setting, list_attendance, list_cash_entries, list_funerals,
    list_loans, list_members, list_officers, list_settings, member_fines, member_loans,
    preview_duties, record_attendance, record_dependent_death, record_funeral_absences,
    record_member_death, record_payment, remove_from_funeral, update_member, update_officer,
    update_setting,
};
pub use types::{
    AddDependentRequest, ApiResponse, AttendanceData, AttendanceListData, AttendanceRequest,
    CashEntriesData, CashEntryRequest, CashSummaryData, CreateFuneralRequest, CreateLoanRequest,
    CreateMemberRequest, CreateOfficerRequest, DeletedData, DutyPreviewData,
    FuneralAbsenceRequest, FuneralsData, HealthData, LoansData, MemberFilter, MembersData,
    OfficersData, PaymentRequest, RecordDeathRequest, RemovalData, RemoveFromDutyRequest,
    SettingsData, UpdateMemberRequest, UpdateOfficerRequest, UpdateSettingRequest,
};

/// Service health
#[must_use]
pub fn health() -> HealthData {
    HealthData {
        status: "ok",
        version: crate::VERSION,
    }
}
