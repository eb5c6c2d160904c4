//! API request and response types
//!
//! All types are framework-agnostic and can be used by any client. Business
//! fields are camelCase on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::models::{
    AttendanceRecord, CashEntry, FuneralEvent, Loan, Member, Officer, Setting,
};
use crate::core::services::{DutyPlan, Removal};

use super::error::ApiErrorData;

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Standard API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorData>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    #[must_use]
    pub fn error(error: ApiErrorData) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

// =============================================================================
// MEMBERS
// =============================================================================

/// Request body for registering a member
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    /// Membership number; assigned automatically when absent
    #[serde(default)]
    pub id: Option<u32>,
    /// Full name
    pub name: String,
    /// Neighbourhood or village area
    pub area: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Membership status (defaults to regular)
    #[serde(default)]
    pub status: Option<String>,
    /// Officer roles held
    #[serde(default)]
    pub officer_roles: Vec<String>,
    /// Date joined
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

/// Request body for updating a member; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New area
    #[serde(default)]
    pub area: Option<String>,
    /// New phone (empty string clears it)
    #[serde(default)]
    pub phone: Option<String>,
    /// New status
    #[serde(default)]
    pub status: Option<String>,
    /// Replacement officer role set
    #[serde(default)]
    pub officer_roles: Option<Vec<String>>,
    /// New join date
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
}

/// Request body for recording a death
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDeathRequest {
    /// Date of death
    pub date: NaiveDate,
}

/// Request body for adding a dependent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDependentRequest {
    /// Full name
    pub name: String,
    /// Relationship to the member
    pub relationship: String,
}

/// Optional filters for the member list
#[derive(Debug, Default, Clone)]
pub struct MemberFilter {
    /// Only members with this status
    pub status: Option<String>,
    /// Only members in this area (case-insensitive)
    pub area: Option<String>,
}

/// Response for member list
#[derive(Debug, Serialize)]
pub struct MembersData {
    /// Matching members, ascending by id
    pub members: Vec<Member>,
}

// =============================================================================
// LOANS
// =============================================================================

/// Request body for issuing a loan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    /// Unique loan number
    pub loan_number: String,
    /// Borrower
    pub member_id: u32,
    /// Exactly two guarantors, distinct from each other and the borrower
    pub guarantors: Vec<u32>,
    /// Amount lent
    pub principal: f64,
    /// Issue date (defaults to today)
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

/// Request body for recording a repayment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Principal repaid
    pub principal: f64,
    /// Interest paid
    #[serde(default)]
    pub interest: f64,
    /// Late penalty paid
    #[serde(default)]
    pub penalty: f64,
    /// Payment date (defaults to today)
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
}

/// Response for loan list
#[derive(Debug, Serialize)]
pub struct LoansData {
    /// Loans, ordered by loan number
    pub loans: Vec<Loan>,
}

// =============================================================================
// ATTENDANCE
// =============================================================================

/// Request body for recording meeting or common-work absences
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    /// Absent member ids
    #[serde(alias = "absent")]
    pub absent_array: Vec<u32>,
}

/// Response for an attendance upsert
#[derive(Debug, Serialize)]
pub struct AttendanceData {
    /// Stored record
    pub record: AttendanceRecord,
    /// `true` when no record existed for the date
    pub created: bool,
}

/// Response for attendance list
#[derive(Debug, Serialize)]
pub struct AttendanceListData {
    /// Records, ascending by date
    pub records: Vec<AttendanceRecord>,
}

// =============================================================================
// FUNERALS
// =============================================================================

/// Request body for planning a funeral
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFuneralRequest {
    /// Member who died, or whose dependent died
    pub member_id: u32,
    /// Index of the deceased dependent, if not the member
    #[serde(default)]
    pub dependent_index: Option<usize>,
    /// Funeral date
    pub date: NaiveDate,
}

/// Request body for removing a member from duty
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromDutyRequest {
    /// Member to remove
    pub member_id: u32,
}

/// Request body for recording duty absences
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuneralAbsenceRequest {
    /// `cemetery` or `funeral`
    pub duty: String,
    /// Absent member ids; replaces the previous list for the duty
    pub absent: Vec<u32>,
}

/// Response for funeral list
#[derive(Debug, Serialize)]
pub struct FuneralsData {
    /// Events, ascending by id
    pub funerals: Vec<FuneralEvent>,
}

/// Response for a duty removal
#[derive(Debug, Serialize)]
pub struct RemovalData {
    /// Event after the removal
    pub funeral: FuneralEvent,
    /// What moved
    pub removal: Removal,
}

/// Response for a duty preview
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyPreviewData {
    /// Cursor the plan starts after
    pub start_after_id: u32,
    /// Carry-over ids offered
    pub carry_over: Vec<u32>,
    /// The plan
    pub plan: DutyPlan,
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Request body for changing a setting
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
    /// New value
    pub value: f64,
    /// Description (kept when absent)
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for settings list
#[derive(Debug, Serialize)]
pub struct SettingsData {
    /// Settings, ordered by key
    pub settings: Vec<Setting>,
}

// =============================================================================
// OFFICERS
// =============================================================================

/// Request body for creating an officer account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfficerRequest {
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    /// Roles granted
    pub roles: Vec<String>,
    /// Linked member record
    #[serde(default)]
    pub member_id: Option<u32>,
}

/// Request body for updating an officer account
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfficerRequest {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement role set
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    /// Activate or deactivate
    #[serde(default)]
    pub active: Option<bool>,
}

/// Response for officer list
#[derive(Debug, Serialize)]
pub struct OfficersData {
    /// Officers, ordered by username
    pub officers: Vec<Officer>,
}

/// Response for a delete
#[derive(Debug, Serialize)]
pub struct DeletedData {
    /// Whether something was deleted
    pub deleted: bool,
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Request body for a manual cash book entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashEntryRequest {
    /// `income` or `expense`
    pub direction: String,
    /// Category label
    pub category: String,
    /// Amount
    pub amount: f64,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Entry date (defaults to today)
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Response for cash book list
#[derive(Debug, Serialize)]
pub struct CashEntriesData {
    /// Entries, oldest first
    pub entries: Vec<CashEntry>,
}

/// Cash book summary as decimals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSummaryData {
    /// Opening balance
    pub initial_balance: f64,
    /// Total income
    pub income: f64,
    /// Total expense
    pub expense: f64,
    /// Opening balance + income - expense (may be negative)
    pub balance: f64,
    /// Number of entries
    pub entries: usize,
}

// =============================================================================
// HEALTH
// =============================================================================

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// Always `ok`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}
