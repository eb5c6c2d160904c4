//! Meeting and common-work attendance handlers

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};

use crate::auth::Caller;
use crate::core::models::{AttendanceKind, AttendanceRecord};
use crate::core::services::FieldErrors;

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{AttendanceData, AttendanceListData, AttendanceRequest};

fn parse_kind(raw: &str) -> Result<AttendanceKind, ApiError> {
    raw.parse().map_err(ApiError::bad_request)
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    let mut errors = FieldErrors::new();
    let date = errors.date("date", raw);
    errors.into_result(())?;
    date.ok_or_else(|| ApiError::bad_request(format!("Invalid date: '{raw}'")))
}

/// Record (or re-record) absences for one meeting or common-work day.
///
/// The eligible set is computed from the member directory at the time of
/// the call; every absent id must be in it. Resubmitting the same date
/// replaces the absentee list.
pub fn record_attendance(
    ctx: &AppContext,
    caller: &Caller,
    kind: &str,
    date: &str,
    req: &AttendanceRequest,
) -> Result<AttendanceData, ApiError> {
    let kind = parse_kind(kind)?;
    let date = parse_date(date)?;

    let eligible: BTreeSet<u32> = ctx
        .members
        .list()?
        .iter()
        .filter(|m| m.is_attendance_eligible())
        .map(|m| m.id)
        .collect();

    let absent: BTreeSet<u32> = req.absent_array.iter().copied().collect();
    let strays: Vec<String> = absent
        .difference(&eligible)
        .map(ToString::to_string)
        .collect();
    if !strays.is_empty() {
        let mut errors = FieldErrors::new();
        errors.push(
            "absentArray",
            format!("not eligible for {kind} attendance: {}", strays.join(", ")),
        );
        return Err(errors.into());
    }

    let record = AttendanceRecord {
        kind,
        date,
        eligible: eligible.into_iter().collect(),
        absent_array: absent.into_iter().collect(),
        recorded_by: caller.username.clone(),
        updated_at: Utc::now().to_rfc3339(),
    };
    let created = ctx.attendance.upsert(&record)?;

    log::info!(
        "{} {} {kind} attendance for {date}: {} absent of {}",
        caller.username,
        if created { "recorded" } else { "updated" },
        record.absent_array.len(),
        record.eligible.len()
    );
    Ok(AttendanceData { record, created })
}

/// Get the record for one date
pub fn get_attendance(
    ctx: &AppContext,
    kind: &str,
    date: &str,
) -> Result<AttendanceRecord, ApiError> {
    let kind = parse_kind(kind)?;
    let date = parse_date(date)?;
    ctx.attendance
        .get(kind, date)?
        .ok_or_else(|| ApiError::not_found(format!("No {kind} attendance recorded for {date}")))
}

/// Every record of one kind
pub fn list_attendance(ctx: &AppContext, kind: &str) -> Result<AttendanceListData, ApiError> {
    let kind = parse_kind(kind)?;
    Ok(AttendanceListData {
        records: ctx.attendance.list(kind)?,
    })
}
