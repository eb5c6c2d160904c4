//! Member directory handlers

use chrono::NaiveDate;

use crate::auth::Caller;
use crate::core::models::{AttendanceKind, Dependent, Member, MemberStatus, Money, setting_keys};
use crate::core::ports::StoreError;
use crate::core::services::{FieldErrors, FineSchedule, FineStatement, assess_fines};

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{
    AddDependentRequest, CreateMemberRequest, MemberFilter, MembersData, RecordDeathRequest,
    UpdateMemberRequest,
};
use super::{parse_id, parse_roles};

fn load(ctx: &AppContext, id: u32) -> Result<Member, ApiError> {
    ctx.members
        .get(id)?
        .ok_or_else(|| ApiError::not_found(format!("Member {id} not found")))
}

/// List members, optionally filtered by status or area
pub fn list_members(ctx: &AppContext, filter: &MemberFilter) -> Result<MembersData, ApiError> {
    let status = match filter.status.as_deref() {
        Some(raw) => Some(raw.parse::<MemberStatus>().map_err(ApiError::bad_request)?),
        None => None,
    };
    let members = ctx
        .members
        .list()?
        .into_iter()
        .filter(|m| status.is_none_or(|s| m.status == s))
        .filter(|m| {
            filter
                .area
                .as_deref()
                .is_none_or(|area| m.area.eq_ignore_ascii_case(area.trim()))
        })
        .collect();
    Ok(MembersData { members })
}

/// Get one member
pub fn get_member(ctx: &AppContext, id: &str) -> Result<Member, ApiError> {
    load(ctx, parse_id("member id", id)?)
}

/// Register a member
pub fn create_member(
    ctx: &AppContext,
    caller: &Caller,
    req: &CreateMemberRequest,
) -> Result<Member, ApiError> {
    let mut errors = FieldErrors::new();
    let name = errors.required_text("name", &req.name);
    let area = errors.required_text("area", &req.area);
    let phone = errors.optional_text("phone", req.phone.as_deref());
    let status = match req.status.as_deref() {
        Some(raw) => errors.parse("status", raw).unwrap_or_default(),
        None => MemberStatus::Regular,
    };
    let officer_roles = parse_roles(&mut errors, "officerRoles", &req.officer_roles);
    if req.id == Some(0) {
        errors.push("id", "id must be positive");
    }
    errors.into_result(())?;

    let id = match req.id {
        Some(id) => id,
        None => ctx.members.next_id()?,
    };
    let member = Member {
        phone,
        status,
        officer_roles,
        joined_on: req.joined_on,
        ..Member::new(id, name, area)
    };
    ctx.members.insert(&member).map_err(|e| match e {
        StoreError::Duplicate { .. } => ApiError::conflict(format!("Member {id} already exists")),
        other => other.into(),
    })?;

    log::info!("{} registered member {} ({})", caller.username, member.id, member.name);
    Ok(member)
}

/// Update a member's details
pub fn update_member(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
    req: &UpdateMemberRequest,
) -> Result<Member, ApiError> {
    let id = parse_id("member id", id)?;

    let mut errors = FieldErrors::new();
    let name = req.name.as_ref().map(|name| errors.required_text("name", name));
    let area = req.area.as_ref().map(|area| errors.required_text("area", area));
    let phone = req
        .phone
        .as_deref()
        .map(|phone| errors.optional_text("phone", Some(phone)));
    let status: Option<MemberStatus> =
        req.status.as_ref().and_then(|raw| errors.parse("status", raw));
    let officer_roles = req
        .officer_roles
        .as_ref()
        .map(|roles| parse_roles(&mut errors, "officerRoles", roles));
    errors.into_result(())?;

    let member = modify(ctx, id, |member| {
        if let Some(name) = &name {
            member.name.clone_from(name);
        }
        if let Some(area) = &area {
            member.area.clone_from(area);
        }
        if let Some(phone) = &phone {
            member.phone.clone_from(phone);
        }
        if let Some(status) = status {
            member.status = status;
        }
        if let Some(roles) = &officer_roles {
            member.officer_roles.clone_from(roles);
        }
        if let Some(joined_on) = req.joined_on {
            member.joined_on = Some(joined_on);
        }
        Ok(())
    })?;

    log::info!("{} updated member {}", caller.username, member.id);
    Ok(member)
}

/// Record a member's death
pub fn record_member_death(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
    req: &RecordDeathRequest,
) -> Result<Member, ApiError> {
    let id = parse_id("member id", id)?;
    check_death_date(req.date)?;

    let member = modify(ctx, id, |member| {
        if member.death_date.is_some() {
            return Err(StoreError::Rejected(format!(
                "Death of member {} is already recorded",
                member.id
            )));
        }
        member.death_date = Some(req.date);
        Ok(())
    })?;
    log::info!("{} recorded death of member {}", caller.username, member.id);
    Ok(member)
}

/// Add a dependent to a member
pub fn add_dependent(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
    req: &AddDependentRequest,
) -> Result<Member, ApiError> {
    let id = parse_id("member id", id)?;

    let mut errors = FieldErrors::new();
    let name = errors.required_text("name", &req.name);
    let relationship = errors.required_text("relationship", &req.relationship);
    errors.into_result(())?;

    let member = modify(ctx, id, |member| {
        member.dependents.push(Dependent {
            name: name.clone(),
            relationship: relationship.clone(),
            death_date: None,
        });
        Ok(())
    })?;
    log::info!("{} added a dependent to member {}", caller.username, member.id);
    Ok(member)
}

/// Record a dependent's death
pub fn record_dependent_death(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
    index: &str,
    req: &RecordDeathRequest,
) -> Result<Member, ApiError> {
    let member_id = parse_id("member id", id)?;
    let index: usize = index
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid dependent index: '{index}'")))?;
    let current = load(ctx, member_id)?;
    if current.dependents.get(index).is_none() {
        return Err(ApiError::not_found(format!(
            "Member {member_id} has no dependent {index}"
        )));
    }
    check_death_date(req.date)?;

    let member = modify(ctx, member_id, |member| {
        let dependent = member.dependents.get_mut(index).ok_or_else(|| {
            StoreError::Rejected(format!("Member {member_id} has no dependent {index}"))
        })?;
        if dependent.death_date.is_some() {
            return Err(StoreError::Rejected(format!(
                "Death of dependent {index} of member {member_id} is already recorded"
            )));
        }
        dependent.death_date = Some(req.date);
        Ok(())
    })?;

    log::info!(
        "{} recorded death of dependent {index} of member {member_id}",
        caller.username
    );
    Ok(member)
}

/// Apply `change` to the stored member atomically
fn modify(
    ctx: &AppContext,
    id: u32,
    mut change: impl FnMut(&mut Member) -> Result<(), StoreError>,
) -> Result<Member, ApiError> {
    ctx.members.modify(id, &mut change).map_err(|e| match e {
        StoreError::NotFound { .. } => ApiError::not_found(format!("Member {id} not found")),
        other => other.into(),
    })
}

fn check_death_date(date: NaiveDate) -> Result<(), ApiError> {
    if date > chrono::Local::now().date_naive() {
        let mut errors = FieldErrors::new();
        errors.push("date", "date of death cannot be in the future");
        return Err(errors.into());
    }
    Ok(())
}

/// A member's fines, priced with the current settings
pub fn member_fines(ctx: &AppContext, id: &str) -> Result<FineStatement, ApiError> {
    let member = load(ctx, parse_id("member id", id)?)?;

    let mut attendance = ctx.attendance.list(AttendanceKind::Meeting)?;
    attendance.extend(ctx.attendance.list(AttendanceKind::CommonWork)?);
    let funerals = ctx.funerals.list()?;

    let schedule = fine_schedule(ctx)?;
    Ok(assess_fines(member.id, &attendance, &funerals, &schedule))
}

/// Fine amounts from the settings cache; missing settings count as zero
pub(crate) fn fine_schedule(ctx: &AppContext) -> Result<FineSchedule, ApiError> {
    let amount = |key: &str| -> Result<Money, ApiError> {
        let value = ctx.settings_cache.value(key)?.unwrap_or(0.0);
        Money::from_decimal(value)
            .map_err(|e| ApiError::internal(format!("setting {key} holds an unusable amount: {e}")))
    };
    Ok(FineSchedule {
        meeting: amount(setting_keys::MEETING_ABSENCE_FINE)?,
        common_work: amount(setting_keys::COMMON_WORK_ABSENCE_FINE)?,
        cemetery: amount(setting_keys::CEMETERY_ABSENCE_FINE)?,
        funeral: amount(setting_keys::FUNERAL_ABSENCE_FINE)?,
    })
}
