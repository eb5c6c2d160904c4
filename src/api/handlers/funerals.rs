//! Funeral event handlers
//!
//! Every change to a funeral event, and to the rotation state, runs under
//! the context's rotation lock.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::auth::Caller;
use crate::core::models::{Deceased, Duty, FuneralEvent};
use crate::core::services::{
    Backfill, FieldErrors, assign_duties, build_roster, live_carry_over, remove_from_duty,
};

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{
    CreateFuneralRequest, DutyPreviewData, FuneralAbsenceRequest, FuneralsData, RemovalData,
    RemoveFromDutyRequest,
};
use super::parse_id;

fn load(ctx: &AppContext, id: u32) -> Result<FuneralEvent, ApiError> {
    ctx.funerals
        .get(id)?
        .ok_or_else(|| ApiError::not_found(format!("Funeral {id} not found")))
}

/// List every funeral event
pub fn list_funerals(ctx: &AppContext) -> Result<FuneralsData, ApiError> {
    Ok(FuneralsData {
        funerals: ctx.funerals.list()?,
    })
}

/// Get one funeral event
pub fn get_funeral(ctx: &AppContext, id: &str) -> Result<FuneralEvent, ApiError> {
    load(ctx, parse_id("funeral id", id)?)
}

/// The duties the next funeral would receive, without saving anything
pub fn preview_duties(ctx: &AppContext) -> Result<DutyPreviewData, ApiError> {
    let state = ctx.funerals.rotation_state()?;
    let roster = build_roster(&ctx.members.list()?);
    let carry_over = live_carry_over(&roster, &state.pending_carry_over);
    let plan = assign_duties(&roster, state.last_assigned_id, &carry_over, &ctx.rotation);
    Ok(DutyPreviewData {
        start_after_id: state.last_assigned_id,
        carry_over: carry_over.into_iter().collect(),
        plan,
    })
}

/// Plan a funeral for a recorded death and assign its duties
pub fn create_funeral(
    ctx: &AppContext,
    caller: &Caller,
    req: &CreateFuneralRequest,
) -> Result<FuneralEvent, ApiError> {
    let _rotation = ctx.lock_rotation();

    let member = ctx
        .members
        .get(req.member_id)?
        .ok_or_else(|| ApiError::not_found(format!("Member {} not found", req.member_id)))?;
    let name = member
        .deceased_name(req.dependent_index)
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Member {} has no dependent {}",
                member.id,
                req.dependent_index.unwrap_or_default()
            ))
        })?
        .to_string();
    if member.death_recorded(req.dependent_index).is_none() {
        return Err(ApiError::conflict(format!(
            "No death recorded for {name}; record it before planning the funeral"
        )));
    }

    let existing = ctx.funerals.list()?;
    if let Some(event) = existing.iter().find(|e| {
        e.deceased.member_id == req.member_id && e.deceased.dependent_index == req.dependent_index
    }) {
        return Err(ApiError::conflict(format!(
            "Funeral {} is already planned for {name}",
            event.id
        )));
    }

    let mut state = ctx.funerals.rotation_state()?;
    let roster = build_roster(&ctx.members.list()?);
    let live = live_carry_over(&roster, &state.pending_carry_over);
    if live.len() < state.pending_carry_over.len() {
        log::info!(
            "Dropping {} carry-over members who can no longer take duty",
            state.pending_carry_over.len() - live.len()
        );
        state.pending_carry_over = live;
    }
    let plan = assign_duties(
        &roster,
        state.last_assigned_id,
        &state.pending_carry_over,
        &ctx.rotation,
    );

    let event = FuneralEvent {
        id: ctx.funerals.next_id()?,
        deceased: Deceased {
            member_id: member.id,
            dependent_index: req.dependent_index,
            name,
        },
        date: req.date,
        start_after_id: state.last_assigned_id,
        duty_size: ctx.rotation.duty_size,
        carry_over: state.pending_carry_over.iter().copied().collect(),
        cemetery_assignments: plan.cemetery_assignments,
        funeral_assignments: plan.funeral_assignments,
        removed_members: Vec::new(),
        released_members: plan.released_members,
        cemetery_absent: Vec::new(),
        funeral_absent: Vec::new(),
        finalized: false,
        shortfall: plan.shortfall,
        created_by: caller.username.clone(),
        created_at: Utc::now().to_rfc3339(),
    };
    ctx.funerals.insert(&event)?;

    for id in &plan.carry_over_consumed {
        state.pending_carry_over.remove(id);
    }
    state.last_assigned_id = plan.next_cursor;
    state.last_event_id = Some(event.id);
    ctx.funerals.save_rotation_state(&state)?;

    if event.shortfall > 0 {
        log::warn!(
            "Funeral {} is short {} duty slots; the rotation restarts from the top",
            event.id,
            event.shortfall
        );
    }
    log::info!(
        "{} planned funeral {} for {}: {} cemetery, {} parade, {} released",
        caller.username,
        event.id,
        event.deceased.name,
        event.cemetery_assignments.len(),
        event.funeral_assignments.len(),
        event.released_members.len()
    );
    Ok(event)
}

/// Take a member off duty and refill the lists
pub fn remove_from_funeral(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
    req: &RemoveFromDutyRequest,
) -> Result<RemovalData, ApiError> {
    let _rotation = ctx.lock_rotation();

    let mut event = load(ctx, parse_id("funeral id", id)?)?;
    let mut state = ctx.funerals.rotation_state()?;
    let roster = build_roster(&ctx.members.list()?);

    // Members on duty at the latest funeral are not free to backfill an older one
    let excluded = match state.last_event_id {
        Some(latest) if latest != event.id => load(ctx, latest)?.taken_ids(),
        _ => BTreeSet::new(),
    };
    let carry_over = live_carry_over(&roster, &state.pending_carry_over);
    let backfill = Backfill {
        after_id: state.last_assigned_id,
        carry_over: &carry_over,
        excluded: &excluded,
    };
    let removal = remove_from_duty(
        &mut event,
        req.member_id,
        &roster,
        &backfill,
        ctx.rotation.release_window,
    )?;
    ctx.funerals.update(&event)?;

    state.pending_carry_over.insert(removal.removed.id);
    if let Some(backfilled) = &removal.backfilled {
        state.pending_carry_over.remove(&backfilled.id);
        state.last_assigned_id = state.last_assigned_id.max(backfilled.id);
    }
    ctx.funerals.save_rotation_state(&state)?;

    log::info!(
        "{} removed member {} from {} duty at funeral {}",
        caller.username,
        removal.removed.id,
        removal.duty,
        event.id
    );
    Ok(RemovalData {
        funeral: event,
        removal,
    })
}

/// Record who missed their duty; replaces the list for that duty
pub fn record_funeral_absences(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
    req: &FuneralAbsenceRequest,
) -> Result<FuneralEvent, ApiError> {
    let _rotation = ctx.lock_rotation();

    let mut event = load(ctx, parse_id("funeral id", id)?)?;
    if event.finalized {
        return Err(ApiError::conflict(format!("Funeral {} is finalized", event.id)));
    }

    let mut errors = FieldErrors::new();
    let duty: Option<Duty> = errors.parse("duty", &req.duty);
    errors.into_result(())?;
    let Some(duty) = duty else {
        return Err(ApiError::bad_request("Invalid duty"));
    };

    let assigned: BTreeSet<u32> = event.assignments(duty).iter().map(|m| m.id).collect();
    let absent: BTreeSet<u32> = req.absent.iter().copied().collect();
    let strays: Vec<String> = absent.difference(&assigned).map(ToString::to_string).collect();
    if !strays.is_empty() {
        let mut errors = FieldErrors::new();
        errors.push(
            "absent",
            format!("not assigned {duty} duty at this funeral: {}", strays.join(", ")),
        );
        return Err(errors.into());
    }

    let absent: Vec<u32> = absent.into_iter().collect();
    match duty {
        Duty::Cemetery => event.cemetery_absent = absent,
        Duty::Funeral => event.funeral_absent = absent,
    }
    ctx.funerals.update(&event)?;

    log::info!(
        "{} recorded {} {duty} absences at funeral {}",
        caller.username,
        event.absent(duty).len(),
        event.id
    );
    Ok(event)
}

/// Close the register; later adjustments are refused
pub fn finalize_funeral(
    ctx: &AppContext,
    caller: &Caller,
    id: &str,
) -> Result<FuneralEvent, ApiError> {
    let _rotation = ctx.lock_rotation();

    let mut event = load(ctx, parse_id("funeral id", id)?)?;
    if event.finalized {
        return Err(ApiError::conflict(format!(
            "Funeral {} is already finalized",
            event.id
        )));
    }
    event.finalized = true;
    ctx.funerals.update(&event)?;
    log::info!("{} finalized funeral {}", caller.username, event.id);
    Ok(event)
}
