//! Officer account handlers (super-admin only)

use crate::auth::Caller;
use crate::core::models::{Officer, Role};
use crate::core::ports::StoreError;
use crate::core::services::FieldErrors;

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{CreateOfficerRequest, DeletedData, OfficersData, UpdateOfficerRequest};
use super::parse_roles;

fn load(ctx: &AppContext, username: &str) -> Result<Officer, ApiError> {
    ctx.officers
        .get(username)?
        .ok_or_else(|| ApiError::not_found(format!("Officer '{username}' not found")))
}

/// List officer accounts
pub fn list_officers(ctx: &AppContext) -> Result<OfficersData, ApiError> {
    Ok(OfficersData {
        officers: ctx.officers.list()?,
    })
}

/// Get one officer account
pub fn get_officer(ctx: &AppContext, username: &str) -> Result<Officer, ApiError> {
    load(ctx, username)
}

/// Create an officer account
pub fn create_officer(
    ctx: &AppContext,
    caller: &Caller,
    req: &CreateOfficerRequest,
) -> Result<Officer, ApiError> {
    let mut errors = FieldErrors::new();
    let username = errors.username("username", &req.username);
    let name = errors.required_text("name", &req.name);
    let roles = parse_roles(&mut errors, "roles", &req.roles);
    if req.roles.is_empty() {
        errors.push("roles", "at least one role is required");
    }
    if let Some(member_id) = req.member_id {
        if ctx.members.get(member_id)?.is_none() {
            errors.push("memberId", format!("member {member_id} does not exist"));
        }
    }
    errors.into_result(())?;

    let officer = Officer {
        member_id: req.member_id,
        ..Officer::new(&username, &name, roles)
    };
    ctx.officers.create(&officer).map_err(|e| match e {
        StoreError::Duplicate { .. } => {
            ApiError::conflict(format!("Officer '{username}' already exists"))
        },
        other => other.into(),
    })?;

    log::info!("{} created officer {username}", caller.username);
    Ok(officer)
}

/// Update an officer's name, roles or active flag
pub fn update_officer(
    ctx: &AppContext,
    caller: &Caller,
    username: &str,
    req: &UpdateOfficerRequest,
) -> Result<Officer, ApiError> {
    let mut officer = load(ctx, username)?;

    let mut errors = FieldErrors::new();
    if let Some(name) = &req.name {
        officer.name = errors.required_text("name", name);
    }
    if let Some(roles) = &req.roles {
        if roles.is_empty() {
            errors.push("roles", "at least one role is required");
        }
        officer.roles = parse_roles(&mut errors, "roles", roles);
    }
    if let Some(active) = req.active {
        officer.active = active;
    }
    if officer.username == caller.username
        && (!officer.active || !officer.roles.contains(&Role::SuperAdmin))
    {
        errors.push("roles", "you cannot deactivate or demote your own account");
    }
    errors.into_result(())?;

    ctx.officers.update(&officer)?;
    log::info!("{} updated officer {}", caller.username, officer.username);
    Ok(officer)
}

/// Delete an officer account
pub fn delete_officer(
    ctx: &AppContext,
    caller: &Caller,
    username: &str,
) -> Result<DeletedData, ApiError> {
    if username == caller.username {
        return Err(ApiError::conflict("You cannot delete your own account"));
    }
    if !ctx.officers.delete(username)? {
        return Err(ApiError::not_found(format!("Officer '{username}' not found")));
    }
    log::info!("{} deleted officer {username}", caller.username);
    Ok(DeletedData { deleted: true })
}
