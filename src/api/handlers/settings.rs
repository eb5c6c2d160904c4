//! Settings registry handlers
//!
//! Reads go through the settings cache. Updates write the store, then
//! invalidate the cache so the next read sees the change.

use crate::auth::Caller;
use crate::core::models::{Setting, setting_keys};
use crate::core::services::FieldErrors;

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{SettingsData, UpdateSettingRequest};

/// Every setting
pub fn list_settings(ctx: &AppContext) -> Result<SettingsData, ApiError> {
    Ok(SettingsData {
        settings: ctx.settings_cache.list()?,
    })
}

/// One setting
pub fn get_setting(ctx: &AppContext, key: &str) -> Result<Setting, ApiError> {
    ctx.settings_cache
        .get(key)?
        .ok_or_else(|| ApiError::not_found(format!("Setting '{key}' not found")))
}

/// Change a setting, creating it if it does not exist yet
pub fn update_setting(
    ctx: &AppContext,
    caller: &Caller,
    key: &str,
    req: &UpdateSettingRequest,
) -> Result<Setting, ApiError> {
    let mut errors = FieldErrors::new();
    let key = errors.setting_key("key", key);
    let description = errors.optional_text("description", req.description.as_deref());
    check_value(&mut errors, &key, req.value);
    errors.into_result(())?;

    let setting = ctx.settings.upsert(&key, &mut |current: Option<Setting>| match current {
        Some(mut setting) => {
            setting.change(req.value, &caller.username);
            if description.is_some() {
                setting.description.clone_from(&description);
            }
            setting
        },
        None => Setting::new(&key, req.value, description.as_deref(), &caller.username),
    })?;
    ctx.settings_cache.invalidate();

    log::info!("{} set {key} = {}", caller.username, setting.value);
    Ok(setting)
}

/// Amount settings must be valid money; the opening balance may be negative
fn check_value(errors: &mut FieldErrors, key: &str, value: f64) {
    if key == setting_keys::INITIAL_BALANCE {
        if !value.is_finite() {
            errors.push("value", "value must be a finite number");
        } else {
            errors.money("value", value.abs());
        }
    } else {
        errors.money("value", value);
    }
}
