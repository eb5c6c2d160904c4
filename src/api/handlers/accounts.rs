//! Cash book handlers

use chrono::Local;

use crate::auth::Caller;
use crate::core::models::{CashDirection, CashEntry, cents_to_decimal, setting_keys};
use crate::core::services::{FieldErrors, summarize};

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{CashEntriesData, CashEntryRequest, CashSummaryData};

/// Every cash book entry, oldest first
pub fn list_cash_entries(ctx: &AppContext) -> Result<CashEntriesData, ApiError> {
    Ok(CashEntriesData {
        entries: ctx.cash.list()?,
    })
}

/// Add a manual income or expense entry
pub fn add_cash_entry(
    ctx: &AppContext,
    caller: &Caller,
    req: &CashEntryRequest,
) -> Result<CashEntry, ApiError> {
    let mut errors = FieldErrors::new();
    let direction: Option<CashDirection> = errors.parse("direction", &req.direction);
    let category = errors.required_text("category", &req.category);
    let amount = errors.money("amount", req.amount);
    if amount.is_zero() && !errors.has("amount") {
        errors.push("amount", "amount must be greater than zero");
    }
    let description = errors
        .optional_text("description", req.description.as_deref())
        .unwrap_or_default();
    errors.into_result(())?;
    let Some(direction) = direction else {
        return Err(ApiError::bad_request("Invalid direction"));
    };

    let entry = ctx.cash.append(CashEntry {
        id: 0,
        date: req.date.unwrap_or_else(|| Local::now().date_naive()),
        direction,
        category,
        amount,
        description,
        loan_number: None,
        recorded_by: caller.username.clone(),
    })?;
    log::info!(
        "{} recorded {direction} {} ({})",
        caller.username,
        entry.amount,
        entry.category
    );
    Ok(entry)
}

/// Opening balance plus income minus expense
pub fn cash_summary(ctx: &AppContext) -> Result<CashSummaryData, ApiError> {
    let initial = ctx
        .settings_cache
        .value(setting_keys::INITIAL_BALANCE)?
        .unwrap_or(0.0);
    #[allow(clippy::cast_possible_truncation)]
    let initial_cents = (initial * 100.0).round() as i64;

    let summary = summarize(initial_cents, &ctx.cash.list()?);
    Ok(CashSummaryData {
        initial_balance: cents_to_decimal(summary.initial_balance_cents),
        income: summary.income.to_decimal(),
        expense: summary.expense.to_decimal(),
        balance: cents_to_decimal(summary.balance_cents),
        entries: summary.entries,
    })
}
