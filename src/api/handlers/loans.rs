//! Loan ledger handlers
//!
//! Issuing a loan and recording a repayment each post a cash book entry.
//! The repayment itself is one conditional decrement in the store; the cash
//! entry is written only after it succeeds.

use chrono::Local;

use crate::auth::Caller;
use crate::core::models::{CashDirection, CashEntry, Loan, LoanStatus, Money, Payment};
use crate::core::ports::StoreError;
use crate::core::services::FieldErrors;

use super::super::context::AppContext;
use super::super::error::ApiError;
use super::super::types::{CreateLoanRequest, LoansData, PaymentRequest};
use super::parse_id;

/// Cash book category for money lent out
pub const LOAN_DISBURSEMENT: &str = "loan-disbursement";
/// Cash book category for money paid back
pub const LOAN_REPAYMENT: &str = "loan-repayment";

/// List every loan
pub fn list_loans(ctx: &AppContext) -> Result<LoansData, ApiError> {
    Ok(LoansData {
        loans: ctx.loans.list()?,
    })
}

/// Get one loan
pub fn get_loan(ctx: &AppContext, loan_number: &str) -> Result<Loan, ApiError> {
    ctx.loans
        .get(loan_number)?
        .ok_or_else(|| ApiError::not_found(format!("Loan {loan_number} not found")))
}

/// Loans taken by one member
pub fn member_loans(ctx: &AppContext, member_id: &str) -> Result<LoansData, ApiError> {
    let member_id = parse_id("member id", member_id)?;
    if ctx.members.get(member_id)?.is_none() {
        return Err(ApiError::not_found(format!("Member {member_id} not found")));
    }
    Ok(LoansData {
        loans: ctx.loans.list_for_member(member_id)?,
    })
}

/// Issue a loan
pub fn create_loan(
    ctx: &AppContext,
    caller: &Caller,
    req: &CreateLoanRequest,
) -> Result<Loan, ApiError> {
    let mut errors = FieldErrors::new();
    let loan_number = errors.loan_number("loanNumber", &req.loan_number);
    let principal = errors.money("principal", req.principal);
    if principal.is_zero() && !errors.has("principal") {
        errors.push("principal", "principal must be greater than zero");
    }

    let guarantors: Option<[u32; 2]> = match req.guarantors.as_slice() {
        [a, b] if a == b => {
            errors.push("guarantors", "guarantors must be two different members");
            None
        },
        [a, b] if *a == req.member_id || *b == req.member_id => {
            errors.push("guarantors", "the borrower cannot guarantee their own loan");
            None
        },
        [a, b] => Some([*a, *b]),
        _ => {
            errors.push("guarantors", "exactly two guarantors are required");
            None
        },
    };

    for (field, id) in std::iter::once(("memberId", req.member_id))
        .chain(guarantors.iter().flatten().map(|id| ("guarantors", *id)))
    {
        match ctx.members.get(id)? {
            Some(member) if member.is_active() => {},
            Some(_) => errors.push(field, format!("member {id} is not active")),
            None => errors.push(field, format!("member {id} does not exist")),
        }
    }
    errors.into_result(())?;
    let Some(guarantors) = guarantors else {
        return Err(ApiError::bad_request("Invalid guarantors"));
    };

    let issued_on = req.issued_on.unwrap_or_else(|| Local::now().date_naive());
    let loan = Loan {
        loan_number: loan_number.clone(),
        member_id: req.member_id,
        guarantors,
        principal,
        issued_on,
        remaining_balance: principal,
        payments: Vec::new(),
        status: LoanStatus::Active,
        created_by: caller.username.clone(),
    };
    ctx.loans.create(&loan).map_err(|e| match e {
        StoreError::Duplicate { .. } => {
            ApiError::conflict(format!("Loan number {loan_number} is already taken"))
        },
        other => other.into(),
    })?;

    post_cash(
        ctx,
        caller,
        CashEntry {
            id: 0,
            date: issued_on,
            direction: CashDirection::Expense,
            category: LOAN_DISBURSEMENT.to_string(),
            amount: principal,
            description: format!("Loan {loan_number} to member {}", loan.member_id),
            loan_number: Some(loan_number.clone()),
            recorded_by: caller.username.clone(),
        },
    );

    log::info!(
        "{} issued loan {loan_number} of {principal} to member {}",
        caller.username,
        loan.member_id
    );
    Ok(loan)
}

/// Record a repayment against a loan
pub fn record_payment(
    ctx: &AppContext,
    caller: &Caller,
    loan_number: &str,
    req: &PaymentRequest,
) -> Result<Loan, ApiError> {
    let mut errors = FieldErrors::new();
    let payment = Payment {
        principal: errors.money("principal", req.principal),
        interest: errors.money("interest", req.interest),
        penalty: errors.money("penalty", req.penalty),
        paid_on: req.paid_on.unwrap_or_else(|| Local::now().date_naive()),
        recorded_by: caller.username.clone(),
    };
    if errors.is_empty() && payment.total().is_zero() {
        errors.push("principal", "payment must be greater than zero");
    }
    errors.into_result(())?;

    let total = payment.total();
    let paid_on = payment.paid_on;
    let loan = ctx
        .loans
        .apply_payment(loan_number, payment)
        .map_err(|e| match e {
            StoreError::NotFound { .. } => {
                ApiError::not_found(format!("Loan {loan_number} not found"))
            },
            StoreError::InsufficientBalance { remaining, .. } => ApiError::conflict(format!(
                "Payment exceeds the remaining balance of {remaining} on loan {loan_number}"
            )),
            other => other.into(),
        })?;

    post_cash(
        ctx,
        caller,
        CashEntry {
            id: 0,
            date: paid_on,
            direction: CashDirection::Income,
            category: LOAN_REPAYMENT.to_string(),
            amount: total,
            description: format!("Repayment on loan {loan_number}"),
            loan_number: Some(loan_number.to_string()),
            recorded_by: caller.username.clone(),
        },
    );

    log::info!(
        "{} recorded {total} on loan {loan_number}, {} remaining",
        caller.username,
        loan.remaining_balance
    );
    Ok(loan)
}

/// Post a ledger side effect. The loan write already succeeded, so a
/// failure here is logged rather than returned.
fn post_cash(ctx: &AppContext, caller: &Caller, entry: CashEntry) {
    let amount: Money = entry.amount;
    if let Err(e) = ctx.cash.append(entry) {
        log::error!(
            "Cash entry of {amount} by {} could not be posted: {e}",
            caller.username
        );
    }
}
