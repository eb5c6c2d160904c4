//! Loan model
//!
//! A loan is issued to a member against two guarantors. Payments carry a
//! principal / interest / penalty triple; only the principal part reduces
//! the remaining balance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Money;

/// Why a payment cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    /// Principal paid exceeds what is still owed
    #[error("payment of {requested} exceeds remaining balance of {remaining}")]
    InsufficientBalance {
        /// Balance still owed
        remaining: Money,
        /// Principal the caller tried to pay
        requested: Money,
    },

    /// Loan already fully repaid
    #[error("loan is already settled")]
    Settled,
}

/// Loan lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Balance outstanding
    #[default]
    Active,
    /// Fully repaid
    Settled,
}

/// One repayment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Principal repaid
    pub principal: Money,
    /// Interest paid
    #[serde(default)]
    pub interest: Money,
    /// Late penalty paid
    #[serde(default)]
    pub penalty: Money,
    /// Date of payment
    pub paid_on: NaiveDate,
    /// Officer who recorded it
    pub recorded_by: String,
}

impl Payment {
    /// Cash received for this payment
    #[must_use]
    pub fn total(&self) -> Money {
        [self.principal, self.interest, self.penalty].into_iter().sum()
    }
}

/// A loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Unique loan number
    pub loan_number: String,
    /// Borrower
    pub member_id: u32,
    /// Two distinct guarantors, neither of them the borrower
    pub guarantors: [u32; 2],
    /// Amount lent
    pub principal: Money,
    /// Date issued
    pub issued_on: NaiveDate,
    /// Principal still owed
    pub remaining_balance: Money,
    /// Payments in the order recorded
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Active or settled
    #[serde(default)]
    pub status: LoanStatus,
    /// Officer who issued it
    pub created_by: String,
}

impl Loan {
    /// Apply a payment: decrement the remaining balance if it covers the
    /// principal paid, otherwise leave the loan untouched.
    pub fn apply_payment(&mut self, payment: Payment) -> Result<(), LoanError> {
        if self.status == LoanStatus::Settled {
            return Err(LoanError::Settled);
        }
        let remaining = self.remaining_balance.checked_sub(payment.principal).ok_or(
            LoanError::InsufficientBalance {
                remaining: self.remaining_balance,
                requested: payment.principal,
            },
        )?;

        self.remaining_balance = remaining;
        if remaining.is_zero() {
            self.status = LoanStatus::Settled;
        }
        self.payments.push(payment);
        Ok(())
    }

    /// Total principal, interest and penalty received
    #[must_use]
    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(Payment::total).sum()
    }
}
