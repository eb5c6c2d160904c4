//! Cash book summary

use serde::Serialize;

use crate::core::models::{CashDirection, CashEntry, Money};

/// Totals over the cash book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSummary {
    /// Balance before the first entry, in cents
    pub initial_balance_cents: i64,
    /// Sum of income entries
    pub income: Money,
    /// Sum of expense entries
    pub expense: Money,
    /// initial + income - expense, in cents
    pub balance_cents: i64,
    /// Number of entries
    pub entries: usize,
}

/// Sum up the cash book on top of an initial balance
#[must_use]
pub fn summarize(initial_balance_cents: i64, entries: &[CashEntry]) -> CashSummary {
    let total = |direction: CashDirection| -> Money {
        entries
            .iter()
            .filter(|e| e.direction == direction)
            .map(|e| e.amount)
            .sum()
    };
    let income = total(CashDirection::Income);
    let expense = total(CashDirection::Expense);
    let balance_cents = initial_balance_cents
        .saturating_add(i64::try_from(income.cents()).unwrap_or(i64::MAX))
        .saturating_sub(i64::try_from(expense.cents()).unwrap_or(i64::MAX));

    CashSummary {
        initial_balance_cents,
        income,
        expense,
        balance_cents,
        entries: entries.len(),
    }
}
