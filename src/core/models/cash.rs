//! Cash book entries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Money;

/// Money in or out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashDirection {
    /// Received
    Income,
    /// Paid out
    Expense,
}

impl std::fmt::Display for CashDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for CashDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            _ => Err(format!("Invalid direction: {s}. Use: income, expense")),
        }
    }
}

/// One line of the cash book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashEntry {
    /// Sequential id, assigned by the store
    #[serde(default)]
    pub id: u32,
    /// Date of the movement
    pub date: NaiveDate,
    /// Income or expense
    pub direction: CashDirection,
    /// Category such as `contribution`, `loan-disbursement`, `loan-repayment`
    pub category: String,
    /// Amount moved
    pub amount: Money,
    /// Free text
    #[serde(default)]
    pub description: String,
    /// Loan this movement belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_number: Option<String>,
    /// Officer who recorded it
    pub recorded_by: String,
}
