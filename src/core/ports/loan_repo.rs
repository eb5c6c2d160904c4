//! Loan repository port

use crate::core::models::{Loan, Payment};

use super::StoreResult;

/// Repository for the loan ledger
pub trait LoanRepository: Send + Sync {
    /// Create a loan; fails with `Duplicate` if the loan number exists
    fn create(&self, loan: &Loan) -> StoreResult<()>;

    /// Get a loan by number
    fn get(&self, loan_number: &str) -> StoreResult<Option<Loan>>;

    /// All loans, ordered by loan number
    fn list(&self) -> StoreResult<Vec<Loan>>;

    /// Loans borrowed by a member
    fn list_for_member(&self, member_id: u32) -> StoreResult<Vec<Loan>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|loan| loan.member_id == member_id)
            .collect())
    }

    /// Record a payment as one atomic compare-and-decrement.
    ///
    /// Succeeds only if the remaining balance covers the principal paid;
    /// otherwise returns `InsufficientBalance` and leaves the loan as it was.
    /// Two concurrent calls can never both consume the same balance.
    fn apply_payment(&self, loan_number: &str, payment: Payment) -> StoreResult<Loan>;
}
