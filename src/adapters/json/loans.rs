//! Loan repository on the JSON store

use crate::core::models::{Loan, LoanError, Payment};
use crate::core::ports::{LoanRepository, StoreError, StoreResult};

use super::{JsonStore, LOANS};

impl LoanRepository for JsonStore {
    fn create(&self, loan: &Loan) -> StoreResult<()> {
        if self.insert_doc(LOANS, &loan.loan_number, loan)? {
            Ok(())
        } else {
            Err(StoreError::duplicate(LOANS, &loan.loan_number))
        }
    }

    fn get(&self, loan_number: &str) -> StoreResult<Option<Loan>> {
        self.read_doc(LOANS, loan_number)
    }

    fn list(&self) -> StoreResult<Vec<Loan>> {
        let mut loans: Vec<Loan> = self.list_docs(LOANS)?;
        loans.sort_by(|a, b| a.loan_number.cmp(&b.loan_number));
        Ok(loans)
    }

    fn apply_payment(&self, loan_number: &str, payment: Payment) -> StoreResult<Loan> {
        self.update_doc(LOANS, loan_number, |loan: &mut Loan| {
            loan.apply_payment(payment).map_err(|e| match e {
                LoanError::InsufficientBalance { remaining, .. } => StoreError::InsufficientBalance {
                    loan_number: loan_number.to_string(),
                    remaining,
                },
                LoanError::Settled => StoreError::LoanSettled(loan_number.to_string()),
            })?;
            Ok(loan.clone())
        })
    }
}
