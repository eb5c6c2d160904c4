//! Storage errors

use thiserror::Error;

use crate::core::models::Money;

/// Errors returned by repository implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document under this key
    #[error("{collection} '{key}' not found")]
    NotFound {
        /// Collection name
        collection: &'static str,
        /// Document key
        key: String,
    },

    /// Unique key already taken
    #[error("{collection} '{key}' already exists")]
    Duplicate {
        /// Collection name
        collection: &'static str,
        /// Document key
        key: String,
    },

    /// Conditional decrement refused: the balance does not cover the payment
    #[error("loan {loan_number} has only {remaining} remaining")]
    InsufficientBalance {
        /// Loan number
        loan_number: String,
        /// Balance still owed
        remaining: Money,
    },

    /// Loan already settled
    #[error("loan {0} is already settled")]
    LoanSettled(String),

    /// A change was refused because of the document's current state
    #[error("{0}")]
    Rejected(String),

    /// Filesystem failure
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be (de)serialized
    #[error("corrupt document: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    /// Shorthand for [`StoreError::NotFound`]
    pub fn not_found(collection: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            collection,
            key: key.to_string(),
        }
    }

    /// Shorthand for [`StoreError::Duplicate`]
    pub fn duplicate(collection: &'static str, key: impl ToString) -> Self {
        Self::Duplicate {
            collection,
            key: key.to_string(),
        }
    }
}

/// Result alias for repository calls
pub type StoreResult<T> = Result<T, StoreError>;
