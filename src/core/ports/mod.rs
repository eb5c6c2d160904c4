//! Port traits (interfaces) for the document store
//!
//! These traits define the boundary between the core business logic and
//! persistence. Implementations live in the `adapters` module.
//!
//! The store contract the core relies on:
//!
//! - **Unique inserts**: creating a document whose key exists fails with
//!   [`StoreError::Duplicate`]
//! - **Atomic conditional updates**: a loan payment is a single
//!   compare-and-decrement ([`LoanRepository::apply_payment`])
//! - **Simple queries**: get by key, list a collection, filter by member

mod attendance_repo;
mod cash_repo;
mod error;
mod funeral_repo;
mod loan_repo;
mod member_repo;
mod officer_repo;
mod settings_repo;

pub use attendance_repo::AttendanceRepository;
pub use cash_repo::CashBookRepository;
pub use error::{StoreError, StoreResult};
pub use funeral_repo::FuneralRepository;
pub use loan_repo::LoanRepository;
pub use member_repo::MemberRepository;
pub use officer_repo::OfficerRepository;
pub use settings_repo::SettingsRepository;
