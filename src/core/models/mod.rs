//! Domain models for idir
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Member`] - A registered participant of the society, with dependents
//! - [`Loan`] - A loan issued against a member and two guarantors
//! - [`AttendanceRecord`] - Absentees of one meeting or common-work day
//! - [`FuneralEvent`] - Duty assignments and absences for one funeral
//! - [`Setting`] - A named numeric value with change history
//! - [`Officer`] - An elevated-privilege account
//! - [`CashEntry`] - One line of the cash book
//! - [`Money`] - Non-negative amount in cents

mod attendance;
mod cash;
mod funeral;
mod loan;
mod member;
mod money;
mod officer;
mod role;
mod setting;

pub use attendance::{AttendanceKind, AttendanceRecord};
pub use cash::{CashDirection, CashEntry};
pub use funeral::{Deceased, Duty, DutyMember, FuneralEvent, RotationState};
pub use loan::{Loan, LoanError, LoanStatus, Payment};
pub use member::{Dependent, Member, MemberStatus};
pub use money::{Money, MoneyError, cents_to_decimal};
pub use officer::Officer;
pub use role::Role;
pub use setting::{Setting, SettingChange, keys as setting_keys};
