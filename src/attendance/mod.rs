//! Attendance ledger and absence resolution.
//!
//! The ledger turns clock events into one record per employee per day and
//! derives worked minutes; the resolver counts presence and absence over the
//! business days of a period.

mod absence;
mod ledger;

pub use absence::{AbsenceResolver, AbsenceSummary, summarize_absences};
pub use ledger::{AttendanceLedger, ClockOutcome, recompute_duration};
