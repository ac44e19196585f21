//! Pay cycles, payslips and payments.
//!
//! [`PayCycleManager`] opens cycles, generates their payslips and moves them
//! through Draft, Approved and Closed. [`PayslipManager`] keeps payslips in
//! step with stored attendance while their cycle is Draft, and
//! [`PaymentReconciler`] records payments against them.

mod cycle;
mod payslip;
mod reconciler;

pub use cycle::{PayCycleManager, initial_payslip};
pub use payslip::{PayslipManager, apply_calculation, derive_status};
pub use reconciler::PaymentReconciler;
