//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod calculation_result;
mod employee;
mod pay_cycle;
mod pay_period;
mod payment;
mod payslip;

pub use attendance::{AttendanceRecord, AttendanceStatus, MAX_DAILY_MINUTES};
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, CalculationDetails, CalculationResult,
    UNRESOLVED_DURATION,
};
pub use employee::{Contract, ContractKind, Employee, EmployeeRecord};
pub use pay_cycle::{CycleStatus, CycleTotals, CycleTransition, PayCycle};
pub use pay_period::PayPeriod;
pub use payment::{Payment, PaymentMethod, PaymentRequest, format_receipt_number};
pub use payslip::{Payslip, PayslipStatus};
