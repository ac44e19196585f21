//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load payroll configuration from
//! YAML files: working-hour standards, overtime, flat deductions, the
//! business-day calendar and the payment acceptance policy.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Receipts prefixed with {}", config.config().policy.receipt_prefix);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BusinessCalendar, CalendarPolicy, DeductionConfig, HoursConfig, OvertimeConfig, PaymentWindow,
    PayrollConfig, PayrollRules,
};
