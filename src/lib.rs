//! Payroll Engine
//!
//! This crate records daily attendance, computes salaries for fixed,
//! per-diem and hourly contracts, and tracks payslips and their payments
//! through pay cycles.
//!
//! Storage is reached through the traits in [`store`]; [`store::MemoryStore`]
//! implements all of them in memory.

#![warn(missing_docs)]

pub mod attendance;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod store;
