//! Calculation result models for the payroll engine.
//!
//! This module contains the [`CalculationResult`] type produced by every
//! salary calculator, the [`CalculationDetails`] breakdown stored on
//! payslips, and the audit types that record each calculation decision.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ContractKind, PayPeriod};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during attendance handling or calculation.
///
/// Warnings indicate conditions that don't prevent the operation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// Warning code for attendance whose duration could not be derived.
pub const UNRESOLVED_DURATION: &str = "UNRESOLVED_DURATION";

impl AuditWarning {
    /// Warning for a clock-in/clock-out pair that yields no usable duration.
    pub fn unresolved_duration(employee_id: &str, date: NaiveDate) -> Self {
        Self {
            code: UNRESOLVED_DURATION.to_string(),
            message: format!(
                "Worked duration for employee '{}' on {} could not be derived from its clock events",
                employee_id, date
            ),
            severity: "medium".to_string(),
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the existing ones.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }
}

/// Breakdown of the figures a calculation was based on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationDetails {
    /// Business days with valid attendance.
    pub present_days: u32,
    /// Business days without valid attendance.
    pub absent_days: u32,
    /// Business days in the period.
    pub business_days: u32,
    /// Hours beyond the daily overtime threshold.
    pub overtime_hours: Decimal,
    /// Amount paid for overtime.
    pub overtime_pay: Decimal,
    /// Percentage deduction rate applied, if any.
    pub deduction_rate: Option<Decimal>,
    /// Days whose attendance contributed nothing because the duration was unresolvable.
    pub unresolved_days: Vec<NaiveDate>,
}

/// The result of a salary calculation for one employee and period.
///
/// # Invariant
///
/// `gross_pay == deductions + net_pay`, and `net_pay` is a whole number of
/// currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The contract kind that selected the calculator.
    pub contract_kind: ContractKind,
    /// The period calculated.
    pub period: PayPeriod,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// Hours worked in the period.
    pub hours_worked: Decimal,
    /// Days worked; only set for per-diem contracts.
    pub days_worked: Option<u32>,
    /// Hourly rate used or reported.
    pub hourly_rate_used: Option<Decimal>,
    /// Figures the calculation was based on.
    pub details: CalculationDetails,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
