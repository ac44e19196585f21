//! Salary calculation for the Payroll Engine.
//!
//! One calculator exists per contract kind. All of them start from the same
//! worked-time profile and finish through [`assemble`], which applies the
//! rounding rule shared by every contract: net pay is rounded down to a whole
//! currency unit and the deductions absorb the remainder, so that
//! `gross_pay == deductions + net_pay` always holds exactly. Hourly gross is
//! already a whole unit, so hourly pay carries no deductions.

mod engine;
mod fixed_salary;
mod hourly;
mod per_diem;
mod worked_time;

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AuditTrace, CalculationDetails, CalculationResult, ContractKind, Employee,
    PayPeriod,
};

pub use engine::PayrollCalculator;
pub use fixed_salary::FixedSalaryCalculator;
pub use hourly::HourlyCalculator;
pub use per_diem::PerDiemCalculator;
pub use worked_time::{WorkedDay, WorkedTimeProfile, build_worked_time, minutes_to_hours};

/// Everything a calculator needs for one employee and period.
#[derive(Debug, Clone, Copy)]
pub struct CalculationInput<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The period being calculated.
    pub period: PayPeriod,
    /// The employee's attendance records for the period.
    pub records: &'a [AttendanceRecord],
    /// Active payroll configuration.
    pub config: &'a PayrollConfig,
}

/// A salary calculation strategy for one contract kind.
pub trait SalaryCalculator: Send + Sync {
    /// The contract kind this calculator handles.
    fn contract_kind(&self) -> ContractKind;

    /// Computes gross, deductions and net pay for the input.
    ///
    /// Fails with `ConfigurationError` when the employee's contract is not of
    /// [`SalaryCalculator::contract_kind`] or its rate is not positive.
    fn calculate(&self, input: &CalculationInput<'_>) -> EngineResult<CalculationResult>;
}

/// Returns the calculator for a contract kind.
pub fn calculator_for(kind: ContractKind) -> &'static dyn SalaryCalculator {
    match kind {
        ContractKind::Fixed => &FixedSalaryCalculator,
        ContractKind::PerDiem => &PerDiemCalculator,
        ContractKind::Hourly => &HourlyCalculator,
    }
}

/// Calculates pay with the calculator matching the employee's contract.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{CalculationInput, calculate_pay};
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{Contract, Employee, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Awa".to_string(),
///     contract: Contract::Hourly { hourly_rate: Decimal::new(15000, 0) },
///     active: true,
/// };
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// ).unwrap();
/// let config = PayrollConfig::default();
///
/// let input = CalculationInput { employee: &employee, period, records: &[], config: &config };
/// let result = calculate_pay(&input).unwrap();
/// assert_eq!(result.net_pay, Decimal::ZERO);
/// ```
pub fn calculate_pay(input: &CalculationInput<'_>) -> EngineResult<CalculationResult> {
    let started = Instant::now();
    let calculator = calculator_for(input.employee.contract_kind());
    let mut result = calculator.calculate(input)?;
    result.audit_trace.duration_us = started.elapsed().as_micros() as u64;

    debug!(
        employee_id = %result.employee_id,
        contract_kind = %result.contract_kind,
        gross = %result.gross_pay,
        deductions = %result.deductions,
        net = %result.net_pay,
        "Calculated pay"
    );
    Ok(result)
}

/// Rounds net pay down to a whole unit, never below zero.
///
/// Returns `(deductions, net_pay)` with `deductions == gross - net_pay`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::settle;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let gross = Decimal::from_str("514062.5").unwrap();
/// let raw = Decimal::from_str("25703.125").unwrap();
/// let (deductions, net) = settle(gross, raw);
/// assert_eq!(net, Decimal::from(488359));
/// assert_eq!(deductions + net, gross);
/// ```
pub fn settle(gross: Decimal, raw_deductions: Decimal) -> (Decimal, Decimal) {
    let net = (gross - raw_deductions).max(Decimal::ZERO).floor();
    (gross - net, net)
}

/// Figures produced by a calculator before settlement.
#[derive(Debug, Clone)]
pub(crate) struct PayFigures {
    pub gross: Decimal,
    pub raw_deductions: Decimal,
    pub hours_worked: Decimal,
    pub days_worked: Option<u32>,
    pub hourly_rate_used: Option<Decimal>,
    pub details: CalculationDetails,
}

/// Settles the figures and builds the result, recording the final step.
pub(crate) fn assemble(
    input: &CalculationInput<'_>,
    kind: ContractKind,
    figures: PayFigures,
    mut trace: AuditTrace,
) -> CalculationResult {
    let (deductions, net_pay) = settle(figures.gross, figures.raw_deductions);

    trace.record(
        "net_pay",
        "Net Pay Settlement",
        serde_json::json!({
            "gross_pay": figures.gross.to_string(),
            "deductions_before_rounding": figures.raw_deductions.to_string()
        }),
        serde_json::json!({
            "deductions": deductions.to_string(),
            "net_pay": net_pay.to_string()
        }),
        format!(
            "Net pay {} - {} rounded down to {}",
            figures.gross, figures.raw_deductions, net_pay
        ),
    );

    CalculationResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        employee_id: input.employee.id.clone(),
        contract_kind: kind,
        period: input.period,
        gross_pay: figures.gross,
        deductions,
        net_pay,
        hours_worked: figures.hours_worked,
        days_worked: figures.days_worked,
        hourly_rate_used: figures.hourly_rate_used,
        details: figures.details,
        audit_trace: trace,
    }
}

/// Checks the employee holds the expected contract and returns its rate.
pub(crate) fn contract_rate(
    input: &CalculationInput<'_>,
    expected: ContractKind,
) -> EngineResult<Decimal> {
    let employee = input.employee;
    if employee.contract_kind() != expected {
        return Err(EngineError::ConfigurationError {
            employee_id: employee.id.clone(),
            field: "contract_kind".to_string(),
            message: format!(
                "{} calculator cannot pay a {} contract",
                expected,
                employee.contract_kind()
            ),
        });
    }
    employee.require_rate()
}

/// Runs the worked-time profile into a fresh trace.
pub(crate) fn start_trace(input: &CalculationInput<'_>) -> (WorkedTimeProfile, AuditTrace) {
    let mut trace = AuditTrace::default();
    let (profile, warnings, step) = build_worked_time(input.records, &input.period, 1);
    trace.steps.push(step);
    trace.warnings.extend(warnings);
    (profile, trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contract;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_settle_floors_net_and_keeps_sum() {
        let (deductions, net) = settle(dec("1000.75"), dec("0"));
        assert_eq!(net, dec("1000"));
        assert_eq!(deductions, dec("0.75"));
    }

    #[test]
    fn test_settle_never_goes_negative() {
        let (deductions, net) = settle(dec("100"), dec("250"));
        assert_eq!(net, Decimal::ZERO);
        assert_eq!(deductions, dec("100"));
    }

    #[test]
    fn test_calculator_for_each_kind() {
        for kind in [ContractKind::Fixed, ContractKind::PerDiem, ContractKind::Hourly] {
            assert_eq!(calculator_for(kind).contract_kind(), kind);
        }
    }

    #[test]
    fn test_mismatched_calculator_is_rejected() {
        let employee = Employee {
            id: "emp_001".to_string(),
            name: "Awa".to_string(),
            contract: Contract::Hourly {
                hourly_rate: dec("15000"),
            },
            active: true,
        };
        let config = PayrollConfig::default();
        let period = PayPeriod::new(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .unwrap();
        let input = CalculationInput {
            employee: &employee,
            period,
            records: &[],
            config: &config,
        };

        let err = FixedSalaryCalculator.calculate(&input).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ConfigurationError { ref field, .. } if field == "contract_kind"
        ));
    }

    #[test]
    fn test_calculate_pay_records_duration() {
        let employee = Employee {
            id: "emp_001".to_string(),
            name: "Awa".to_string(),
            contract: Contract::Fixed {
                monthly_base: dec("850000"),
            },
            active: true,
        };
        let config = PayrollConfig::default();
        let period = PayPeriod::new(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .unwrap();
        let input = CalculationInput {
            employee: &employee,
            period,
            records: &[],
            config: &config,
        };

        let result = calculate_pay(&input).unwrap();
        assert_eq!(result.contract_kind, ContractKind::Fixed);
        assert_eq!(result.gross_pay, result.deductions + result.net_pay);
        assert_eq!(result.audit_trace.steps.last().unwrap().rule_id, "net_pay");
    }
}
