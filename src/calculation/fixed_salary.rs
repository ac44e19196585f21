//! Fixed monthly salary.
//!
//! The monthly base is paid in full, less a flat deduction for each business
//! day in the period without valid attendance. The deduction never exceeds
//! the base.

use rust_decimal::Decimal;

use super::{CalculationInput, PayFigures, SalaryCalculator, assemble, contract_rate, start_trace};
use crate::attendance::summarize_absences;
use crate::error::EngineResult;
use crate::models::{CalculationDetails, CalculationResult, ContractKind};

/// Calculator for [`ContractKind::Fixed`] contracts.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{CalculationInput, FixedSalaryCalculator, SalaryCalculator};
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{Contract, Employee, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Awa".to_string(),
///     contract: Contract::Fixed { monthly_base: Decimal::new(850000, 0) },
///     active: true,
/// };
/// // A period made only of a weekend has no business days to be absent from.
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
/// ).unwrap();
/// let config = PayrollConfig::default();
/// let input = CalculationInput { employee: &employee, period, records: &[], config: &config };
///
/// let result = FixedSalaryCalculator.calculate(&input).unwrap();
/// assert_eq!(result.net_pay, Decimal::new(850000, 0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSalaryCalculator;

impl SalaryCalculator for FixedSalaryCalculator {
    fn contract_kind(&self) -> ContractKind {
        ContractKind::Fixed
    }

    fn calculate(&self, input: &CalculationInput<'_>) -> EngineResult<CalculationResult> {
        let monthly_base = contract_rate(input, ContractKind::Fixed)?;
        let rules = &input.config.rules;
        let (profile, mut trace) = start_trace(input);

        let absences = summarize_absences(
            input.records,
            &input.period,
            &input.config.policy.calendar,
        );
        trace.record(
            "absence_resolution",
            "Absence Resolution",
            serde_json::json!({
                "period_start": input.period.start_date.to_string(),
                "period_end": input.period.end_date.to_string()
            }),
            serde_json::json!({
                "business_days": absences.total_business_days,
                "present_days": absences.present_days,
                "absent_days": absences.absent_days
            }),
            format!(
                "{} of {} business days without valid attendance",
                absences.absent_days, absences.total_business_days
            ),
        );

        let per_day = rules.deductions.flat_absence_deduction;
        let absence_deduction = (Decimal::from(absences.absent_days) * per_day).min(monthly_base);
        trace.record(
            "fixed_salary",
            "Fixed Salary",
            serde_json::json!({
                "monthly_base": monthly_base.to_string(),
                "absent_days": absences.absent_days,
                "deduction_per_day": per_day.to_string()
            }),
            serde_json::json!({
                "gross_pay": monthly_base.to_string(),
                "absence_deduction": absence_deduction.to_string()
            }),
            format!(
                "Base {} less {} absent days x {} (capped at base) = {} deducted",
                monthly_base, absences.absent_days, per_day, absence_deduction
            ),
        );

        let hourly_rate = (monthly_base / rules.hours.standard_monthly_hours).round_dp(2);

        let figures = PayFigures {
            gross: monthly_base,
            raw_deductions: absence_deduction,
            hours_worked: profile.total_hours().round_dp(2),
            days_worked: None,
            hourly_rate_used: Some(hourly_rate),
            details: CalculationDetails {
                present_days: absences.present_days,
                absent_days: absences.absent_days,
                business_days: absences.total_business_days,
                unresolved_days: profile.unresolved,
                ..CalculationDetails::default()
            },
        };
        Ok(assemble(input, ContractKind::Fixed, figures, trace))
    }
}
