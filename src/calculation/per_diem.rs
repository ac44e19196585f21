//! Per-diem pay with daily overtime.

use rust_decimal::Decimal;

use super::{
    CalculationInput, PayFigures, SalaryCalculator, assemble, contract_rate, minutes_to_hours,
    start_trace,
};
use crate::error::EngineResult;
use crate::models::{CalculationDetails, CalculationResult, ContractKind};

/// Calculator for [`ContractKind::PerDiem`] contracts.
///
/// Each day with worked time is paid the daily rate. Time beyond the daily
/// overtime threshold is paid at the equivalent hourly rate (daily rate over
/// standard daily hours) times the overtime multiplier. A flat percentage of
/// gross pay is withheld.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerDiemCalculator;

impl SalaryCalculator for PerDiemCalculator {
    fn contract_kind(&self) -> ContractKind {
        ContractKind::PerDiem
    }

    fn calculate(&self, input: &CalculationInput<'_>) -> EngineResult<CalculationResult> {
        let daily_rate = contract_rate(input, ContractKind::PerDiem)?;
        let rules = &input.config.rules;
        let (profile, mut trace) = start_trace(input);

        let days_worked = profile.days_worked();
        let base_pay = Decimal::from(days_worked) * daily_rate;
        trace.record(
            "per_diem_days",
            "Per-Diem Days",
            serde_json::json!({
                "days_worked": days_worked,
                "daily_rate": daily_rate.to_string()
            }),
            serde_json::json!({ "base_pay": base_pay.to_string() }),
            format!("{} days x {} = {}", days_worked, daily_rate, base_pay),
        );

        let threshold_minutes = rules.overtime.daily_threshold_hours * Decimal::from(60);
        let overtime_minutes: Decimal = profile
            .days
            .iter()
            .map(|d| (Decimal::from(d.minutes) - threshold_minutes).max(Decimal::ZERO))
            .sum();
        let overtime_hours = overtime_minutes / Decimal::from(60);
        let equivalent_rate = input.config.equivalent_hourly_rate(daily_rate);
        let overtime_rate = equivalent_rate * rules.overtime.multiplier;
        let overtime_pay = overtime_hours * overtime_rate;
        trace.record(
            "daily_overtime",
            "Daily Overtime",
            serde_json::json!({
                "threshold_hours": rules.overtime.daily_threshold_hours.to_string(),
                "equivalent_hourly_rate": equivalent_rate.to_string(),
                "multiplier": rules.overtime.multiplier.to_string()
            }),
            serde_json::json!({
                "overtime_hours": overtime_hours.to_string(),
                "overtime_pay": overtime_pay.to_string()
            }),
            format!(
                "{} overtime hours x {} = {}",
                overtime_hours, overtime_rate, overtime_pay
            ),
        );

        let gross = base_pay + overtime_pay;
        let deduction_rate = rules.deductions.per_diem_rate;
        let withheld = gross * deduction_rate;
        trace.record(
            "per_diem_deduction",
            "Per-Diem Deduction",
            serde_json::json!({
                "gross_pay": gross.to_string(),
                "rate": deduction_rate.to_string()
            }),
            serde_json::json!({ "withheld": withheld.to_string() }),
            format!("{} x {} = {} withheld", gross, deduction_rate, withheld),
        );

        let figures = PayFigures {
            gross,
            raw_deductions: withheld,
            hours_worked: minutes_to_hours(profile.total_minutes).round_dp(2),
            days_worked: Some(days_worked),
            hourly_rate_used: Some(equivalent_rate),
            details: CalculationDetails {
                present_days: days_worked,
                overtime_hours,
                overtime_pay,
                deduction_rate: Some(deduction_rate),
                unresolved_days: profile.unresolved,
                ..CalculationDetails::default()
            },
        };
        Ok(assemble(input, ContractKind::PerDiem, figures, trace))
    }
}
