//! Hourly pay.

use rust_decimal::Decimal;

use super::{CalculationInput, PayFigures, SalaryCalculator, assemble, contract_rate, start_trace};
use crate::error::EngineResult;
use crate::models::{CalculationDetails, CalculationResult, ContractKind};

/// Calculator for [`ContractKind::Hourly`] contracts: every worked minute is
/// paid at the hourly rate, gross is rounded down to a whole unit and nothing
/// is deducted, so net pay equals gross pay.
#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyCalculator;

impl SalaryCalculator for HourlyCalculator {
    fn contract_kind(&self) -> ContractKind {
        ContractKind::Hourly
    }

    fn calculate(&self, input: &CalculationInput<'_>) -> EngineResult<CalculationResult> {
        let hourly_rate = contract_rate(input, ContractKind::Hourly)?;
        let (profile, mut trace) = start_trace(input);

        let hours = profile.total_hours();
        let gross =
            (Decimal::from(profile.total_minutes) * hourly_rate / Decimal::from(60)).floor();
        trace.record(
            "hourly_pay",
            "Hourly Pay",
            serde_json::json!({
                "total_minutes": profile.total_minutes,
                "hourly_rate": hourly_rate.to_string()
            }),
            serde_json::json!({ "gross_pay": gross.to_string() }),
            format!("{} hours x {} = {}", hours.round_dp(2), hourly_rate, gross),
        );

        let figures = PayFigures {
            gross,
            raw_deductions: Decimal::ZERO,
            hours_worked: hours.round_dp(2),
            days_worked: None,
            hourly_rate_used: Some(hourly_rate),
            details: CalculationDetails {
                present_days: profile.days_worked(),
                unresolved_days: profile.unresolved,
                ..CalculationDetails::default()
            },
        };
        Ok(assemble(input, ContractKind::Hourly, figures, trace))
    }
}
