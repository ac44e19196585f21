//! Payslip lifecycle: applying calculations and settling payments.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calculation::PayrollCalculator;
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalculationResult, ContractKind, CycleTotals, PayCycle, Payslip, PayslipStatus,
};
use crate::store::{CycleStore, PaymentStore, PayrollStore, PayrollTx, PayslipStore};

/// Derives a payslip's status from what has been paid against its net pay.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ContractKind, Payslip, PayslipStatus};
/// use payroll_engine::payroll::derive_status;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let mut payslip = Payslip::new(Uuid::new_v4(), "emp_001", ContractKind::Fixed);
/// payslip.net_pay = Decimal::new(1000, 0);
/// payslip.amount_paid = Decimal::new(400, 0);
/// assert_eq!(derive_status(&payslip), PayslipStatus::Partial);
/// ```
pub fn derive_status(payslip: &Payslip) -> PayslipStatus {
    PayslipStatus::derive(payslip.amount_paid, payslip.net_pay)
}

/// Writes a calculation result onto a payslip of a Draft cycle.
///
/// # Errors
///
/// * `StateError` when the cycle is not Draft
/// * `ValidationError` when the result belongs to another employee or its
///   net pay would fall below what has already been paid
pub fn apply_calculation(
    cycle: &PayCycle,
    payslip: &mut Payslip,
    result: &CalculationResult,
) -> EngineResult<()> {
    cycle.ensure_draft("apply a calculation")?;

    if result.employee_id != payslip.employee_id {
        return Err(EngineError::validation(
            "employee_id",
            &result.employee_id,
            format!("calculation does not belong to payslip {}", payslip.id),
        ));
    }
    if result.net_pay < payslip.amount_paid {
        return Err(EngineError::validation(
            "net_pay",
            result.net_pay,
            format!(
                "would fall below the {} already paid on payslip {}",
                payslip.amount_paid, payslip.id
            ),
        ));
    }

    payslip.contract_kind = result.contract_kind;
    payslip.gross_pay = result.gross_pay;
    payslip.deductions = result.deductions;
    payslip.net_pay = result.net_pay;
    payslip.hours_worked = result.hours_worked;
    payslip.days_worked = result.days_worked;
    payslip.hourly_rate_used = result.hourly_rate_used;
    payslip.details = Some(result.details.clone());
    payslip.status = derive_status(payslip);
    payslip.updated_at = Utc::now();
    Ok(())
}

/// Recomputes `amount_paid` from the payslip's payments, re-derives its
/// status, stores it and refreshes the owning cycle's totals.
pub(crate) fn settle_payments(tx: &mut dyn PayrollTx, payslip: &mut Payslip) -> EngineResult<()> {
    let amount_paid: Decimal = tx.payments_for(payslip.id)?.iter().map(|p| p.amount).sum();
    if amount_paid > payslip.net_pay {
        return Err(EngineError::validation(
            "amount_paid",
            amount_paid,
            format!("exceeds net pay {} of payslip {}", payslip.net_pay, payslip.id),
        ));
    }
    payslip.amount_paid = amount_paid;
    payslip.status = derive_status(payslip);
    payslip.updated_at = Utc::now();
    tx.update_payslip(payslip.clone())?;

    let mut cycle = load_cycle(tx, payslip.cycle_id)?;
    refresh_totals(tx, &mut cycle)
}

/// Recomputes a cycle's cached totals from its payslips and stores it.
pub(crate) fn refresh_totals(tx: &mut dyn PayrollTx, cycle: &mut PayCycle) -> EngineResult<()> {
    let payslips = tx.payslips_in_cycle(cycle.id)?;
    cycle.totals = CycleTotals::from_payslips(&payslips);
    tx.save_cycle(cycle.clone())
}

pub(crate) fn load_cycle(tx: &dyn PayrollTx, cycle_id: Uuid) -> EngineResult<PayCycle> {
    tx.cycle(cycle_id)?
        .ok_or_else(|| EngineError::not_found("pay_cycle", cycle_id))
}

pub(crate) fn load_payslip(tx: &dyn PayrollTx, payslip_id: Uuid) -> EngineResult<Payslip> {
    tx.payslip(payslip_id)?
        .ok_or_else(|| EngineError::not_found("payslip", payslip_id))
}

/// Recalculates payslips from stored attendance.
#[derive(Debug)]
pub struct PayslipManager<S> {
    store: Arc<S>,
    calculator: PayrollCalculator<S>,
}

impl<S> Clone for PayslipManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calculator: self.calculator.clone(),
        }
    }
}

impl<S: PayrollStore> PayslipManager<S> {
    /// Creates a manager over a store.
    pub fn new(store: Arc<S>, config: &PayrollConfig) -> Self {
        let calculator = PayrollCalculator::new(Arc::clone(&store), config);
        Self { store, calculator }
    }

    /// The calculator used for recalculation.
    pub fn calculator(&self) -> &PayrollCalculator<S> {
        &self.calculator
    }

    /// Looks up a payslip.
    pub fn payslip(&self, payslip_id: Uuid) -> EngineResult<Payslip> {
        self.store.atomically(|tx| load_payslip(tx, payslip_id))
    }

    /// Re-runs the calculator for a payslip over its cycle's period and
    /// applies the result, refreshing the cycle totals.
    pub fn recalculate(&self, payslip_id: Uuid) -> EngineResult<Payslip> {
        let (employee_id, period) = self.store.atomically(|tx| {
            let payslip = load_payslip(tx, payslip_id)?;
            let cycle = load_cycle(tx, payslip.cycle_id)?;
            cycle.ensure_draft("recalculate a payslip")?;
            Ok((payslip.employee_id, cycle.period))
        })?;

        let result = self
            .calculator
            .calculate(&employee_id, period.start_date, period.end_date)?;

        let payslip = self.store.atomically(|tx| {
            let mut payslip = load_payslip(tx, payslip_id)?;
            let mut cycle = load_cycle(tx, payslip.cycle_id)?;
            apply_calculation(&cycle, &mut payslip, &result)?;
            tx.update_payslip(payslip.clone())?;
            refresh_totals(tx, &mut cycle)?;
            Ok(payslip)
        })?;

        info!(
            payslip_id = %payslip.id,
            employee_id = %payslip.employee_id,
            net = %payslip.net_pay,
            "Recalculated payslip"
        );
        Ok(payslip)
    }

    /// Calculates a per-diem employee's pay for a cycle, creating the
    /// payslip on first use.
    ///
    /// # Errors
    ///
    /// * `NotFound` for an unknown employee or cycle
    /// * `ConfigurationError` when the employee is not on a per-diem contract
    /// * `StateError` when the cycle is not Draft
    pub fn calculate_per_diem(&self, cycle_id: Uuid, employee_id: &str) -> EngineResult<Payslip> {
        let employee = self
            .store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::not_found("employee", employee_id))?;
        if employee.contract_kind() != ContractKind::PerDiem {
            return Err(EngineError::ConfigurationError {
                employee_id: employee.id.clone(),
                field: "contract_kind".to_string(),
                message: format!(
                    "expected {}, found {}",
                    ContractKind::PerDiem,
                    employee.contract_kind()
                ),
            });
        }

        let period = self.store.atomically(|tx| {
            let cycle = load_cycle(tx, cycle_id)?;
            cycle.ensure_draft("calculate per-diem pay")?;
            Ok(cycle.period)
        })?;

        let result = self.calculator.calculate_for(&employee, period)?;

        let (payslip, created) = self.store.atomically(|tx| {
            let mut cycle = load_cycle(tx, cycle_id)?;
            let existing = tx.payslip_for(cycle_id, employee_id)?;
            let created = existing.is_none();
            let mut payslip = existing
                .unwrap_or_else(|| Payslip::new(cycle_id, employee_id, ContractKind::PerDiem));

            apply_calculation(&cycle, &mut payslip, &result)?;
            if created {
                tx.insert_payslip(payslip.clone())?;
            } else {
                tx.update_payslip(payslip.clone())?;
            }
            refresh_totals(tx, &mut cycle)?;
            Ok((payslip, created))
        })?;

        info!(
            payslip_id = %payslip.id,
            cycle_id = %cycle_id,
            employee_id = %employee_id,
            created,
            net = %payslip.net_pay,
            "Calculated per-diem payslip"
        );
        Ok(payslip)
    }
}
