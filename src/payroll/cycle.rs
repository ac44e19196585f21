//! Pay-cycle operations: opening, payslip generation, recalculation and
//! status transitions.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use super::payslip::{apply_calculation, load_cycle, refresh_totals};
use crate::calculation::PayrollCalculator;
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Contract, Employee, PayCycle, PayPeriod, Payslip};
use crate::store::{CycleStore, PayrollStore, PayslipStore};

/// Builds the payslip an employee starts a cycle with.
///
/// Fixed contracts start at the full monthly base; hourly contracts start at
/// zero with the rate recorded; per-diem contracts start at zero with no
/// days worked.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Contract, Employee};
/// use payroll_engine::payroll::initial_payslip;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Awa".to_string(),
///     contract: Contract::Fixed { monthly_base: Decimal::new(850000, 0) },
///     active: true,
/// };
/// let payslip = initial_payslip(Uuid::new_v4(), &employee).unwrap();
/// assert_eq!(payslip.net_pay, Decimal::new(850000, 0));
/// ```
pub fn initial_payslip(cycle_id: Uuid, employee: &Employee) -> EngineResult<Payslip> {
    let rate = employee.require_rate()?;
    let mut payslip = Payslip::new(cycle_id, &employee.id, employee.contract_kind());
    match employee.contract {
        Contract::Fixed { .. } => {
            payslip.gross_pay = rate;
            payslip.net_pay = rate;
        }
        Contract::Hourly { .. } => payslip.hourly_rate_used = Some(rate),
        Contract::PerDiem { .. } => payslip.days_worked = Some(0),
    }
    Ok(payslip)
}

/// Manages pay cycles and the payslips generated for them.
#[derive(Debug)]
pub struct PayCycleManager<S> {
    store: Arc<S>,
    calculator: PayrollCalculator<S>,
}

impl<S> Clone for PayCycleManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calculator: self.calculator.clone(),
        }
    }
}

impl<S: PayrollStore> PayCycleManager<S> {
    /// Creates a manager over a store.
    pub fn new(store: Arc<S>, config: &PayrollConfig) -> Self {
        let calculator = PayrollCalculator::new(Arc::clone(&store), config);
        Self { store, calculator }
    }

    /// Opens a Draft cycle for a period.
    pub fn open_cycle(
        &self,
        label: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<PayCycle> {
        let cycle = PayCycle::open(label, PayPeriod::new(start, end)?);
        let saved = cycle.clone();
        self.store.atomically(|tx| tx.save_cycle(saved))?;
        info!(cycle_id = %cycle.id, label, %start, %end, "Opened pay cycle");
        Ok(cycle)
    }

    /// Looks up a cycle.
    pub fn cycle(&self, cycle_id: Uuid) -> EngineResult<PayCycle> {
        self.store.atomically(|tx| load_cycle(tx, cycle_id))
    }

    /// Payslips of a cycle, ordered by employee.
    pub fn payslips(&self, cycle_id: Uuid) -> EngineResult<Vec<Payslip>> {
        self.store.atomically(|tx| {
            load_cycle(tx, cycle_id)?;
            tx.payslips_in_cycle(cycle_id)
        })
    }

    /// Approves a Draft cycle.
    pub fn approve(&self, cycle_id: Uuid, actor: &str) -> EngineResult<PayCycle> {
        self.transition(cycle_id, actor, PayCycle::approve)
    }

    /// Closes an Approved cycle.
    pub fn close(&self, cycle_id: Uuid, actor: &str) -> EngineResult<PayCycle> {
        self.transition(cycle_id, actor, PayCycle::close)
    }

    fn transition(
        &self,
        cycle_id: Uuid,
        actor: &str,
        apply: fn(&mut PayCycle, &str) -> EngineResult<()>,
    ) -> EngineResult<PayCycle> {
        let cycle = self.store.atomically(|tx| {
            let mut cycle = load_cycle(tx, cycle_id)?;
            apply(&mut cycle, actor)?;
            tx.save_cycle(cycle.clone())?;
            Ok(cycle)
        })?;
        info!(cycle_id = %cycle.id, status = %cycle.status, actor, "Pay cycle transitioned");
        Ok(cycle)
    }

    /// Creates one payslip per active employee for a Draft cycle that has
    /// none yet.
    ///
    /// # Errors
    ///
    /// * `StateError` when the cycle is not Draft or already has payslips
    /// * `ConfigurationError` when an active employee's rate is not positive;
    ///   nothing is generated in that case
    pub fn generate_payslips(&self, cycle_id: Uuid) -> EngineResult<Vec<Payslip>> {
        let employees = self.store.active_employees()?;

        let payslips = self.store.atomically(|tx| {
            let mut cycle = load_cycle(tx, cycle_id)?;
            cycle.ensure_draft("generate payslips")?;
            if !tx.payslips_in_cycle(cycle_id)?.is_empty() {
                return Err(EngineError::state(
                    "pay_cycle",
                    format!("payslips already generated for cycle {}", cycle_id),
                ));
            }

            let payslips = employees
                .iter()
                .map(|employee| initial_payslip(cycle_id, employee))
                .collect::<EngineResult<Vec<_>>>()?;
            for payslip in &payslips {
                tx.insert_payslip(payslip.clone())?;
            }
            refresh_totals(tx, &mut cycle)?;
            Ok(payslips)
        })?;

        info!(cycle_id = %cycle_id, count = payslips.len(), "Generated payslips");
        Ok(payslips)
    }

    /// Recalculates every payslip of a Draft cycle from stored attendance.
    ///
    /// All payslips are updated together or not at all.
    pub fn recalculate_cycle(&self, cycle_id: Uuid) -> EngineResult<Vec<Payslip>> {
        let (period, employee_ids) = self.store.atomically(|tx| {
            let cycle = load_cycle(tx, cycle_id)?;
            cycle.ensure_draft("recalculate the cycle")?;
            let ids: Vec<String> = tx
                .payslips_in_cycle(cycle_id)?
                .into_iter()
                .map(|p| p.employee_id)
                .collect();
            Ok((cycle.period, ids))
        })?;

        let results = employee_ids
            .iter()
            .map(|id| self.calculator.calculate(id, period.start_date, period.end_date))
            .collect::<EngineResult<Vec<_>>>()?;

        let payslips = self.store.atomically(|tx| {
            let mut cycle = load_cycle(tx, cycle_id)?;
            let mut updated = Vec::with_capacity(results.len());
            for result in &results {
                let mut payslip = tx
                    .payslip_for(cycle_id, &result.employee_id)?
                    .ok_or_else(|| EngineError::not_found("payslip", &result.employee_id))?;
                apply_calculation(&cycle, &mut payslip, result)?;
                tx.update_payslip(payslip.clone())?;
                updated.push(payslip);
            }
            refresh_totals(tx, &mut cycle)?;
            Ok(updated)
        })?;

        info!(cycle_id = %cycle_id, count = payslips.len(), "Recalculated pay cycle");
        Ok(payslips)
    }
}
