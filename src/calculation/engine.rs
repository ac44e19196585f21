//! Store-backed calculation entry point.

use std::sync::Arc;

use chrono::NaiveDate;

use super::{CalculationInput, calculate_pay};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationResult, Employee, PayPeriod};
use crate::store::{AttendanceStore, EmployeeStore};

/// Loads employees and attendance from the store and runs the matching
/// calculator. Calculation never writes.
#[derive(Debug)]
pub struct PayrollCalculator<S> {
    store: Arc<S>,
    config: PayrollConfig,
}

impl<S> Clone for PayrollCalculator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: EmployeeStore + AttendanceStore> PayrollCalculator<S> {
    /// Creates a calculator over a store.
    pub fn new(store: Arc<S>, config: &PayrollConfig) -> Self {
        Self {
            store,
            config: config.clone(),
        }
    }

    /// The configuration calculations run with.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Calculates pay for an employee between two dates (inclusive).
    ///
    /// # Errors
    ///
    /// * `ValidationError` when `start > end`
    /// * `NotFound` when the employee does not exist
    /// * `ConfigurationError` when the contract rate is not positive
    pub fn calculate(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<CalculationResult> {
        let period = PayPeriod::new(start, end)?;
        let employee = self
            .store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::not_found("employee", employee_id))?;
        self.calculate_for(&employee, period)
    }

    /// Calculates pay for an already loaded employee.
    pub fn calculate_for(
        &self,
        employee: &Employee,
        period: PayPeriod,
    ) -> EngineResult<CalculationResult> {
        let records = self.store.attendance_in_period(&employee.id, &period)?;
        calculate_pay(&CalculationInput {
            employee,
            period,
            records: &records,
            config: &self.config,
        })
    }
}
