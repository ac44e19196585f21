//! In-memory implementation of the storage traits.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

use chrono::NaiveDate;
use uuid::Uuid;

use super::{
    AttendanceStore, CycleStore, EmployeeStore, PaymentStore, PayrollTx, PayslipStore, UnitOfWork,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Employee, EmployeeRecord, PayCycle, PayPeriod, Payment, Payslip,
};

/// Thread-safe in-memory store.
///
/// Attendance writes are guarded per call; payroll records live behind a
/// single mutex held for the whole of each unit of work, which is rolled back
/// to a snapshot when the unit fails.
///
/// The snapshot copies every cycle, payslip and payment, so each unit of work
/// costs time proportional to the whole payroll history. The store is meant
/// for tests, benchmarks and small embedders; a durable backend should
/// implement [`UnitOfWork`] on top of real transactions.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Contract, Employee};
/// use payroll_engine::store::{EmployeeStore, MemoryStore};
/// use rust_decimal::Decimal;
///
/// let store = MemoryStore::new();
/// store.add_employee(Employee {
///     id: "emp_001".to_string(),
///     name: "Awa".to_string(),
///     contract: Contract::Hourly { hourly_rate: Decimal::new(15000, 0) },
///     active: true,
/// }).unwrap();
///
/// assert!(store.employee("emp_001").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    employees: RwLock<BTreeMap<String, Employee>>,
    attendance: RwLock<BTreeMap<(String, NaiveDate), AttendanceRecord>>,
    payroll: Mutex<PayrollTables>,
}

#[derive(Debug, Clone, Default)]
struct PayrollTables {
    cycles: HashMap<Uuid, PayCycle>,
    payslips: HashMap<Uuid, Payslip>,
    payments: Vec<Payment>,
    receipt_sequence: u64,
}

fn poisoned<T>(_: T) -> EngineError {
    EngineError::StorageError {
        message: "in-memory store lock poisoned".to_string(),
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an employee.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<()> {
        let mut employees = self.employees.write().map_err(poisoned)?;
        employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    /// Inserts an employee from its flat row shape, validating the contract.
    pub fn add_employee_record(&self, record: EmployeeRecord) -> EngineResult<()> {
        self.add_employee(Employee::try_from(record)?)
    }
}

impl EmployeeStore for MemoryStore {
    fn employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.read().map_err(poisoned)?.get(id).cloned())
    }

    fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.values().filter(|e| e.active).cloned().collect())
    }
}

impl AttendanceStore for MemoryStore {
    fn find_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        let records = self.attendance.read().map_err(poisoned)?;
        Ok(records.get(&(employee_id.to_string(), date)).cloned())
    }

    fn insert_attendance(&self, record: AttendanceRecord) -> EngineResult<()> {
        let mut records = self.attendance.write().map_err(poisoned)?;
        let key = (record.employee_id.clone(), record.date);
        if records.contains_key(&key) {
            return Err(EngineError::ConflictError {
                employee_id: record.employee_id,
                date: record.date,
            });
        }
        records.insert(key, record);
        Ok(())
    }

    fn update_attendance(&self, record: AttendanceRecord) -> EngineResult<()> {
        let mut records = self.attendance.write().map_err(poisoned)?;
        let key = (record.employee_id.clone(), record.date);
        match records.get_mut(&key) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(EngineError::not_found(
                "attendance",
                format!("{}@{}", key.0, key.1),
            )),
        }
    }

    fn record_departure(&self, record: AttendanceRecord) -> EngineResult<bool> {
        let mut records = self.attendance.write().map_err(poisoned)?;
        let key = (record.employee_id.clone(), record.date);
        match records.get_mut(&key) {
            Some(slot) if slot.departure.is_some() => Ok(false),
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Err(EngineError::not_found(
                "attendance",
                format!("{}@{}", key.0, key.1),
            )),
        }
    }

    fn delete_attendance(&self, employee_id: &str, date: NaiveDate) -> EngineResult<bool> {
        let mut records = self.attendance.write().map_err(poisoned)?;
        Ok(records.remove(&(employee_id.to_string(), date)).is_some())
    }

    fn attendance_in_period(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let records = self.attendance.read().map_err(poisoned)?;
        let from = (employee_id.to_string(), period.start_date);
        let to = (employee_id.to_string(), period.end_date);
        Ok(records.range(from..=to).map(|(_, r)| r.clone()).collect())
    }
}

impl CycleStore for PayrollTables {
    fn cycle(&self, id: Uuid) -> EngineResult<Option<PayCycle>> {
        Ok(self.cycles.get(&id).cloned())
    }

    fn save_cycle(&mut self, cycle: PayCycle) -> EngineResult<()> {
        self.cycles.insert(cycle.id, cycle);
        Ok(())
    }
}

impl PayslipStore for PayrollTables {
    fn payslip(&self, id: Uuid) -> EngineResult<Option<Payslip>> {
        Ok(self.payslips.get(&id).cloned())
    }

    fn payslip_for(&self, cycle_id: Uuid, employee_id: &str) -> EngineResult<Option<Payslip>> {
        Ok(self
            .payslips
            .values()
            .find(|p| p.cycle_id == cycle_id && p.employee_id == employee_id)
            .cloned())
    }

    fn payslips_in_cycle(&self, cycle_id: Uuid) -> EngineResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .payslips
            .values()
            .filter(|p| p.cycle_id == cycle_id)
            .cloned()
            .collect();
        payslips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(payslips)
    }

    fn insert_payslip(&mut self, payslip: Payslip) -> EngineResult<()> {
        if self.payslip_for(payslip.cycle_id, &payslip.employee_id)?.is_some() {
            return Err(EngineError::state(
                "payslip",
                format!(
                    "employee '{}' already has a payslip in cycle {}",
                    payslip.employee_id, payslip.cycle_id
                ),
            ));
        }
        self.payslips.insert(payslip.id, payslip);
        Ok(())
    }

    fn update_payslip(&mut self, payslip: Payslip) -> EngineResult<()> {
        match self.payslips.get_mut(&payslip.id) {
            Some(slot) => {
                *slot = payslip;
                Ok(())
            }
            None => Err(EngineError::not_found("payslip", payslip.id)),
        }
    }
}

impl PaymentStore for PayrollTables {
    fn payment(&self, id: Uuid) -> EngineResult<Option<Payment>> {
        Ok(self.payments.iter().find(|p| p.id == id).cloned())
    }

    fn payments_for(&self, payslip_id: Uuid) -> EngineResult<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|p| p.payslip_id == payslip_id)
            .cloned()
            .collect())
    }

    fn insert_payment(&mut self, payment: Payment) -> EngineResult<()> {
        if self
            .payments
            .iter()
            .any(|p| p.receipt_number == payment.receipt_number)
        {
            return Err(EngineError::validation(
                "receipt_number",
                &payment.receipt_number,
                "receipt number already issued",
            ));
        }
        self.payments.push(payment);
        Ok(())
    }

    fn update_payment(&mut self, payment: Payment) -> EngineResult<()> {
        match self.payments.iter_mut().find(|p| p.id == payment.id) {
            Some(slot) => {
                *slot = payment;
                Ok(())
            }
            None => Err(EngineError::not_found("payment", payment.id)),
        }
    }

    fn delete_payment(&mut self, id: Uuid) -> EngineResult<bool> {
        let before = self.payments.len();
        self.payments.retain(|p| p.id != id);
        Ok(self.payments.len() != before)
    }

    fn next_receipt_sequence(&mut self) -> EngineResult<u64> {
        self.receipt_sequence += 1;
        Ok(self.receipt_sequence)
    }
}

impl UnitOfWork for MemoryStore {
    fn atomically<T, F>(&self, work: F) -> EngineResult<T>
    where
        F: FnOnce(&mut dyn PayrollTx) -> EngineResult<T>,
    {
        let mut tables = self.payroll.lock().map_err(poisoned)?;
        let snapshot = tables.clone();
        let result = work(&mut *tables);
        if result.is_err() {
            *tables = snapshot;
        }
        result
    }
}
