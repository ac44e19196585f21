//! Storage seams for the payroll engine.
//!
//! The engine never talks to a database directly. Each component depends on
//! the narrow trait it needs; [`MemoryStore`] implements all of them.
//!
//! Uniqueness is part of the contract: [`AttendanceStore::insert_attendance`]
//! rejects a second record for the same (employee, day) and
//! [`PayslipStore::insert_payslip`] rejects a second payslip for the same
//! (cycle, employee). Components check first, but the store's rejection is
//! what guarantees the invariant under concurrent callers. The same holds for
//! [`AttendanceStore::record_departure`], which sets a departure at most once.
//!
//! Cycle, payslip and payment records are only reachable through
//! [`UnitOfWork::atomically`], which runs a closure as one serialized unit
//! and discards its writes when it returns an error.

mod memory;

pub use memory::MemoryStore;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, Employee, PayCycle, PayPeriod, Payment, Payslip};

/// Read access to employees.
pub trait EmployeeStore: Send + Sync {
    /// Looks up an employee by id.
    fn employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    /// Lists employees flagged active, ordered by id.
    fn active_employees(&self) -> EngineResult<Vec<Employee>>;
}

/// Attendance records keyed by (employee, day).
pub trait AttendanceStore: Send + Sync {
    /// Looks up the record of an employee for a day.
    fn find_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>>;

    /// Inserts a record. Fails with `ConflictError` when the key is taken.
    fn insert_attendance(&self, record: AttendanceRecord) -> EngineResult<()>;

    /// Replaces an existing record. Fails with `NotFound` when absent.
    fn update_attendance(&self, record: AttendanceRecord) -> EngineResult<()>;

    /// Replaces an existing record only while the stored one has no
    /// departure, checking and writing as one step.
    ///
    /// Returns false and leaves the stored record untouched when a departure
    /// is already set. Fails with `NotFound` when absent.
    fn record_departure(&self, record: AttendanceRecord) -> EngineResult<bool>;

    /// Deletes a record, returning whether one existed.
    fn delete_attendance(&self, employee_id: &str, date: NaiveDate) -> EngineResult<bool>;

    /// Lists an employee's records within the period, ordered by date.
    fn attendance_in_period(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// Pay cycles.
pub trait CycleStore {
    /// Looks up a cycle.
    fn cycle(&self, id: Uuid) -> EngineResult<Option<PayCycle>>;

    /// Inserts or replaces a cycle.
    fn save_cycle(&mut self, cycle: PayCycle) -> EngineResult<()>;
}

/// Payslips.
pub trait PayslipStore {
    /// Looks up a payslip.
    fn payslip(&self, id: Uuid) -> EngineResult<Option<Payslip>>;

    /// Looks up the payslip of an employee within a cycle.
    fn payslip_for(&self, cycle_id: Uuid, employee_id: &str) -> EngineResult<Option<Payslip>>;

    /// Lists the payslips of a cycle, ordered by employee id.
    fn payslips_in_cycle(&self, cycle_id: Uuid) -> EngineResult<Vec<Payslip>>;

    /// Inserts a payslip. Fails with `StateError` when the (cycle, employee)
    /// pair already has one.
    fn insert_payslip(&mut self, payslip: Payslip) -> EngineResult<()>;

    /// Replaces an existing payslip. Fails with `NotFound` when absent.
    fn update_payslip(&mut self, payslip: Payslip) -> EngineResult<()>;
}

/// Payments.
pub trait PaymentStore {
    /// Looks up a payment.
    fn payment(&self, id: Uuid) -> EngineResult<Option<Payment>>;

    /// Lists the payments of a payslip in the order they were recorded.
    fn payments_for(&self, payslip_id: Uuid) -> EngineResult<Vec<Payment>>;

    /// Inserts a payment. Fails with `ValidationError` when the receipt
    /// number is already used.
    fn insert_payment(&mut self, payment: Payment) -> EngineResult<()>;

    /// Replaces an existing payment. Fails with `NotFound` when absent.
    fn update_payment(&mut self, payment: Payment) -> EngineResult<()>;

    /// Deletes a payment, returning whether one existed.
    fn delete_payment(&mut self, id: Uuid) -> EngineResult<bool>;

    /// Issues the next receipt sequence value. Values are never reused.
    fn next_receipt_sequence(&mut self) -> EngineResult<u64>;
}

/// The view of cycles, payslips and payments handed to a unit of work.
pub trait PayrollTx: CycleStore + PayslipStore + PaymentStore {}

impl<T: CycleStore + PayslipStore + PaymentStore> PayrollTx for T {}

/// Runs multi-record updates atomically.
pub trait UnitOfWork: Send + Sync {
    /// Runs `work` with exclusive access to payroll records.
    ///
    /// Concurrent units are serialized. When `work` returns an error none of
    /// its writes are kept.
    fn atomically<T, F>(&self, work: F) -> EngineResult<T>
    where
        F: FnOnce(&mut dyn PayrollTx) -> EngineResult<T>;
}

/// Everything the engine needs from its storage collaborator.
pub trait PayrollStore: EmployeeStore + AttendanceStore + UnitOfWork {}

impl<T: EmployeeStore + AttendanceStore + UnitOfWork> PayrollStore for T {}
