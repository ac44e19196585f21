//! End-to-end tests for the Payroll Engine.
//!
//! Every test drives the public API over a shared [`MemoryStore`]:
//! - Attendance capture (clock in/out, absences, conflicts)
//! - Fixed, per-diem and hourly pay for a March 2026 cycle
//! - Payslip generation and recalculation
//! - Payment reconciliation through the cycle lifecycle
//! - Error cases

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use payroll_engine::attendance::{AbsenceResolver, AttendanceLedger};
use payroll_engine::config::{ConfigLoader, PayrollConfig};
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    AttendanceStatus, ContractKind, CycleStatus, EmployeeRecord, PaymentMethod, PaymentRequest,
    Payslip, PayslipStatus,
};
use payroll_engine::payroll::{PayCycleManager, PaymentReconciler, PayslipManager};
use payroll_engine::store::MemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

struct Payroll {
    config: PayrollConfig,
    ledger: AttendanceLedger<MemoryStore>,
    cycles: PayCycleManager<MemoryStore>,
    payslips: PayslipManager<MemoryStore>,
    reconciler: PaymentReconciler<MemoryStore>,
    resolver: AbsenceResolver<MemoryStore>,
}

fn setup() -> Payroll {
    let config = ConfigLoader::load("./config/standard")
        .expect("Failed to load config")
        .into_config();
    let store = Arc::new(MemoryStore::new());

    for record in [
        employee_record("emp_001", "fixed", Some("850000"), None, None),
        employee_record("emp_002", "per_diem", None, Some("25000"), None),
        employee_record("emp_003", "hourly", None, None, Some("15000")),
    ] {
        store.add_employee_record(record).unwrap();
    }

    Payroll {
        ledger: AttendanceLedger::new(Arc::clone(&store), &config),
        cycles: PayCycleManager::new(Arc::clone(&store), &config),
        payslips: PayslipManager::new(Arc::clone(&store), &config),
        reconciler: PaymentReconciler::new(Arc::clone(&store), &config),
        resolver: AbsenceResolver::new(Arc::clone(&store), &config),
        config,
    }
}

fn employee_record(
    id: &str,
    kind: &str,
    monthly_base: Option<&str>,
    daily_rate: Option<&str>,
    hourly_rate: Option<&str>,
) -> EmployeeRecord {
    let json = serde_json::json!({
        "id": id,
        "name": id.to_uppercase(),
        "contract_kind": kind,
        "monthly_base": monthly_base,
        "daily_rate": daily_rate,
        "hourly_rate": hourly_rate,
        "active": true
    });
    serde_json::from_value(json).expect("Failed to build employee record")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn at(d: u32, hour: u32) -> NaiveDateTime {
    date(d).and_hms_opt(hour, 0, 0).unwrap()
}

/// Business days of March 2026 under the shipped calendar.
fn march_business_days(config: &PayrollConfig) -> Vec<u32> {
    (1..=31)
        .filter(|d| config.policy.calendar.is_business_day(date(*d)))
        .collect()
}

fn work(payroll: &Payroll, employee_id: &str, day: u32, from: u32, to: u32) {
    payroll.ledger.clock_in(employee_id, date(day), at(day, from)).unwrap();
    let outcome = payroll
        .ledger
        .clock_out(employee_id, date(day), at(day, to))
        .unwrap();
    assert!(outcome.warning.is_none());
}

fn payslip_of<'a>(payslips: &'a [Payslip], employee_id: &str) -> &'a Payslip {
    payslips
        .iter()
        .find(|p| p.employee_id == employee_id)
        .expect("payslip not generated")
}

/// Records the attendance used by the March scenarios:
/// - emp_001 attends every business day except the 10th and 11th
/// - emp_002 works the first 20 business days, the first three of them 9h
/// - emp_003 works 9h, 9h and 8h
fn record_march_attendance(payroll: &Payroll) {
    let days = march_business_days(&payroll.config);
    for &day in days.iter().filter(|d| **d != 10 && **d != 11) {
        work(payroll, "emp_001", day, 8, 17);
    }
    for (i, &day) in days.iter().take(20).enumerate() {
        let end = if i < 3 { 16 } else { 15 };
        work(payroll, "emp_002", day, 7, end);
    }
    work(payroll, "emp_003", 2, 8, 17);
    work(payroll, "emp_003", 3, 8, 17);
    work(payroll, "emp_003", 4, 9, 17);
}

// =============================================================================
// SECTION 1: Attendance
// =============================================================================

#[test]
fn test_shipped_config_is_standard() {
    let payroll = setup();
    assert_eq!(payroll.config, PayrollConfig::default());
    assert_eq!(march_business_days(&payroll.config).len(), 22);
}

#[test]
fn test_clock_in_twice_is_conflict() {
    let payroll = setup();
    payroll.ledger.clock_in("emp_001", date(2), at(2, 8)).unwrap();

    let err = payroll
        .ledger
        .clock_in("emp_001", date(2), at(2, 10))
        .unwrap_err();
    assert!(matches!(err, EngineError::ConflictError { .. }));
}

#[test]
fn test_clock_out_without_clock_in_is_state_error() {
    let payroll = setup();
    let err = payroll
        .ledger
        .clock_out("emp_001", date(2), at(2, 17))
        .unwrap_err();
    assert!(matches!(err, EngineError::StateError { .. }));
}

#[test]
fn test_late_arrival_is_tagged() {
    let payroll = setup();
    let record = payroll.ledger.clock_in("emp_001", date(2), at(2, 10)).unwrap();
    assert_eq!(record.status, AttendanceStatus::Late);
}

#[test]
fn test_absences_resolve_over_business_days() {
    let payroll = setup();
    record_march_attendance(&payroll);
    payroll
        .ledger
        .mark_absence("emp_001", date(10), AttendanceStatus::Absent)
        .unwrap();

    let summary = payroll.resolver.resolve("emp_001", date(1), date(31)).unwrap();
    assert_eq!(summary.total_business_days, 22);
    assert_eq!(summary.present_days, 20);
    assert_eq!(summary.absent_days, 2);
    assert_eq!(summary.absent_dates, vec![date(10), date(11)]);
}

// =============================================================================
// SECTION 2: Calculation
// =============================================================================

#[test]
fn test_fixed_salary_with_two_absences() {
    let payroll = setup();
    record_march_attendance(&payroll);

    let result = payroll
        .payslips
        .calculator()
        .calculate("emp_001", date(1), date(31))
        .unwrap();

    assert_eq!(result.contract_kind, ContractKind::Fixed);
    assert_eq!(result.gross_pay, decimal("850000"));
    assert_eq!(result.deductions, decimal("30000"));
    assert_eq!(result.net_pay, decimal("820000"));
}

#[test]
fn test_hourly_twenty_six_hours() {
    let payroll = setup();
    record_march_attendance(&payroll);

    let result = payroll
        .payslips
        .calculator()
        .calculate("emp_003", date(1), date(31))
        .unwrap();

    assert_eq!(result.hours_worked, decimal("26"));
    assert_eq!(result.gross_pay, decimal("390000"));
    assert_eq!(result.net_pay, decimal("390000"));
}

#[test]
fn test_per_diem_with_overtime() {
    let payroll = setup();
    record_march_attendance(&payroll);

    let result = payroll
        .payslips
        .calculator()
        .calculate("emp_002", date(1), date(31))
        .unwrap();

    assert_eq!(result.days_worked, Some(20));
    assert_eq!(result.details.overtime_hours, decimal("3"));
    assert_eq!(result.gross_pay, decimal("514062.5"));
    assert_eq!(result.net_pay, decimal("488359"));
}

// =============================================================================
// SECTION 3: Cycle Lifecycle and Payments
// =============================================================================

#[test]
fn test_full_cycle_flow() {
    let payroll = setup();
    record_march_attendance(&payroll);

    let cycle = payroll.cycles.open_cycle("2026-03", date(1), date(31)).unwrap();
    let generated = payroll.cycles.generate_payslips(cycle.id).unwrap();
    assert_eq!(generated.len(), 3);
    assert_eq!(payslip_of(&generated, "emp_001").net_pay, decimal("850000"));
    assert_eq!(payslip_of(&generated, "emp_002").net_pay, Decimal::ZERO);

    let payslips = payroll.cycles.recalculate_cycle(cycle.id).unwrap();
    let per_diem = payslip_of(&payslips, "emp_002").clone();
    assert_eq!(payslip_of(&payslips, "emp_001").net_pay, decimal("820000"));
    assert_eq!(per_diem.net_pay, decimal("488359"));
    assert_eq!(payslip_of(&payslips, "emp_003").net_pay, decimal("390000"));

    let totals = payroll.cycles.cycle(cycle.id).unwrap().totals;
    assert_eq!(totals.net, decimal("1698359"));
    assert_eq!(totals.paid, Decimal::ZERO);

    payroll.cycles.approve(cycle.id, "manager").unwrap();

    // Approved cycles still accept payments under the shipped window.
    let first = payroll
        .reconciler
        .record_payment(
            per_diem.id,
            PaymentRequest::new(decimal("200000"), PaymentMethod::MobileMoney),
            "cashier",
        )
        .unwrap();
    assert_eq!(first.receipt_number, "RCPT-000001");
    assert_eq!(
        payroll.payslips.payslip(per_diem.id).unwrap().status,
        PayslipStatus::Partial
    );

    payroll
        .reconciler
        .record_payment(
            per_diem.id,
            PaymentRequest::new(decimal("288359"), PaymentMethod::Cash),
            "cashier",
        )
        .unwrap();
    let paid = payroll.payslips.payslip(per_diem.id).unwrap();
    assert_eq!(paid.status, PayslipStatus::Paid);
    assert_eq!(paid.amount_paid, decimal("488359"));

    let err = payroll
        .reconciler
        .record_payment(
            per_diem.id,
            PaymentRequest::new(decimal("1"), PaymentMethod::Cash),
            "cashier",
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::ValidationError { .. }));

    // Amounts are frozen once approved.
    assert!(matches!(
        payroll.cycles.recalculate_cycle(cycle.id),
        Err(EngineError::StateError { .. })
    ));

    let closed = payroll.cycles.close(cycle.id, "director").unwrap();
    assert_eq!(closed.status, CycleStatus::Closed);
    assert_eq!(closed.totals.paid, decimal("488359"));

    let fixed = payslip_of(&payslips, "emp_001");
    let err = payroll
        .reconciler
        .record_payment(
            fixed.id,
            PaymentRequest::new(decimal("1000"), PaymentMethod::BankTransfer),
            "cashier",
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::StateError { .. }));
}

#[test]
fn test_per_diem_without_attendance_cannot_be_paid() {
    let payroll = setup();
    let cycle = payroll.cycles.open_cycle("2026-03", date(1), date(31)).unwrap();
    let payslips = payroll.cycles.generate_payslips(cycle.id).unwrap();
    let per_diem = payslip_of(&payslips, "emp_002");

    let err = payroll
        .reconciler
        .record_payment(
            per_diem.id,
            PaymentRequest::new(decimal("1000"), PaymentMethod::Cash),
            "cashier",
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::StateError { .. }));
}

#[test]
fn test_per_diem_payslip_created_on_demand() {
    let payroll = setup();
    record_march_attendance(&payroll);
    let cycle = payroll.cycles.open_cycle("2026-03", date(1), date(31)).unwrap();

    let payslip = payroll.payslips.calculate_per_diem(cycle.id, "emp_002").unwrap();
    assert_eq!(payslip.net_pay, decimal("488359"));
    assert_eq!(payroll.cycles.payslips(cycle.id).unwrap().len(), 1);

    // Generation requires an empty cycle.
    assert!(matches!(
        payroll.cycles.generate_payslips(cycle.id),
        Err(EngineError::StateError { .. })
    ));
}

#[test]
fn test_attendance_correction_flows_into_recalculation() {
    let payroll = setup();
    record_march_attendance(&payroll);
    let cycle = payroll.cycles.open_cycle("2026-03", date(1), date(31)).unwrap();
    let payslips = payroll.cycles.generate_payslips(cycle.id).unwrap();
    let hourly = payslip_of(&payslips, "emp_003");

    payroll
        .ledger
        .correct("emp_003", date(4), at(4, 9), Some(at(4, 18)), "supervisor")
        .unwrap();

    let updated = payroll.payslips.recalculate(hourly.id).unwrap();
    assert_eq!(updated.hours_worked, decimal("27"));
    assert_eq!(updated.net_pay, decimal("405000"));
}
