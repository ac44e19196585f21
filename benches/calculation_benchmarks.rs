//! Performance benchmarks for the Payroll Engine.
//!
//! Covers the three salary calculators over a month of attendance, a batch
//! cycle recalculation and payment reconciliation.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::calculation::{CalculationInput, calculate_pay};
use payroll_engine::config::PayrollConfig;
use payroll_engine::models::{
    AttendanceRecord, AttendanceStatus, Contract, Employee, PayPeriod, PaymentMethod,
    PaymentRequest,
};
use payroll_engine::payroll::{PayCycleManager, PaymentReconciler};
use payroll_engine::store::{AttendanceStore, MemoryStore};

fn march() -> PayPeriod {
    PayPeriod::new(
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    )
    .unwrap()
}

/// One worked record per business day of March, alternating 8h and 9h.
fn month_of_attendance(employee_id: &str, config: &PayrollConfig) -> Vec<AttendanceRecord> {
    march()
        .days()
        .filter(|d| config.policy.calendar.is_business_day(*d))
        .enumerate()
        .map(|(i, day)| {
            let arrival = day.and_hms_opt(8, 0, 0).unwrap();
            let minutes = if i % 2 == 0 { 480 } else { 540 };
            let mut record =
                AttendanceRecord::arrival(employee_id, day, arrival, AttendanceStatus::Present);
            record.departure = Some(arrival + Duration::minutes(minutes));
            record.duration_minutes = Some(minutes);
            record
        })
        .collect()
}

fn employee(id: &str, contract: Contract) -> Employee {
    Employee {
        id: id.to_string(),
        name: id.to_uppercase(),
        contract,
        active: true,
    }
}

fn contracts() -> Vec<(&'static str, Contract)> {
    vec![
        ("fixed", Contract::Fixed { monthly_base: Decimal::new(850000, 0) }),
        ("per_diem", Contract::PerDiem { daily_rate: Decimal::new(25000, 0) }),
        ("hourly", Contract::Hourly { hourly_rate: Decimal::new(15000, 0) }),
    ]
}

/// Benchmark: one month for each contract kind.
fn bench_calculators(c: &mut Criterion) {
    let config = PayrollConfig::default();
    let records = month_of_attendance("emp_bench", &config);
    let mut group = c.benchmark_group("calculate_month");

    for (name, contract) in contracts() {
        let employee = employee("emp_bench", contract);
        group.bench_with_input(BenchmarkId::from_parameter(name), &employee, |b, employee| {
            b.iter(|| {
                let input = CalculationInput {
                    employee,
                    period: march(),
                    records: &records,
                    config: &config,
                };
                black_box(calculate_pay(black_box(&input)).unwrap())
            })
        });
    }
    group.finish();
}

/// Benchmark: recalculating a cycle of 100 employees.
fn bench_cycle_recalculation(c: &mut Criterion) {
    let config = PayrollConfig::default();
    let store = Arc::new(MemoryStore::new());
    let kinds = contracts();

    for i in 0..100 {
        let id = format!("emp_{:03}", i);
        let (_, contract) = kinds[i % kinds.len()].clone();
        store.add_employee(employee(&id, contract)).unwrap();
        for record in month_of_attendance(&id, &config) {
            store.insert_attendance(record).unwrap();
        }
    }

    let cycles = PayCycleManager::new(Arc::clone(&store), &config);
    let period = march();
    let cycle = cycles
        .open_cycle("2026-03", period.start_date, period.end_date)
        .unwrap();
    cycles.generate_payslips(cycle.id).unwrap();

    let mut group = c.benchmark_group("cycle_processing");
    group.throughput(Throughput::Elements(100));
    group.sample_size(20);
    group.bench_function("recalculate_100", |b| {
        b.iter(|| black_box(cycles.recalculate_cycle(cycle.id).unwrap()))
    });
    group.finish();
}

/// Benchmark: recording a payment, including receipt issue and totals refresh.
fn bench_record_payment(c: &mut Criterion) {
    let config = PayrollConfig::default();
    let store = Arc::new(MemoryStore::new());
    store
        .add_employee(employee(
            "emp_001",
            Contract::Fixed { monthly_base: Decimal::new(1_000_000_000, 0) },
        ))
        .unwrap();

    let cycles = PayCycleManager::new(Arc::clone(&store), &config);
    let period = march();
    let cycle = cycles
        .open_cycle("2026-03", period.start_date, period.end_date)
        .unwrap();
    let payslip = cycles.generate_payslips(cycle.id).unwrap().remove(0);
    let reconciler = PaymentReconciler::new(Arc::clone(&store), &config);

    c.bench_function("record_payment", |b| {
        b.iter(|| {
            let request = PaymentRequest::new(Decimal::ONE, PaymentMethod::Cash);
            black_box(reconciler.record_payment(payslip.id, request, "bench"))
        })
    });
}

criterion_group!(
    benches,
    bench_calculators,
    bench_cycle_recalculation,
    bench_record_payment
);
criterion_main!(benches);
