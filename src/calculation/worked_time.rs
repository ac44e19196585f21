//! Worked-time profile built from attendance records.
//!
//! Every calculator starts from the same profile: the days in the period
//! that have a departure and a resolvable duration. Records whose duration
//! cannot be resolved contribute nothing and are reported as warnings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AttendanceRecord, AuditStep, AuditWarning, PayPeriod};

/// Minutes worked on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkedDay {
    /// The calendar day.
    pub date: NaiveDate,
    /// Minutes worked.
    pub minutes: i64,
}

impl WorkedDay {
    /// Hours worked, exact.
    pub fn hours(&self) -> Decimal {
        minutes_to_hours(self.minutes)
    }
}

/// Worked time of one employee over a period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkedTimeProfile {
    /// Days with a positive resolved duration, in date order.
    pub days: Vec<WorkedDay>,
    /// Sum of worked minutes.
    pub total_minutes: i64,
    /// Days with a departure but no resolvable duration.
    pub unresolved: Vec<NaiveDate>,
}

impl WorkedTimeProfile {
    /// Number of days with worked time.
    pub fn days_worked(&self) -> u32 {
        self.days.len() as u32
    }

    /// Total hours worked, exact.
    pub fn total_hours(&self) -> Decimal {
        minutes_to_hours(self.total_minutes)
    }
}

/// Converts minutes to hours.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Builds the worked-time profile for a period.
///
/// Only records inside the period that are not absences and have a
/// departure are considered. A stored duration is used as-is; a missing one
/// is re-derived from the clock events.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::build_worked_time;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, PayPeriod};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let mut record = AttendanceRecord::arrival("emp_001", day, day.and_hms_opt(8, 0, 0).unwrap(), AttendanceStatus::Present);
/// record.departure = day.and_hms_opt(17, 0, 0);
///
/// let period = PayPeriod::new(day, day).unwrap();
/// let (profile, warnings, _) = build_worked_time(&[record], &period, 1);
/// assert_eq!(profile.total_minutes, 540);
/// assert!(warnings.is_empty());
/// ```
pub fn build_worked_time(
    records: &[AttendanceRecord],
    period: &PayPeriod,
    step_number: u32,
) -> (WorkedTimeProfile, Vec<AuditWarning>, AuditStep) {
    let mut profile = WorkedTimeProfile::default();
    let mut warnings = Vec::new();

    let candidates = records.iter().filter(|r| {
        period.contains_date(r.date) && !r.is_absence() && r.departure.is_some()
    });

    for record in candidates {
        match record.resolved_minutes() {
            Some(minutes) if minutes > 0 => {
                profile.days.push(WorkedDay {
                    date: record.date,
                    minutes,
                });
                profile.total_minutes += minutes;
            }
            Some(_) => {}
            None => {
                warn!(
                    employee_id = %record.employee_id,
                    day = %record.date,
                    "Attendance with unresolvable duration contributes no worked time"
                );
                profile.unresolved.push(record.date);
                warnings.push(AuditWarning::unresolved_duration(
                    &record.employee_id,
                    record.date,
                ));
            }
        }
    }
    profile.days.sort_by_key(|d| d.date);

    let audit_step = AuditStep {
        step_number,
        rule_id: "worked_time_profile".to_string(),
        rule_name: "Worked Time Profile".to_string(),
        input: serde_json::json!({
            "period_start": period.start_date.to_string(),
            "period_end": period.end_date.to_string(),
            "records": records.len()
        }),
        output: serde_json::json!({
            "days_worked": profile.days_worked(),
            "total_minutes": profile.total_minutes,
            "unresolved_days": profile.unresolved.len()
        }),
        reasoning: format!(
            "{} days with worked time totalling {} minutes; {} days without a resolvable duration",
            profile.days_worked(),
            profile.total_minutes,
            profile.unresolved.len()
        ),
    };

    (profile, warnings, audit_step)
}
