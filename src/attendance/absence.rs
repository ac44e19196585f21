//! Absence resolution over business days.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{BusinessCalendar, PayrollConfig};
use crate::error::EngineResult;
use crate::models::{AttendanceRecord, PayPeriod};
use crate::store::AttendanceStore;

/// Presence and absence counts over the business days of a period.
///
/// `present_days + absent_days == total_business_days` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceSummary {
    /// Business days with a non-absence record.
    pub present_days: u32,
    /// Business days with no record or an absence record.
    pub absent_days: u32,
    /// Business days in the period.
    pub total_business_days: u32,
    /// The absent business days, in date order.
    pub absent_dates: Vec<NaiveDate>,
}

/// Matches the business days of a period against attendance records.
///
/// Records on non-business days are ignored.
///
/// # Example
///
/// ```
/// use payroll_engine::attendance::summarize_absences;
/// use payroll_engine::config::BusinessCalendar;
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// // Monday 2 March to Sunday 8 March 2026, no attendance at all.
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
/// ).unwrap();
///
/// let summary = summarize_absences(&[], &period, &BusinessCalendar::default());
/// assert_eq!(summary.total_business_days, 5);
/// assert_eq!(summary.absent_days, 5);
/// ```
pub fn summarize_absences(
    records: &[AttendanceRecord],
    period: &PayPeriod,
    calendar: &BusinessCalendar,
) -> AbsenceSummary {
    let by_day: HashMap<NaiveDate, &AttendanceRecord> =
        records.iter().map(|r| (r.date, r)).collect();

    let mut summary = AbsenceSummary::default();
    for day in period.days().filter(|d| calendar.is_business_day(*d)) {
        summary.total_business_days += 1;
        match by_day.get(&day) {
            Some(record) if !record.is_absence() => summary.present_days += 1,
            _ => {
                summary.absent_days += 1;
                summary.absent_dates.push(day);
            }
        }
    }
    summary
}

/// Store-backed absence resolution for one employee.
#[derive(Debug)]
pub struct AbsenceResolver<S> {
    store: Arc<S>,
    calendar: BusinessCalendar,
}

impl<S> Clone for AbsenceResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calendar: self.calendar.clone(),
        }
    }
}

impl<S: AttendanceStore> AbsenceResolver<S> {
    /// Creates a resolver using the configured calendar.
    pub fn new(store: Arc<S>, config: &PayrollConfig) -> Self {
        Self {
            store,
            calendar: config.policy.calendar.clone(),
        }
    }

    /// Resolves presence and absence for an employee between two dates
    /// (inclusive). Fails with `ValidationError` when `start > end`.
    pub fn resolve(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<AbsenceSummary> {
        let period = PayPeriod::new(start, end)?;
        let records = self.store.attendance_in_period(employee_id, &period)?;
        Ok(summarize_absences(&records, &period, &self.calendar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::AttendanceStatus;
    use crate::store::MemoryStore;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn worked(day: NaiveDate) -> AttendanceRecord {
        let mut record = AttendanceRecord::arrival(
            "emp_001",
            day,
            day.and_hms_opt(8, 0, 0).unwrap(),
            AttendanceStatus::Present,
        );
        record.departure = day.and_hms_opt(17, 0, 0);
        record.duration_minutes = Some(540);
        record
    }

    #[test]
    fn test_march_2026_has_22_business_days() {
        let period = PayPeriod::new(date(1), date(31)).unwrap();
        let summary = summarize_absences(&[], &period, &BusinessCalendar::default());
        assert_eq!(summary.total_business_days, 22);
        assert_eq!(summary.absent_days, 22);
        assert_eq!(summary.present_days, 0);
    }

    #[test]
    fn test_missing_and_absent_days_count_as_absent() {
        // Monday 2 .. Friday 6 March
        let period = PayPeriod::new(date(2), date(6)).unwrap();
        let records = vec![
            worked(date(2)),
            worked(date(3)),
            AttendanceRecord::absence("emp_001", date(4), AttendanceStatus::Absent),
            AttendanceRecord::absence("emp_001", date(5), AttendanceStatus::Leave),
        ];

        let summary = summarize_absences(&records, &period, &BusinessCalendar::default());
        assert_eq!(summary.present_days, 3);
        assert_eq!(summary.absent_days, 2);
        assert_eq!(summary.absent_dates, vec![date(4), date(6)]);
    }

    #[test]
    fn test_weekend_attendance_is_ignored() {
        // Saturday 7 .. Sunday 8 March
        let period = PayPeriod::new(date(7), date(8)).unwrap();
        let summary =
            summarize_absences(&[worked(date(7))], &period, &BusinessCalendar::default());
        assert_eq!(summary.total_business_days, 0);
        assert_eq!(summary.present_days, 0);
    }

    #[test]
    fn test_configured_weekend_and_holidays() {
        let calendar = BusinessCalendar {
            weekend: vec![Weekday::Sun],
            holidays: vec![date(3)],
        };
        // Monday 2 .. Sunday 8 March: six non-Sunday days minus one holiday.
        let period = PayPeriod::new(date(2), date(8)).unwrap();
        let summary = summarize_absences(&[], &period, &calendar);
        assert_eq!(summary.total_business_days, 5);
    }

    #[test]
    fn test_resolver_reads_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.insert_attendance(worked(date(2))).unwrap();
        let resolver = AbsenceResolver::new(Arc::clone(&store), &PayrollConfig::default());

        let summary = resolver.resolve("emp_001", date(2), date(6)).unwrap();
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.absent_days, 4);

        let other = resolver.resolve("emp_002", date(2), date(6)).unwrap();
        assert_eq!(other.present_days, 0);
    }

    #[test]
    fn test_resolver_rejects_inverted_range() {
        let store = Arc::new(MemoryStore::new());
        let resolver = AbsenceResolver::new(store, &PayrollConfig::default());
        assert!(matches!(
            resolver.resolve("emp_001", date(6), date(2)),
            Err(EngineError::ValidationError { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_present_plus_absent_equals_business_days(
            start_offset in 0i64..365,
            length in 0i64..120,
            worked_mask in proptest::collection::vec(any::<u8>(), 120),
        ) {
            let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let start = base + chrono::Duration::days(start_offset);
            let end = start + chrono::Duration::days(length);
            let period = PayPeriod::new(start, end).unwrap();

            let records: Vec<AttendanceRecord> = period
                .days()
                .zip(worked_mask.iter())
                .filter_map(|(day, bits)| match bits % 3 {
                    0 => None,
                    1 => Some(worked(day)),
                    _ => Some(AttendanceRecord::absence("emp_001", day, AttendanceStatus::Absent)),
                })
                .collect();

            let summary = summarize_absences(&records, &period, &BusinessCalendar::default());
            prop_assert_eq!(
                summary.present_days + summary.absent_days,
                summary.total_business_days
            );
            prop_assert_eq!(summary.absent_dates.len() as u32, summary.absent_days);
        }
    }
}
