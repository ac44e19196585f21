//! Attendance ledger: clock events, absences and duration derivation.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{info, warn};

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, AuditWarning, PayPeriod};
use crate::store::AttendanceStore;

/// The record written by a clock-out or correction, plus a warning when its
/// duration could not be derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockOutcome {
    /// The persisted record.
    pub record: AttendanceRecord,
    /// Set when the duration was left unset.
    pub warning: Option<AuditWarning>,
}

/// Re-derives a record's duration from its stored clock events.
///
/// Records without clock events keep their stored duration (zero for
/// absences). Applying this twice gives the same result as applying it once.
/// Returns true when the duration changed.
///
/// # Example
///
/// ```
/// use payroll_engine::attendance::recompute_duration;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let mut record = AttendanceRecord::arrival("emp_001", day, day.and_hms_opt(8, 0, 0).unwrap(), AttendanceStatus::Present);
/// record.departure = day.and_hms_opt(17, 0, 0);
///
/// assert!(recompute_duration(&mut record));
/// assert_eq!(record.duration_minutes, Some(540));
/// assert!(!recompute_duration(&mut record));
/// ```
pub fn recompute_duration(record: &mut AttendanceRecord) -> bool {
    let derived = match (record.arrival, record.departure) {
        (Some(arrival), Some(departure)) => AttendanceRecord::derive_duration(arrival, departure),
        (Some(_), None) => None,
        (None, _) => return false,
    };
    let changed = record.duration_minutes != derived;
    record.duration_minutes = derived;
    changed
}

/// Records one clock-in/clock-out pair or absence marker per employee per day.
#[derive(Debug)]
pub struct AttendanceLedger<S> {
    store: Arc<S>,
    late_after: NaiveTime,
}

impl<S> Clone for AttendanceLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            late_after: self.late_after,
        }
    }
}

impl<S: AttendanceStore> AttendanceLedger<S> {
    /// Creates a ledger over the given store.
    pub fn new(store: Arc<S>, config: &PayrollConfig) -> Self {
        Self {
            store,
            late_after: config.policy.late_after,
        }
    }

    /// Records an arrival, creating the day's record.
    ///
    /// Fails with `ConflictError` when the day already has a record and with
    /// `ValidationError` when the timestamp is not on `day`.
    pub fn clock_in(
        &self,
        employee_id: &str,
        day: NaiveDate,
        at: NaiveDateTime,
    ) -> EngineResult<AttendanceRecord> {
        if at.date() != day {
            return Err(EngineError::validation(
                "arrival",
                at,
                format!("clock-in must fall on {}", day),
            ));
        }
        if self.store.find_attendance(employee_id, day)?.is_some() {
            return Err(EngineError::ConflictError {
                employee_id: employee_id.to_string(),
                date: day,
            });
        }

        let status = if at.time() > self.late_after {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
        let record = AttendanceRecord::arrival(employee_id, day, at, status);
        self.store.insert_attendance(record.clone())?;

        info!(employee_id, %day, arrival = %at, ?status, "Clocked in");
        Ok(record)
    }

    /// Records a departure and derives the worked duration.
    ///
    /// Fails with `StateError` when the day has no arrival or already has a
    /// departure. A departure that does not follow the arrival, or that lies
    /// more than a day after it, is stored with an unset duration and a
    /// warning.
    pub fn clock_out(
        &self,
        employee_id: &str,
        day: NaiveDate,
        at: NaiveDateTime,
    ) -> EngineResult<ClockOutcome> {
        let mut record = self
            .store
            .find_attendance(employee_id, day)?
            .filter(|r| r.arrival.is_some())
            .ok_or_else(|| {
                EngineError::state(
                    "attendance",
                    format!("employee '{}' has no clock-in on {}", employee_id, day),
                )
            })?;
        let already_out = || {
            EngineError::state(
                "attendance",
                format!(
                    "employee '{}' already clocked out on {}; use a correction",
                    employee_id, day
                ),
            )
        };
        if record.departure.is_some() {
            return Err(already_out());
        }

        record.departure = Some(at);
        recompute_duration(&mut record);
        if !self.store.record_departure(record.clone())? {
            return Err(already_out());
        }

        let warning = Self::check_duration(&record);
        info!(
            employee_id,
            %day,
            departure = %at,
            duration_minutes = ?record.duration_minutes,
            "Clocked out"
        );
        Ok(ClockOutcome { record, warning })
    }

    /// Marks a day without clock events (absence, leave, half day).
    ///
    /// Fails with `ConflictError` when the day already has a record and with
    /// `ValidationError` for tags that only clock events can produce.
    pub fn mark_absence(
        &self,
        employee_id: &str,
        day: NaiveDate,
        status: AttendanceStatus,
    ) -> EngineResult<AttendanceRecord> {
        if status.requires_clock_events() {
            return Err(EngineError::validation(
                "status",
                format!("{:?}", status),
                "only clock events can mark a day present or late",
            ));
        }
        if self.store.find_attendance(employee_id, day)?.is_some() {
            return Err(EngineError::ConflictError {
                employee_id: employee_id.to_string(),
                date: day,
            });
        }

        let record = AttendanceRecord::absence(employee_id, day, status);
        self.store.insert_attendance(record.clone())?;

        info!(employee_id, %day, ?status, "Marked attendance without clock events");
        Ok(record)
    }

    /// Administrative correction replacing a day's clock events.
    pub fn correct(
        &self,
        employee_id: &str,
        day: NaiveDate,
        arrival: NaiveDateTime,
        departure: Option<NaiveDateTime>,
        actor: &str,
    ) -> EngineResult<ClockOutcome> {
        let mut record = self
            .store
            .find_attendance(employee_id, day)?
            .ok_or_else(|| {
                EngineError::not_found("attendance", format!("{}@{}", employee_id, day))
            })?;

        record.arrival = Some(arrival);
        record.departure = departure;
        record.status = if arrival.time() > self.late_after {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
        recompute_duration(&mut record);
        self.store.update_attendance(record.clone())?;

        let warning = departure.and_then(|_| Self::check_duration(&record));
        info!(
            employee_id,
            %day,
            actor,
            duration_minutes = ?record.duration_minutes,
            "Corrected attendance"
        );
        Ok(ClockOutcome { record, warning })
    }

    /// Administrative deletion of a day's record.
    pub fn remove(&self, employee_id: &str, day: NaiveDate, actor: &str) -> EngineResult<()> {
        if !self.store.delete_attendance(employee_id, day)? {
            return Err(EngineError::not_found(
                "attendance",
                format!("{}@{}", employee_id, day),
            ));
        }
        info!(employee_id, %day, actor, "Removed attendance record");
        Ok(())
    }

    /// Re-derives and persists durations for an employee's records in a
    /// period. Returns the number of records updated.
    pub fn backfill_durations(&self, employee_id: &str, period: &PayPeriod) -> EngineResult<usize> {
        let mut updated = 0;
        for mut record in self.store.attendance_in_period(employee_id, period)? {
            if recompute_duration(&mut record) {
                self.store.update_attendance(record)?;
                updated += 1;
            }
        }
        info!(employee_id, updated, "Backfilled attendance durations");
        Ok(updated)
    }

    fn check_duration(record: &AttendanceRecord) -> Option<AuditWarning> {
        if record.duration_minutes.is_some() {
            return None;
        }
        warn!(
            employee_id = %record.employee_id,
            day = %record.date,
            arrival = ?record.arrival,
            departure = ?record.departure,
            "Attendance duration could not be derived; left unset"
        );
        Some(AuditWarning::unresolved_duration(
            &record.employee_id,
            record.date,
        ))
    }
}
