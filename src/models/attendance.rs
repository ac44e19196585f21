//! Attendance record model.
//!
//! One [`AttendanceRecord`] exists per employee per calendar day. It holds
//! the clock events, the derived worked duration and a status tag.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Longest worked duration, in minutes, a single day can hold.
pub const MAX_DAILY_MINUTES: i64 = 1440;

/// Status tag attached to an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Employee clocked in on time.
    Present,
    /// Employee clocked in after the configured late threshold.
    Late,
    /// Employee worked part of the day.
    HalfDay,
    /// Employee was on approved leave.
    Leave,
    /// Employee did not attend.
    Absent,
}

impl AttendanceStatus {
    /// Returns true for the tag that marks a day as absent.
    pub fn is_absence(&self) -> bool {
        matches!(self, AttendanceStatus::Absent)
    }

    /// Returns true for tags that can only be produced by clock events.
    pub fn requires_clock_events(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// A single day's attendance for one employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let arrival = date.and_hms_opt(8, 0, 0).unwrap();
/// let departure = date.and_hms_opt(17, 0, 0).unwrap();
///
/// let mut record = AttendanceRecord::arrival("emp_001", date, arrival, AttendanceStatus::Present);
/// record.departure = Some(departure);
/// record.duration_minutes = AttendanceRecord::derive_duration(arrival, departure);
/// assert_eq!(record.duration_minutes, Some(540));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar day the record tracks.
    pub date: NaiveDate,
    /// Clock-in timestamp.
    pub arrival: Option<NaiveDateTime>,
    /// Clock-out timestamp.
    pub departure: Option<NaiveDateTime>,
    /// Worked minutes; unset when they could not be derived.
    pub duration_minutes: Option<i64>,
    /// Status tag for the day.
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Creates a record holding only an arrival.
    pub fn arrival(
        employee_id: impl Into<String>,
        date: NaiveDate,
        arrival: NaiveDateTime,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            arrival: Some(arrival),
            departure: None,
            duration_minutes: None,
            status,
        }
    }

    /// Creates a zero-duration record with no clock events.
    pub fn absence(
        employee_id: impl Into<String>,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            arrival: None,
            departure: None,
            duration_minutes: Some(0),
            status,
        }
    }

    /// Derives worked minutes from a clock-in/clock-out pair.
    ///
    /// Returns `None` when departure is not after arrival or when the
    /// difference exceeds [`MAX_DAILY_MINUTES`]. Partial minutes are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::AttendanceRecord;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// let arrival = day.and_hms_opt(8, 0, 0).unwrap();
    ///
    /// assert_eq!(AttendanceRecord::derive_duration(arrival, day.and_hms_opt(8, 45, 59).unwrap()), Some(45));
    /// assert_eq!(AttendanceRecord::derive_duration(arrival, arrival), None);
    /// ```
    pub fn derive_duration(arrival: NaiveDateTime, departure: NaiveDateTime) -> Option<i64> {
        if departure <= arrival {
            return None;
        }
        let minutes = (departure - arrival).num_milliseconds() / 60_000;
        (0..=MAX_DAILY_MINUTES).contains(&minutes).then_some(minutes)
    }

    /// Returns the worked minutes, re-deriving them from the clock events
    /// when the stored value is missing.
    pub fn resolved_minutes(&self) -> Option<i64> {
        if self.duration_minutes.is_some() {
            return self.duration_minutes;
        }
        match (self.arrival, self.departure) {
            (Some(arrival), Some(departure)) => Self::derive_duration(arrival, departure),
            _ => None,
        }
    }

    /// Returns true when the record marks the day as absent.
    pub fn is_absence(&self) -> bool {
        self.status.is_absence()
    }
}
