//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::CycleStatus;

/// Working-hour standards used to derive equivalent rates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HoursConfig {
    /// Hours in a standard month; divides the monthly base into an hourly rate.
    pub standard_monthly_hours: Decimal,
    /// Hours in a standard day; divides the daily rate into an hourly rate.
    pub standard_daily_hours: Decimal,
}

/// Per-day overtime rules for per-diem contracts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OvertimeConfig {
    /// Hours worked in a day before overtime applies.
    pub daily_threshold_hours: Decimal,
    /// Multiplier applied to the equivalent hourly rate.
    pub multiplier: Decimal,
}

/// Flat deduction placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeductionConfig {
    /// Amount deducted from a fixed salary per absent business day.
    pub flat_absence_deduction: Decimal,
    /// Fraction of per-diem gross pay withheld (0.05 = 5%).
    pub per_diem_rate: Decimal,
}

/// Contents of `payroll.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollRules {
    /// Working-hour standards.
    pub hours: HoursConfig,
    /// Overtime rules.
    pub overtime: OvertimeConfig,
    /// Deduction placeholders.
    pub deductions: DeductionConfig,
}

/// Which cycle statuses accept new payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentWindow {
    /// Payments only while the cycle is Draft.
    DraftOnly,
    /// Payments while the cycle is Draft or Approved.
    UntilClosed,
}

impl PaymentWindow {
    /// Whether a cycle in `status` accepts new payments.
    pub fn accepts(self, status: CycleStatus) -> bool {
        match self {
            PaymentWindow::DraftOnly => status == CycleStatus::Draft,
            PaymentWindow::UntilClosed => status != CycleStatus::Closed,
        }
    }
}

/// Calendar used to enumerate expected working days.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BusinessCalendar {
    /// Days of the week that are not working days.
    pub weekend: Vec<Weekday>,
    /// Public holidays excluded from working days.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl BusinessCalendar {
    /// Returns true when the date is an expected working day.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::BusinessCalendar;
    /// use chrono::{NaiveDate, Weekday};
    ///
    /// let calendar = BusinessCalendar {
    ///     weekend: vec![Weekday::Sat, Weekday::Sun],
    ///     holidays: vec![],
    /// };
    /// assert!(calendar.is_business_day(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())); // Monday
    /// assert!(!calendar.is_business_day(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap())); // Saturday
    /// ```
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        !self.weekend.contains(&date.weekday()) && !self.holidays.contains(&date)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
            holidays: Vec::new(),
        }
    }
}

/// Contents of `calendar.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarPolicy {
    /// Business-day calendar.
    pub calendar: BusinessCalendar,
    /// Arrivals after this time of day are tagged late.
    pub late_after: NaiveTime,
    /// Cycle statuses that accept payments.
    pub payment_window: PaymentWindow,
    /// Prefix of issued receipt numbers.
    pub receipt_prefix: String,
}

/// The complete payroll configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollConfig {
    /// Calculation rules.
    pub rules: PayrollRules,
    /// Calendar and lifecycle policy.
    pub policy: CalendarPolicy,
}

impl PayrollConfig {
    /// Hourly rate equivalent of a daily rate.
    pub fn equivalent_hourly_rate(&self, daily_rate: Decimal) -> Decimal {
        daily_rate / self.rules.hours.standard_daily_hours
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            rules: PayrollRules {
                hours: HoursConfig {
                    standard_monthly_hours: Decimal::new(173, 0),
                    standard_daily_hours: Decimal::new(8, 0),
                },
                overtime: OvertimeConfig {
                    daily_threshold_hours: Decimal::new(8, 0),
                    multiplier: Decimal::new(15, 1),
                },
                deductions: DeductionConfig {
                    flat_absence_deduction: Decimal::new(15000, 0),
                    per_diem_rate: Decimal::new(5, 2),
                },
            },
            policy: CalendarPolicy {
                calendar: BusinessCalendar::default(),
                late_after: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
                payment_window: PaymentWindow::UntilClosed,
                receipt_prefix: "RCPT".to_string(),
            },
        }
    }
}
