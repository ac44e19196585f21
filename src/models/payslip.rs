//! Payslip model.
//!
//! A [`Payslip`] is one employee's pay record for one pay cycle. Its paid
//! amount and status are derived from the payments recorded against it.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CalculationDetails, ContractKind};

/// Payment status of a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    /// Nothing has been paid.
    Unpaid,
    /// Some, but not all, of the net pay has been paid.
    Partial,
    /// The net pay has been paid in full.
    Paid,
}

impl PayslipStatus {
    /// Derives the status from the paid amount and the net pay.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::PayslipStatus;
    /// use rust_decimal::Decimal;
    ///
    /// let net = Decimal::new(488359, 0);
    /// assert_eq!(PayslipStatus::derive(Decimal::ZERO, net), PayslipStatus::Unpaid);
    /// assert_eq!(PayslipStatus::derive(Decimal::new(200000, 0), net), PayslipStatus::Partial);
    /// assert_eq!(PayslipStatus::derive(net, net), PayslipStatus::Paid);
    /// ```
    pub fn derive(amount_paid: Decimal, net_pay: Decimal) -> Self {
        if amount_paid <= Decimal::ZERO {
            PayslipStatus::Unpaid
        } else if amount_paid < net_pay {
            PayslipStatus::Partial
        } else {
            PayslipStatus::Paid
        }
    }
}

impl fmt::Display for PayslipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayslipStatus::Unpaid => "unpaid",
            PayslipStatus::Partial => "partial",
            PayslipStatus::Paid => "paid",
        };
        f.write_str(s)
    }
}

/// One employee's pay record for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier.
    pub id: Uuid,
    /// The owning pay cycle.
    pub cycle_id: Uuid,
    /// The employee paid by this payslip.
    pub employee_id: String,
    /// Contract kind the payslip was computed under.
    pub contract_kind: ContractKind,
    /// Days worked; only meaningful for per-diem contracts.
    pub days_worked: Option<u32>,
    /// Hours worked in the period.
    pub hours_worked: Decimal,
    /// Hourly rate used or reported by the calculation.
    pub hourly_rate_used: Option<Decimal>,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// Sum of recorded payments. Never set directly.
    pub amount_paid: Decimal,
    /// Status derived from `amount_paid` and `net_pay`.
    pub status: PayslipStatus,
    /// Breakdown of the last calculation applied.
    pub details: Option<CalculationDetails>,
    /// When the monetary fields were last written.
    pub updated_at: DateTime<Utc>,
}

impl Payslip {
    /// Creates an unpaid payslip with zero amounts.
    pub fn new(
        cycle_id: Uuid,
        employee_id: impl Into<String>,
        contract_kind: ContractKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            cycle_id,
            employee_id: employee_id.into(),
            contract_kind,
            days_worked: None,
            hours_worked: Decimal::ZERO,
            hourly_rate_used: None,
            gross_pay: Decimal::ZERO,
            deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            amount_paid: Decimal::ZERO,
            status: PayslipStatus::Unpaid,
            details: None,
            updated_at: Utc::now(),
        }
    }

    /// Net pay still owed.
    pub fn remaining_balance(&self) -> Decimal {
        (self.net_pay - self.amount_paid).max(Decimal::ZERO)
    }

    /// Whether the payslip reflects any worked basis a payment can settle.
    pub fn has_worked_basis(&self) -> bool {
        if self.net_pay <= Decimal::ZERO {
            return false;
        }
        match self.contract_kind {
            ContractKind::Fixed => true,
            ContractKind::PerDiem => self.days_worked.is_some_and(|d| d > 0),
            ContractKind::Hourly => self.hours_worked > Decimal::ZERO,
        }
    }
}
