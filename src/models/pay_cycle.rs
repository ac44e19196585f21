//! Pay cycle model and its lifecycle.
//!
//! ```text
//! Draft ──▶ Approved ──▶ Closed
//! ```
//!
//! Transitions only move forward. Payslips of a cycle may be generated and
//! recalculated while it is Draft; payments are accepted according to the
//! configured [`PaymentWindow`](crate::config::PaymentWindow).

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayPeriod, Payslip};
use crate::error::{EngineError, EngineResult};

/// Lifecycle status of a pay cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Payslips may be generated and recalculated.
    Draft,
    /// Amounts are frozen.
    Approved,
    /// Terminal; nothing may change.
    Closed,
}

impl CycleStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CycleStatus::Closed)
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CycleStatus::Draft => "DRAFT",
            CycleStatus::Approved => "APPROVED",
            CycleStatus::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// Record of a pay cycle status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTransition {
    /// Status before the transition.
    pub from: CycleStatus,
    /// Status after the transition.
    pub to: CycleStatus,
    /// Who performed the transition.
    pub actor: String,
    /// When the transition occurred.
    pub at: DateTime<Utc>,
}

/// Cached rollup of a cycle's payslips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTotals {
    /// Sum of gross pay.
    pub gross: Decimal,
    /// Sum of net pay.
    pub net: Decimal,
    /// Sum of amounts paid.
    pub paid: Decimal,
}

impl CycleTotals {
    /// Sums the monetary fields of the given payslips.
    pub fn from_payslips<'a>(payslips: impl IntoIterator<Item = &'a Payslip>) -> Self {
        payslips
            .into_iter()
            .fold(CycleTotals::default(), |mut totals, p| {
                totals.gross += p.gross_pay;
                totals.net += p.net_pay;
                totals.paid += p.amount_paid;
                totals
            })
    }
}

/// A pay cycle grouping the payslips generated for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayCycle {
    /// Unique identifier.
    pub id: Uuid,
    /// Human readable label (e.g. "2026-03").
    pub label: String,
    /// The period covered by the cycle.
    pub period: PayPeriod,
    /// Current lifecycle status.
    pub status: CycleStatus,
    /// Cached totals over the cycle's payslips.
    pub totals: CycleTotals,
    /// Ordered log of status transitions.
    pub transitions: Vec<CycleTransition>,
    /// When the cycle was opened.
    pub created_at: DateTime<Utc>,
}

impl PayCycle {
    /// Opens a new cycle in Draft.
    pub fn open(label: impl Into<String>, period: PayPeriod) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            period,
            status: CycleStatus::Draft,
            totals: CycleTotals::default(),
            transitions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Approves the cycle (DRAFT → APPROVED).
    pub fn approve(&mut self, actor: &str) -> EngineResult<()> {
        self.require_status(CycleStatus::Draft, CycleStatus::Approved)?;
        self.do_transition(CycleStatus::Approved, actor);
        Ok(())
    }

    /// Closes the cycle (APPROVED → CLOSED).
    pub fn close(&mut self, actor: &str) -> EngineResult<()> {
        self.require_status(CycleStatus::Approved, CycleStatus::Closed)?;
        self.do_transition(CycleStatus::Closed, actor);
        Ok(())
    }

    /// Fails unless the cycle is Draft.
    pub fn ensure_draft(&self, operation: &str) -> EngineResult<()> {
        if self.status != CycleStatus::Draft {
            return Err(EngineError::state(
                "pay_cycle",
                format!(
                    "cannot {} while cycle {} is {}, expected {}",
                    operation,
                    self.id,
                    self.status,
                    CycleStatus::Draft
                ),
            ));
        }
        Ok(())
    }

    fn require_status(&self, expected: CycleStatus, target: CycleStatus) -> EngineResult<()> {
        if self.status != expected {
            return Err(EngineError::state(
                "pay_cycle",
                format!(
                    "invalid transition {} -> {} for cycle {}",
                    self.status, target, self.id
                ),
            ));
        }
        Ok(())
    }

    fn do_transition(&mut self, to: CycleStatus, actor: &str) {
        self.transitions.push(CycleTransition {
            from: self.status,
            to,
            actor: actor.to_string(),
            at: Utc::now(),
        });
        self.status = to;
    }
}
