//! Payment reconciliation.
//!
//! Every operation runs inside one unit of work so that the checks, the
//! payment write and the payslip and cycle recomputation are observed
//! together. Two concurrent payments against the same payslip are therefore
//! serialised and can never overpay it.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::payslip::{load_cycle, load_payslip, settle_payments};
use crate::config::{PaymentWindow, PayrollConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayCycle, Payment, PaymentRequest, Payslip, format_receipt_number};
use crate::store::{PaymentStore, PayrollTx, UnitOfWork};

/// Records, corrects and voids payments against payslips.
#[derive(Debug)]
pub struct PaymentReconciler<S> {
    store: Arc<S>,
    window: PaymentWindow,
    receipt_prefix: String,
}

impl<S> Clone for PaymentReconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            window: self.window,
            receipt_prefix: self.receipt_prefix.clone(),
        }
    }
}

impl<S: UnitOfWork> PaymentReconciler<S> {
    /// Creates a reconciler using the configured payment window and receipt
    /// prefix.
    pub fn new(store: Arc<S>, config: &PayrollConfig) -> Self {
        Self {
            store,
            window: config.policy.payment_window,
            receipt_prefix: config.policy.receipt_prefix.clone(),
        }
    }

    /// Records a payment against a payslip.
    ///
    /// Checks run in this order:
    ///
    /// 1. a non-positive or fractional amount fails with `ValidationError`
    /// 2. a cycle outside the payment window fails with `StateError`
    /// 3. a payslip with no worked basis fails with `StateError`
    /// 4. an amount above the remaining balance fails with `ValidationError`
    ///
    /// On success the payment is stored with the next receipt number and the
    /// payslip's `amount_paid`, status and cycle totals are recomputed.
    pub fn record_payment(
        &self,
        payslip_id: Uuid,
        request: PaymentRequest,
        actor: &str,
    ) -> EngineResult<Payment> {
        let outcome = self.try_record(payslip_id, request, actor);
        match &outcome {
            Ok(payment) => info!(
                payslip_id = %payslip_id,
                amount = %payment.amount,
                receipt_number = %payment.receipt_number,
                actor,
                "Recorded payment"
            ),
            Err(e) => warn!(payslip_id = %payslip_id, error = %e, "Rejected payment"),
        }
        outcome
    }

    fn try_record(
        &self,
        payslip_id: Uuid,
        request: PaymentRequest,
        actor: &str,
    ) -> EngineResult<Payment> {
        require_whole_positive(request.amount)?;

        self.store.atomically(|tx| {
            let mut payslip = load_payslip(tx, payslip_id)?;
            let cycle = load_cycle(tx, payslip.cycle_id)?;
            self.require_window(&cycle)?;

            if !payslip.has_worked_basis() {
                return Err(EngineError::state(
                    "payslip",
                    format!(
                        "payslip {} has no worked basis to pay (net pay {})",
                        payslip.id, payslip.net_pay
                    ),
                ));
            }
            let remaining = payslip.remaining_balance();
            if request.amount > remaining {
                return Err(EngineError::validation(
                    "amount",
                    request.amount,
                    format!("exceeds remaining balance {}", remaining),
                ));
            }

            let sequence = tx.next_receipt_sequence()?;
            let payment = Payment {
                id: Uuid::new_v4(),
                payslip_id,
                amount: request.amount,
                method: request.method,
                reference: request.reference,
                notes: request.notes,
                receipt_number: format_receipt_number(&self.receipt_prefix, sequence),
                processed_by: actor.to_string(),
                recorded_at: Utc::now(),
            };
            tx.insert_payment(payment.clone())?;
            settle_payments(tx, &mut payslip)?;
            Ok(payment)
        })
    }

    /// Changes the amount of a recorded payment.
    ///
    /// The new amount must be a positive whole number, the payslip must stay
    /// within its net pay and its cycle within the payment window.
    pub fn correct_payment(
        &self,
        payment_id: Uuid,
        new_amount: Decimal,
        actor: &str,
    ) -> EngineResult<Payment> {
        require_whole_positive(new_amount)?;

        let (payment, previous) = self.store.atomically(|tx| {
            let (mut payment, mut payslip) = self.load_for_change(tx, payment_id)?;
            let previous = payment.amount;
            payment.amount = new_amount;
            tx.update_payment(payment.clone())?;
            settle_payments(tx, &mut payslip)?;
            Ok((payment, previous))
        })?;

        info!(
            payment_id = %payment_id,
            payslip_id = %payment.payslip_id,
            receipt_number = %payment.receipt_number,
            %previous,
            amount = %new_amount,
            actor,
            "Corrected payment"
        );
        Ok(payment)
    }

    /// Removes a recorded payment and returns the updated payslip.
    pub fn void_payment(&self, payment_id: Uuid, actor: &str) -> EngineResult<Payslip> {
        let (payslip, receipt_number) = self.store.atomically(|tx| {
            let (payment, mut payslip) = self.load_for_change(tx, payment_id)?;
            tx.delete_payment(payment.id)?;
            settle_payments(tx, &mut payslip)?;
            Ok((payslip, payment.receipt_number))
        })?;

        info!(
            payment_id = %payment_id,
            payslip_id = %payslip.id,
            %receipt_number,
            actor,
            "Voided payment"
        );
        Ok(payslip)
    }

    /// Net pay still owed on a payslip.
    pub fn remaining_balance(&self, payslip_id: Uuid) -> EngineResult<Decimal> {
        self.store
            .atomically(|tx| Ok(load_payslip(tx, payslip_id)?.remaining_balance()))
    }

    /// Payments recorded against a payslip, in recording order.
    pub fn payments(&self, payslip_id: Uuid) -> EngineResult<Vec<Payment>> {
        self.store.atomically(|tx| {
            load_payslip(tx, payslip_id)?;
            tx.payments_for(payslip_id)
        })
    }

    fn load_for_change(
        &self,
        tx: &dyn PayrollTx,
        payment_id: Uuid,
    ) -> EngineResult<(Payment, Payslip)> {
        let payment = tx
            .payment(payment_id)?
            .ok_or_else(|| EngineError::not_found("payment", payment_id))?;
        let payslip = load_payslip(tx, payment.payslip_id)?;
        let cycle = load_cycle(tx, payslip.cycle_id)?;
        self.require_window(&cycle)?;
        Ok((payment, payslip))
    }

    fn require_window(&self, cycle: &PayCycle) -> EngineResult<()> {
        if !self.window.accepts(cycle.status) {
            return Err(EngineError::state(
                "pay_cycle",
                format!(
                    "cycle {} is {} and no longer accepts payments",
                    cycle.id, cycle.status
                ),
            ));
        }
        Ok(())
    }
}

fn require_whole_positive(amount: Decimal) -> EngineResult<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::validation(
            "amount",
            amount,
            "must be greater than zero",
        ));
    }
    if !amount.fract().is_zero() {
        return Err(EngineError::validation(
            "amount",
            amount,
            "must be a whole number of currency units",
        ));
    }
    Ok(())
}
