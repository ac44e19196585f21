//! Payment model.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash handed over.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Mobile money wallet.
    MobileMoney,
    /// Cheque.
    Cheque,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::Cheque => "cheque",
        };
        f.write_str(s)
    }
}

/// Caller-supplied details of a payment to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid, in the smallest currency unit.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// External reference (transfer id, cheque number).
    #[serde(default)]
    pub reference: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentRequest {
    /// Creates a request without reference or notes.
    pub fn new(amount: Decimal, method: PaymentMethod) -> Self {
        Self {
            amount,
            method,
            reference: None,
            notes: None,
        }
    }
}

/// A payment recorded against a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: Uuid,
    /// The payslip this payment settles.
    pub payslip_id: Uuid,
    /// Amount paid.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// External reference.
    pub reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Sequentially issued receipt number, unique across payments.
    pub receipt_number: String,
    /// Actor that processed the payment.
    pub processed_by: String,
    /// When the payment was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Formats a receipt number from a prefix and a sequence value.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::format_receipt_number;
///
/// assert_eq!(format_receipt_number("RCPT", 42), "RCPT-000042");
/// ```
pub fn format_receipt_number(prefix: &str, sequence: u64) -> String {
    format!("{}-{:06}", prefix, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_number_is_zero_padded() {
        assert_eq!(format_receipt_number("RCPT", 1), "RCPT-000001");
        assert_eq!(format_receipt_number("PAY", 1234567), "PAY-1234567");
    }

    #[test]
    fn test_payment_request_defaults_optional_fields() {
        let json = r#"{"amount": "200000", "method": "mobile_money"}"#;
        let request: PaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, Decimal::new(200000, 0));
        assert_eq!(request.method, PaymentMethod::MobileMoney);
        assert!(request.reference.is_none());
        assert!(request.notes.is_none());
    }

    #[test]
    fn test_payment_method_display_matches_serde() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::BankTransfer,
            PaymentMethod::MobileMoney,
            PaymentMethod::Cheque,
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method));
        }
    }
}
