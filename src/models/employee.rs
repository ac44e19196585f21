//! Employee model and contract terms.
//!
//! This module defines the [`Employee`] struct and the [`Contract`] variant
//! that carries exactly the rate valid for each contract kind, together with
//! the flat [`EmployeeRecord`] row shape a storage collaborator hands back.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of contract an employee is paid under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// Fixed monthly salary.
    Fixed,
    /// Paid per day actually worked (journalier).
    PerDiem,
    /// Paid per hour actually worked (honoraire).
    Hourly,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContractKind::Fixed => "fixed",
            ContractKind::PerDiem => "per_diem",
            ContractKind::Hourly => "hourly",
        };
        f.write_str(s)
    }
}

/// Contract terms, carrying only the rate that applies to the kind.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Contract, ContractKind};
/// use rust_decimal::Decimal;
///
/// let contract = Contract::PerDiem { daily_rate: Decimal::new(25000, 0) };
/// assert_eq!(contract.kind(), ContractKind::PerDiem);
/// assert_eq!(contract.rate_field(), "daily_rate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contract {
    /// Fixed monthly salary.
    Fixed {
        /// The monthly base salary.
        monthly_base: Decimal,
    },
    /// Per-diem contract.
    PerDiem {
        /// Amount paid for each day worked.
        daily_rate: Decimal,
    },
    /// Hourly contract.
    Hourly {
        /// Amount paid for each hour worked.
        hourly_rate: Decimal,
    },
}

impl Contract {
    /// Returns the contract kind tag.
    pub fn kind(&self) -> ContractKind {
        match self {
            Contract::Fixed { .. } => ContractKind::Fixed,
            Contract::PerDiem { .. } => ContractKind::PerDiem,
            Contract::Hourly { .. } => ContractKind::Hourly,
        }
    }

    /// Returns the rate carried by the contract.
    pub fn rate(&self) -> Decimal {
        match self {
            Contract::Fixed { monthly_base } => *monthly_base,
            Contract::PerDiem { daily_rate } => *daily_rate,
            Contract::Hourly { hourly_rate } => *hourly_rate,
        }
    }

    /// Returns the name of the rate field for the contract kind.
    pub fn rate_field(&self) -> &'static str {
        match self {
            Contract::Fixed { .. } => "monthly_base",
            Contract::PerDiem { .. } => "daily_rate",
            Contract::Hourly { .. } => "hourly_rate",
        }
    }
}

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contract terms.
    pub contract: Contract,
    /// Whether the employee is currently on the payroll.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns the contract kind of the employee.
    pub fn contract_kind(&self) -> ContractKind {
        self.contract.kind()
    }

    /// Returns the contract rate, failing when it is not strictly positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Contract, Employee};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Awa".to_string(),
    ///     contract: Contract::Hourly { hourly_rate: Decimal::ZERO },
    ///     active: true,
    /// };
    /// assert!(employee.require_rate().is_err());
    /// ```
    pub fn require_rate(&self) -> EngineResult<Decimal> {
        let rate = self.contract.rate();
        if rate <= Decimal::ZERO {
            return Err(EngineError::ConfigurationError {
                employee_id: self.id.clone(),
                field: self.contract.rate_field().to_string(),
                message: format!("must be greater than zero, got {}", rate),
            });
        }
        Ok(rate)
    }
}

/// Flat employee row as kept by a storage collaborator.
///
/// Rows carry all three rate columns; converting into an [`Employee`]
/// rejects rows whose populated rates do not match the contract kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contract kind tag.
    pub contract_kind: ContractKind,
    /// Monthly base (fixed contracts only).
    pub monthly_base: Option<Decimal>,
    /// Daily rate (per-diem contracts only).
    pub daily_rate: Option<Decimal>,
    /// Hourly rate (hourly contracts only).
    pub hourly_rate: Option<Decimal>,
    /// Whether the employee is currently on the payroll.
    pub active: bool,
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = EngineError;

    fn try_from(record: EmployeeRecord) -> Result<Self, Self::Error> {
        let columns = [
            ("monthly_base", ContractKind::Fixed, record.monthly_base.is_some()),
            ("daily_rate", ContractKind::PerDiem, record.daily_rate.is_some()),
            ("hourly_rate", ContractKind::Hourly, record.hourly_rate.is_some()),
        ];
        if let Some((field, _, _)) = columns
            .iter()
            .find(|(_, kind, present)| *present && *kind != record.contract_kind)
        {
            return Err(EngineError::ConfigurationError {
                employee_id: record.id.clone(),
                field: field.to_string(),
                message: format!("not allowed on {} contracts", record.contract_kind),
            });
        }

        let missing = |field: &str| EngineError::ConfigurationError {
            employee_id: record.id.clone(),
            field: field.to_string(),
            message: format!("required for {} contracts", record.contract_kind),
        };

        let contract = match record.contract_kind {
            ContractKind::Fixed => Contract::Fixed {
                monthly_base: record.monthly_base.ok_or_else(|| missing("monthly_base"))?,
            },
            ContractKind::PerDiem => Contract::PerDiem {
                daily_rate: record.daily_rate.ok_or_else(|| missing("daily_rate"))?,
            },
            ContractKind::Hourly => Contract::Hourly {
                hourly_rate: record.hourly_rate.ok_or_else(|| missing("hourly_rate"))?,
            },
        };

        Ok(Employee {
            id: record.id,
            name: record.name,
            contract,
            active: record.active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: ContractKind) -> EmployeeRecord {
        EmployeeRecord {
            id: "emp_001".to_string(),
            name: "Awa Diop".to_string(),
            contract_kind: kind,
            monthly_base: None,
            daily_rate: None,
            hourly_rate: None,
            active: true,
        }
    }

    #[test]
    fn test_record_with_matching_rate_converts() {
        let mut row = record(ContractKind::PerDiem);
        row.daily_rate = Some(Decimal::new(25000, 0));

        let employee = Employee::try_from(row).unwrap();
        assert_eq!(
            employee.contract,
            Contract::PerDiem {
                daily_rate: Decimal::new(25000, 0)
            }
        );
        assert_eq!(employee.contract_kind(), ContractKind::PerDiem);
    }

    #[test]
    fn test_record_missing_required_rate_is_configuration_error() {
        let row = record(ContractKind::Fixed);

        match Employee::try_from(row) {
            Err(EngineError::ConfigurationError {
                employee_id, field, ..
            }) => {
                assert_eq!(employee_id, "emp_001");
                assert_eq!(field, "monthly_base");
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_record_with_stray_rate_is_rejected() {
        let mut row = record(ContractKind::Fixed);
        row.monthly_base = Some(Decimal::new(850000, 0));
        row.daily_rate = Some(Decimal::new(25000, 0));

        match Employee::try_from(row) {
            Err(EngineError::ConfigurationError { field, message, .. }) => {
                assert_eq!(field, "daily_rate");
                assert!(message.contains("not allowed"));
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_require_rate_rejects_zero_and_negative() {
        let mut employee = Employee {
            id: "emp_002".to_string(),
            name: "Moussa".to_string(),
            contract: Contract::Hourly {
                hourly_rate: Decimal::ZERO,
            },
            active: true,
        };
        assert!(employee.require_rate().is_err());

        employee.contract = Contract::Hourly {
            hourly_rate: Decimal::new(-1, 0),
        };
        assert!(employee.require_rate().is_err());

        employee.contract = Contract::Hourly {
            hourly_rate: Decimal::new(15000, 0),
        };
        assert_eq!(employee.require_rate().unwrap(), Decimal::new(15000, 0));
    }

    #[test]
    fn test_deserialize_tagged_contract() {
        let json = r#"{
            "id": "emp_003",
            "name": "Fatou",
            "contract": { "kind": "fixed", "monthly_base": "850000" }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(employee.active);
        assert_eq!(
            employee.contract,
            Contract::Fixed {
                monthly_base: Decimal::new(850000, 0)
            }
        );
    }

    #[test]
    fn test_contract_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ContractKind::PerDiem).unwrap(),
            "\"per_diem\""
        );
        assert_eq!(ContractKind::Hourly.to_string(), "hourly");
    }
}
