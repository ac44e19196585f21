//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{CalendarPolicy, PayrollConfig, PayrollRules};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── payroll.yaml   # Hour standards, overtime, deductions
/// └── calendar.yaml  # Weekend days, holidays, late threshold, payment policy
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// println!("Standard month: {} hours", loader.config().rules.hours.standard_monthly_hours);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if a file is missing, is not valid YAML, or holds
    /// values the engine cannot calculate with.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let rules_path = path.join("payroll.yaml");
        let rules = Self::load_yaml::<PayrollRules>(&rules_path)?;
        Self::validate_rules(&rules, &rules_path)?;

        let policy_path = path.join("calendar.yaml");
        let policy = Self::load_yaml::<CalendarPolicy>(&policy_path)?;
        if policy.receipt_prefix.trim().is_empty() {
            return Err(EngineError::ConfigParseError {
                path: policy_path.display().to_string(),
                message: "receipt_prefix must not be empty".to_string(),
            });
        }

        let config = PayrollConfig { rules, policy };
        tracing::debug!(
            path = %path.display(),
            payment_window = ?config.policy.payment_window,
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_rules(rules: &PayrollRules, path: &Path) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if rules.hours.standard_monthly_hours <= Decimal::ZERO {
            return Err(invalid("hours.standard_monthly_hours must be positive"));
        }
        if rules.hours.standard_daily_hours <= Decimal::ZERO {
            return Err(invalid("hours.standard_daily_hours must be positive"));
        }
        if rules.overtime.daily_threshold_hours < Decimal::ZERO {
            return Err(invalid("overtime.daily_threshold_hours must not be negative"));
        }
        if rules.overtime.multiplier < Decimal::ONE {
            return Err(invalid("overtime.multiplier must be at least 1"));
        }
        if rules.deductions.flat_absence_deduction < Decimal::ZERO {
            return Err(invalid("deductions.flat_absence_deduction must not be negative"));
        }
        let rate = rules.deductions.per_diem_rate;
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(invalid("deductions.per_diem_rate must be in [0, 1)"));
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}
