//! Configuration validation.
//!
//! Checks the `[sizing]` and `[journal]` sections before any trade is sized.

use crate::domain::error::StockproError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockproError> {
    validate_risk_fraction(config)?;
    validate_reward_risk(config)?;
    validate_charges(config)?;
    validate_journal_output(config)?;
    Ok(())
}

fn validate_risk_fraction(config: &dyn ConfigPort) -> Result<(), StockproError> {
    let value = config.get_double("sizing", "risk_fraction", 0.01);
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(StockproError::ConfigInvalid {
            section: "sizing".to_string(),
            key: "risk_fraction".to_string(),
            reason: "risk_fraction must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_reward_risk(config: &dyn ConfigPort) -> Result<(), StockproError> {
    let value = config.get_double("sizing", "reward_risk", 2.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(StockproError::ConfigInvalid {
            section: "sizing".to_string(),
            key: "reward_risk".to_string(),
            reason: "reward_risk must be a positive finite number".to_string(),
        });
    }
    Ok(())
}

fn validate_charges(config: &dyn ConfigPort) -> Result<(), StockproError> {
    let fixed = config.get_double("sizing", "fixed_charge", 50.0);
    if !fixed.is_finite() || fixed < 0.0 {
        return Err(StockproError::ConfigInvalid {
            section: "sizing".to_string(),
            key: "fixed_charge".to_string(),
            reason: "fixed_charge must be a non-negative finite number".to_string(),
        });
    }
    let rate = config.get_double("sizing", "charge_rate", 0.0001);
    if !rate.is_finite() || rate < 0.0 {
        return Err(StockproError::ConfigInvalid {
            section: "sizing".to_string(),
            key: "charge_rate".to_string(),
            reason: "charge_rate must be a non-negative finite number".to_string(),
        });
    }
    Ok(())
}

fn validate_journal_output(config: &dyn ConfigPort) -> Result<(), StockproError> {
    match config.get_string("journal", "output") {
        Some(s) if s.trim().is_empty() => Err(StockproError::ConfigMissing {
            section: "journal".to_string(),
            key: "output".to_string(),
        }),
        _ => Ok(()),
    }
}
