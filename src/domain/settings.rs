//! Runtime settings assembled from the INI configuration.

use crate::domain::sizing::SizingRules;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::time::Duration;

/// Defaults offered by the wizard prompts.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardDefaults {
    pub capital: f64,
    pub stock: String,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub analyzing: Duration,
}

impl Default for WizardDefaults {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            stock: "RELIANCE".to_string(),
            entry_price: 2500.0,
            stop_loss: 2450.0,
            analyzing: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sizing: SizingRules,
    pub wizard: WizardDefaults,
    pub journal_output: PathBuf,
    pub strict_validation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sizing: SizingRules::default(),
            wizard: WizardDefaults::default(),
            journal_output: PathBuf::from("trade_history.csv"),
            strict_validation: false,
        }
    }
}

impl Settings {
    /// Reads every key, falling back to the built-in default when absent.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let base = Settings::default();
        let sizing = SizingRules {
            risk_fraction: config.get_double("sizing", "risk_fraction", base.sizing.risk_fraction),
            reward_risk: config.get_double("sizing", "reward_risk", base.sizing.reward_risk),
            fixed_charge: config.get_double("sizing", "fixed_charge", base.sizing.fixed_charge),
            charge_rate: config.get_double("sizing", "charge_rate", base.sizing.charge_rate),
        };

        let wizard = WizardDefaults {
            capital: config.get_double("wizard", "default_capital", base.wizard.capital),
            stock: config
                .get_ticker("wizard", "default_stock")
                .unwrap_or(base.wizard.stock),
            entry_price: config.get_double("wizard", "default_entry", base.wizard.entry_price),
            stop_loss: config.get_double("wizard", "default_stop_loss", base.wizard.stop_loss),
            analyzing: config.get_millis("wizard", "analyzing_ms", base.wizard.analyzing),
        };

        Self {
            sizing,
            wizard,
            journal_output: config
                .get_path("journal", "output")
                .unwrap_or(base.journal_output),
            strict_validation: config.get_bool("validation", "strict", base.strict_validation),
        }
    }
}
