//! Trade setup entered by the user.

use chrono::NaiveDate;
use std::fmt;

/// The four 50-day SMA trend checkpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendChecks {
    pub nifty: bool,
    pub sensex: bool,
    pub industry: bool,
    pub stock: bool,
}

impl TrendChecks {
    pub fn all() -> Self {
        Self {
            nifty: true,
            sensex: true,
            industry: true,
            stock: true,
        }
    }

    pub fn status(&self) -> CheckStatus {
        if self.nifty && self.sensex && self.industry && self.stock {
            CheckStatus::Passed
        } else {
            CheckStatus::Failed
        }
    }
}

/// Pass/fail label recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Passed => "Passed",
            CheckStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Passed" => Some(CheckStatus::Passed),
            "Failed" => Some(CheckStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeInput {
    pub stock: String,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub trade_date: NaiveDate,
    pub checks: TrendChecks,
}

impl TradeInput {
    /// Builds a trade, upper-casing and trimming the ticker.
    pub fn new(
        stock: &str,
        entry_price: f64,
        stop_loss: f64,
        trade_date: NaiveDate,
        checks: TrendChecks,
    ) -> Self {
        Self {
            stock: stock.trim().to_uppercase(),
            entry_price,
            stop_loss,
            trade_date,
            checks,
        }
    }
}
