//! Range checks on wizard input beyond the stop-loss rule.
//!
//! Off by default: the sizing formula itself only rejects a stop loss at or
//! above entry. Strict mode adds the checks below.

use crate::domain::error::StockproError;
use crate::domain::trade::TradeInput;

pub fn validate_capital(capital: f64, strict: bool) -> Result<(), StockproError> {
    if strict && !(capital > 0.0) {
        return Err(StockproError::invalid_input("capital", "must be positive"));
    }
    Ok(())
}

pub fn validate_trade_input(
    capital: f64,
    trade: &TradeInput,
    strict: bool,
) -> Result<(), StockproError> {
    if !strict {
        return Ok(());
    }
    validate_capital(capital, strict)?;
    if trade.stock.trim().is_empty() {
        return Err(StockproError::invalid_input("stock", "ticker is required"));
    }
    if !(trade.entry_price > 0.0) {
        return Err(StockproError::invalid_input("entry price", "must be positive"));
    }
    if !(trade.stop_loss >= 0.0) {
        return Err(StockproError::invalid_input("stop loss", "must be non-negative"));
    }
    Ok(())
}
