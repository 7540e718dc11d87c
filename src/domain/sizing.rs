//! Position sizing: shares, scale-out target and trailing stop from capital,
//! entry and stop loss.

use crate::domain::error::StockproError;

/// Constants of the sizing formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingRules {
    /// Fraction of capital risked on a single trade.
    pub risk_fraction: f64,
    /// Target distance above entry, in multiples of the gap.
    pub reward_risk: f64,
    /// Flat charge deducted when locking in the half-position profit.
    pub fixed_charge: f64,
    /// Proportional charge on the round-trip transaction value.
    pub charge_rate: f64,
}

impl Default for SizingRules {
    fn default() -> Self {
        Self {
            risk_fraction: 0.01,
            reward_risk: 2.0,
            fixed_charge: 50.0,
            charge_rate: 0.0001,
        }
    }
}

/// Computed outputs for one trade setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionPlan {
    pub risk_amount: f64,
    pub gap: f64,
    pub shares: i64,
    pub investment: f64,
    pub target: f64,
    /// Half the share count; not truncated, so odd counts give a fractional half.
    pub half: f64,
    pub profit_on_half: f64,
    pub transaction_value: f64,
    pub trailing_stop: f64,
}

/// Size a long position.
///
/// Rejects the setup when the stop loss is not strictly below the entry price,
/// and when the share count is not finite or does not fit in an `i64`.
/// Share counts round half to even.
pub fn compute_position(
    capital: f64,
    entry: f64,
    stop_loss: f64,
    rules: &SizingRules,
) -> Result<PositionPlan, StockproError> {
    let gap = entry - stop_loss;
    if gap.is_nan() || gap <= 0.0 {
        return Err(StockproError::InvalidStopLoss { entry, stop_loss });
    }

    let risk_amount = rules.risk_fraction * capital;
    let ratio = (risk_amount / gap).round_ties_even();
    if !ratio.is_finite() || ratio < i64::MIN as f64 || ratio >= i64::MAX as f64 {
        return Err(StockproError::invalid_input(
            "shares",
            "position size is out of range",
        ));
    }
    let shares = ratio as i64;
    let investment = shares as f64 * entry;
    let target = entry + rules.reward_risk * gap;
    let half = shares as f64 / 2.0;

    let (profit_on_half, transaction_value, trailing_stop) = if half > 0.0 {
        let profit_on_half = (target - entry) * half;
        let transaction_value = shares as f64 * entry + half * target;
        let trailing_stop = (profit_on_half - rules.fixed_charge
            + rules.charge_rate * transaction_value)
            / half
            + stop_loss;
        (profit_on_half, transaction_value, trailing_stop)
    } else {
        (0.0, 0.0, 0.0)
    };

    Ok(PositionPlan {
        risk_amount,
        gap,
        shares,
        investment,
        target,
        half,
        profit_on_half,
        transaction_value,
        trailing_stop,
    })
}
