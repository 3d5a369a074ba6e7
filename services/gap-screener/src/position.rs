//! Position sizing for gap trades
//!
//! The trade fades the gap: the target sits `profit_capture_ratio` of the way
//! back toward the previous close and the stop is the same distance on the
//! other side of the open. Share count is whatever the risk budget affords at
//! that stop distance.

use crate::config::RiskConfig;
use crate::types::Position;

/// Round to cents, half away from zero (`f64::round`).
///
/// Operates on the binary value, so 1.005 (stored as 1.00499...) rounds to 1.0.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sizes positions against a fixed risk budget
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionCalculator {
    risk: RiskConfig,
}

impl PositionCalculator {
    pub fn new(risk: RiskConfig) -> Self {
        Self { risk }
    }

    pub fn risk(&self) -> &RiskConfig {
        &self.risk
    }

    /// Size a position for a candidate that gapped `gap_percent` and opened at `opening_price`.
    ///
    /// When the stop distance is zero or not finite (no gap, a gap of exactly
    /// -100%, NaN input) the position is flat: zero shares, zero expected
    /// profit, and any non-finite stop/target collapses to the entry price.
    /// An opening price that is not a finite number of cents has nothing to
    /// size against and yields an all-zero position.
    pub fn calculate(&self, gap_percent: f64, opening_price: f64) -> Position {
        let entry_price = round2(opening_price);
        if !entry_price.is_finite() {
            return Position::default();
        }

        let closing_price = opening_price / (1.0 + gap_percent);
        let gap_value = closing_price - opening_price;
        let profit_from_gap = self.risk.profit_capture_ratio * gap_value;

        let stop_loss = opening_price - profit_from_gap;
        let take_profit = opening_price + profit_from_gap;

        let risk_per_share = (stop_loss - opening_price).abs();
        let share_count = if risk_per_share.is_finite() && risk_per_share > 0.0 {
            // `as` saturates, so a vanishingly small stop distance cannot wrap
            (self.risk.max_loss_per_trade() / risk_per_share).floor() as u64
        } else {
            0
        };

        let expected_profit = if share_count == 0 {
            0.0
        } else {
            round2((opening_price - take_profit).abs() * share_count as f64)
        };

        let or_entry = |price: f64| {
            if price.is_finite() {
                round2(price)
            } else {
                entry_price
            }
        };

        Position {
            entry_price,
            share_count,
            take_profit_price: or_entry(take_profit),
            stop_loss_price: or_entry(stop_loss),
            expected_profit: round2(expected_profit),
        }
    }
}
