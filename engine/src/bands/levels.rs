// Windowed support/resistance levels
use shared::models::{Candle, TradingWindow, WindowedLevels};

use crate::error::EngineError;

/// Checks every candle against the OHLC invariants and that timestamps strictly increase.
///
/// The first offending row is reported by index; nothing is dropped or repaired.
pub fn validate_candles(candles: &[Candle]) -> Result<(), EngineError> {
    for (idx, candle) in candles.iter().enumerate() {
        let fields = [candle.open, candle.high, candle.low, candle.close];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::invalid_input(format!(
                "candle {} at {} has a non-finite price",
                idx, candle.timestamp
            )));
        }
        if !(candle.low <= candle.body_low() && candle.body_high() <= candle.high) {
            return Err(EngineError::invalid_input(format!(
                "candle {} at {} violates low <= open/close <= high (o={} h={} l={} c={})",
                idx, candle.timestamp, candle.open, candle.high, candle.low, candle.close
            )));
        }
    }

    for (idx, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(EngineError::invalid_input(format!(
                "candle {} at {} is not after the previous candle at {}",
                idx + 1,
                pair[1].timestamp,
                pair[0].timestamp
            )));
        }
    }
    Ok(())
}

/// Aggregates the four level extremes over `candles`. Returns `None` when there is nothing to aggregate.
pub fn compute_levels<'a, I>(candles: I) -> Option<WindowedLevels>
where
    I: IntoIterator<Item = &'a Candle>,
{
    candles.into_iter().fold(None, |acc, c| {
        Some(match acc {
            None => WindowedLevels {
                max_high_low: c.range_high(),
                min_high_low: c.range_low(),
                max_close_open: c.body_high(),
                min_close_open: c.body_low(),
            },
            Some(levels) => WindowedLevels {
                max_high_low: levels.max_high_low.max(c.range_high()),
                min_high_low: levels.min_high_low.min(c.range_low()),
                max_close_open: levels.max_close_open.max(c.body_high()),
                min_close_open: levels.min_close_open.min(c.body_low()),
            },
        })
    })
}

/// Levels of the candles whose local time of day falls inside `window`.
pub fn windowed_levels(candles: &[Candle], window: &TradingWindow) -> Option<WindowedLevels> {
    compute_levels(candles.iter().filter(|c| window.contains(&c.timestamp)))
}
