// Engine settings: the trading window, the reference trade and chart styling.
// Loaded from a JSON file; `Default` mirrors config/default.json.
use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};
use shared::models::{TimeFrame, TradeSetup, TradingWindow};
use shared::style::AnnotationStyle;
use std::path::Path;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub symbol: String,
    pub sampling_interval: TimeFrame,
    pub window: TradingWindow,
    pub trade_setup: TradeSetup,
    #[serde(default)]
    pub style: AnnotationStyle,
}

impl Default for EngineSettings {
    fn default() -> Self {
        // Regular-session open through the first hour, and the 9 Nov 2023 short on the index.
        let entry_time: DateTime<FixedOffset> = DateTime::parse_from_rfc3339("2023-11-09T10:50:00-05:00")
            .expect("entry timestamp literal is valid RFC 3339");

        EngineSettings {
            symbol: "^SPX".to_string(),
            sampling_interval: TimeFrame::Minute5,
            window: TradingWindow::new(
                NaiveTime::from_hms_opt(9, 30, 0).expect("09:30 is a valid time"),
                NaiveTime::from_hms_opt(10, 25, 0).expect("10:25 is a valid time"),
            ),
            trade_setup: TradeSetup {
                entry_time,
                entry_price: 4391.5,
                stop_loss: 4399.5,
                take_profit: 4368.0,
            },
            style: AnnotationStyle::default(),
        }
    }
}

impl EngineSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading engine settings");
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), symbol = %settings.symbol, "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.window.start >= self.window.end {
            return Err(EngineError::ConfigError(format!(
                "window start {} must be before window end {}",
                self.window.start, self.window.end
            )));
        }
        let setup = &self.trade_setup;
        for (name, value) in [
            ("entry_price", setup.entry_price),
            ("stop_loss", setup.stop_loss),
            ("take_profit", setup.take_profit),
        ] {
            if !value.is_finite() {
                return Err(EngineError::ConfigError(format!("trade_setup.{} must be finite, got {}", name, value)));
            }
        }
        Ok(())
    }
}
