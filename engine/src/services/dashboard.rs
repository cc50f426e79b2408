// Builds the render-ready views the dashboard shows: the annotated chart, the
// navigation calendar and the trade log. Stateless apart from the settings.
use serde::Serialize;
use shared::annotations::AnnotationSet;
use shared::models::{CalendarGrid, Candle, MarketData, TimeFrame, WindowedLevels};

use crate::bands::compute_price_bands;
use crate::calendar::build_month_grid;
use crate::config::EngineSettings;
use crate::data::trade_log::{sheet_export_url, TradeLog};
use crate::error::EngineError;

/// Base candle series plus the shapes drawn over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub candles: Vec<Candle>,
    pub levels: Option<WindowedLevels>,
    pub annotations: AnnotationSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub chart: ChartView,
    pub calendar: CalendarGrid,
    pub calendar_columns: [&'static str; 7],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_log: Option<TradeLog>,
    /// CSV export link of the journal sheet the trade log is kept in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_log_export_url: Option<String>,
}

impl DashboardSnapshot {
    /// Attaches the CSV export link for a spreadsheet edit link.
    pub fn with_trade_log_sheet(mut self, sheet_url: &str) -> anyhow::Result<Self> {
        let export_url = sheet_export_url(sheet_url)?;
        tracing::info!(export_url = %export_url, "Trade log sheet export link");
        self.trade_log_export_url = Some(export_url);
        Ok(self)
    }
}

pub struct DashboardService {
    settings: EngineSettings,
}

impl DashboardService {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(DashboardService { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn chart_view(&self, data: &MarketData) -> Result<ChartView, EngineError> {
        tracing::debug!(symbol = %data.symbol, candles = data.candles.len(), "Building chart view");

        if data.timeframe != self.settings.sampling_interval {
            tracing::warn!(
                data_timeframe = ?data.timeframe,
                configured = ?self.settings.sampling_interval,
                "Market data timeframe differs from the configured sampling interval"
            );
        }

        let bands = compute_price_bands(
            &data.candles,
            &self.settings.window,
            &self.settings.trade_setup,
            &self.settings.style,
        )?;

        Ok(ChartView {
            symbol: data.symbol.clone(),
            timeframe: data.timeframe,
            candles: data.candles.clone(),
            levels: bands.levels,
            annotations: bands.annotations,
        })
    }

    pub fn month_grid(&self, year: i32, month: u32) -> Result<CalendarGrid, EngineError> {
        build_month_grid(year, month)
    }

    pub fn snapshot(
        &self,
        data: &MarketData,
        year: i32,
        month: u32,
        trade_log: Option<TradeLog>,
    ) -> Result<DashboardSnapshot, EngineError> {
        let calendar = self.month_grid(year, month)?;
        let chart = self.chart_view(data)?;
        Ok(DashboardSnapshot {
            chart,
            calendar,
            calendar_columns: CalendarGrid::COLUMNS,
            trade_log,
            trade_log_export_url: None,
        })
    }
}
