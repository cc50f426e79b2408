use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// One OHLC bar, stamped in the exchange's local offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Upper edge of the candle body, `max(open, close)`.
    pub fn body_high(&self) -> f64 {
        self.close.max(self.open)
    }

    /// Lower edge of the candle body, `min(open, close)`.
    pub fn body_low(&self) -> f64 {
        self.close.min(self.open)
    }

    // pointwise max/min of the high/low pair
    pub fn range_high(&self) -> f64 {
        self.high.max(self.low)
    }

    pub fn range_low(&self) -> f64 {
        self.high.min(self.low)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub candles: Vec<Candle>,
}

impl MarketData {
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            candles,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Day1,
}

impl TimeFrame {
    /// Nominal spacing between two consecutive bars.
    pub fn duration(&self) -> Duration {
        match self {
            TimeFrame::Minute1 => Duration::minutes(1),
            TimeFrame::Minute5 => Duration::minutes(5),
            TimeFrame::Minute15 => Duration::minutes(15),
            TimeFrame::Minute30 => Duration::minutes(30),
            TimeFrame::Hour1 => Duration::hours(1),
            TimeFrame::Day1 => Duration::days(1),
        }
    }
}

/// The reference trade drawn on top of the chart. Values are supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry_time: DateTime<FixedOffset>,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Half-open time-of-day interval `[start, end)` used to derive the comparison levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TradingWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Compares the wall-clock time in the timestamp's own offset.
    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        let time = timestamp.time();
        time >= self.start && time < self.end
    }
}

/// Extremes of the candles that fall inside a [`TradingWindow`].
///
/// `min_high_low <= min_close_open <= max_close_open <= max_high_low` holds for
/// any non-empty set of well-formed candles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowedLevels {
    pub max_high_low: f64,
    pub min_high_low: f64,
    pub max_close_open: f64,
    pub min_close_open: f64,
}

/// A month laid out Monday-first, one row per week. Days outside the month hold [`CalendarGrid::SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[u32; 7]>,
}

impl CalendarGrid {
    pub const COLUMNS: [&'static str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    pub const SENTINEL: u32 = 0;

    pub fn row_count(&self) -> usize {
        self.weeks.len()
    }

    /// Number of cells that carry a real day of the month.
    pub fn day_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|week| week.iter())
            .filter(|&&day| day != Self::SENTINEL)
            .count()
    }

    /// Fixed-width text table, blanks where the sentinel sits.
    pub fn render_text(&self) -> String {
        let mut out = Self::COLUMNS.join(" ");
        for week in &self.weeks {
            out.push('\n');
            let cells: Vec<String> = week
                .iter()
                .map(|&day| {
                    if day == Self::SENTINEL {
                        "  ".to_string()
                    } else {
                        format!("{:>2}", day)
                    }
                })
                .collect();
            out.push_str(cells.join(" ").trim_end());
        }
        out
    }
}
