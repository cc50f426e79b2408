// Preparation of a single session's candles before they reach the band engine
use chrono::NaiveDate;
use shared::models::{Candle, MarketData, TimeFrame};

/// Sorts by timestamp and drops repeated bars, keeping the first of each timestamp.
pub fn normalize(candles: &mut Vec<Candle>) {
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
}

/// Bars whose local calendar date is `day`.
pub fn session_day(candles: &[Candle], day: NaiveDate) -> Vec<Candle> {
    candles
        .iter()
        .filter(|c| c.timestamp.date_naive() == day)
        .cloned()
        .collect()
}

/// Counts consecutive pairs whose spacing differs from the timeframe's nominal interval.
///
/// Feeds become gappy around halts and the open, so this is only reported, never enforced.
pub fn spacing_irregularities(candles: &[Candle], timeframe: TimeFrame) -> usize {
    let expected = timeframe.duration();
    candles
        .windows(2)
        .filter(|pair| pair[1].timestamp - pair[0].timestamp != expected)
        .count()
}

/// Builds a normalized single-day [`MarketData`]. If `day` is `None` the date of the first bar is used.
pub fn prepare_session(symbol: &str, timeframe: TimeFrame, mut candles: Vec<Candle>, day: Option<NaiveDate>) -> MarketData {
    normalize(&mut candles);
    let day = day.or_else(|| candles.first().map(|c| c.timestamp.date_naive()));
    let candles = match day {
        Some(day) => session_day(&candles, day),
        None => candles,
    };

    let irregular = spacing_irregularities(&candles, timeframe);
    if irregular > 0 {
        tracing::warn!(
            symbol,
            ?timeframe,
            irregular,
            "Candle spacing differs from the sampling interval"
        );
    }
    MarketData::new(symbol, timeframe, candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn candle(timestamp: DateTime<FixedOffset>, close: f64) -> Candle {
        Candle {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let t0 = at("2023-11-09T09:30:00-05:00");
        let mut candles = vec![
            candle(t0 + Duration::minutes(5), 2.0),
            candle(t0, 1.0),
            candle(t0 + Duration::minutes(5), 3.0),
        ];
        normalize(&mut candles);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, 1.0);
        assert_eq!(candles[1].timestamp, t0 + Duration::minutes(5));
    }

    #[test]
    fn test_spacing_irregularities() {
        let t0 = at("2023-11-09T09:30:00-05:00");
        let candles: Vec<Candle> = [0, 5, 10, 20, 25]
            .iter()
            .map(|m| candle(t0 + Duration::minutes(*m), 1.0))
            .collect();
        assert_eq!(spacing_irregularities(&candles, TimeFrame::Minute5), 1);
        assert_eq!(spacing_irregularities(&candles[..1], TimeFrame::Minute5), 0);
    }

    #[test]
    fn test_prepare_session_keeps_first_day() {
        let candles = vec![
            candle(at("2023-11-10T09:30:00-05:00"), 3.0),
            candle(at("2023-11-09T09:35:00-05:00"), 2.0),
            candle(at("2023-11-09T09:30:00-05:00"), 1.0),
        ];
        let data = prepare_session("^SPX", TimeFrame::Minute5, candles, None);
        assert_eq!(data.symbol, "^SPX");
        assert_eq!(data.candles.len(), 2);
        assert!(data.candles.iter().all(|c| c.timestamp.date_naive() == NaiveDate::from_ymd_opt(2023, 11, 9).unwrap()));
    }

    #[test]
    fn test_prepare_session_explicit_day() {
        let candles = vec![
            candle(at("2023-11-09T09:30:00-05:00"), 1.0),
            candle(at("2023-11-10T09:30:00-05:00"), 3.0),
        ];
        let day = NaiveDate::from_ymd_opt(2023, 11, 10);
        let data = prepare_session("^SPX", TimeFrame::Minute5, candles, day);
        assert_eq!(data.candles.len(), 1);
        assert_eq!(data.candles[0].close, 3.0);
    }

    #[test]
    fn test_prepare_session_empty() {
        let data = prepare_session("^SPX", TimeFrame::Minute5, Vec::new(), None);
        assert!(data.candles.is_empty());
    }
}
