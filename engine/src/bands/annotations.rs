//! Turns a trading day of candles plus a reference trade into chart annotations.
//!
//! Output order is fixed: consolidation box, dotted body lines, solid range
//! lines, entry marker, risk box, reward box. Renderers draw in list order.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use shared::annotations::{Annotation, AnnotationRole, AnnotationSet, HorizontalLine, PointMarker, Rectangle};
use shared::models::{Candle, TradeSetup, TradingWindow, WindowedLevels};
use shared::style::{AnnotationStyle, BoxStyle, LineStyle};
use shared::utils::at_time_of_day;

use super::levels::{validate_candles, windowed_levels};
use crate::error::EngineError;

/// [`compute_annotations_styled`] with the default dark-chart style.
pub fn compute_annotations(
    candles: &[Candle],
    window: &TradingWindow,
    setup: &TradeSetup,
) -> Result<AnnotationSet, EngineError> {
    compute_annotations_styled(candles, window, setup, &AnnotationStyle::default())
}

/// Levels of one session together with the shapes derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBands {
    pub levels: Option<WindowedLevels>,
    pub annotations: AnnotationSet,
}

/// Annotation shapes only; see [`compute_price_bands`].
pub fn compute_annotations_styled(
    candles: &[Candle],
    window: &TradingWindow,
    setup: &TradeSetup,
    style: &AnnotationStyle,
) -> Result<AnnotationSet, EngineError> {
    compute_price_bands(candles, window, setup, style).map(|bands| bands.annotations)
}

/// Derives the windowed levels and annotation shapes for one session.
///
/// * No candles: no levels and an empty set.
/// * No candles inside `window`: no levels, only the entry marker.
/// * Otherwise the full set, with the level lines spanning the whole session
///   and the trade boxes running from `setup.entry_time` to the last candle.
///
/// Fails with [`EngineError::InvalidInput`] if any candle breaks the OHLC
/// ordering or timestamps do not strictly increase.
pub fn compute_price_bands(
    candles: &[Candle],
    window: &TradingWindow,
    setup: &TradeSetup,
    style: &AnnotationStyle,
) -> Result<PriceBands, EngineError> {
    validate_candles(candles)?;

    let mut set = AnnotationSet::new();
    let (first, last) = match (candles.first(), candles.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => {
            tracing::debug!("No candles supplied, returning an empty annotation set");
            return Ok(PriceBands {
                levels: None,
                annotations: set,
            });
        }
    };

    let levels = match windowed_levels(candles, window) {
        Some(levels) => levels,
        None => {
            tracing::warn!(
                window_start = %window.start,
                window_end = %window.end,
                candles = candles.len(),
                "No candles inside the trading window, emitting entry marker only"
            );
            set.push(entry_marker(setup, style));
            return Ok(PriceBands {
                levels: None,
                annotations: set,
            });
        }
    };
    tracing::debug!(?levels, "Computed windowed levels");

    // The consolidation band stops where the window ends, not at the session close.
    let window_end = at_time_of_day(&first, window.end).unwrap_or(last);
    set.push(rect(
        AnnotationRole::Consolidation,
        (first, window_end),
        (levels.min_close_open, levels.max_close_open),
        &style.consolidation,
    ));

    for (role, y, line) in level_lines(&levels, style) {
        set.push(Annotation::HorizontalLine(HorizontalLine {
            role,
            x0: first,
            x1: last,
            y,
            line: line.clone(),
        }));
    }

    set.push(entry_marker(setup, style));

    if setup.stop_loss == setup.entry_price {
        tracing::warn!(entry = setup.entry_price, "Stop loss equals entry price, risk box has zero height");
    }
    if setup.take_profit == setup.entry_price {
        tracing::warn!(entry = setup.entry_price, "Take profit equals entry price, reward box has zero height");
    }
    set.push(rect(
        AnnotationRole::Risk,
        (setup.entry_time, last),
        (setup.entry_price, setup.stop_loss),
        &style.risk,
    ));
    set.push(rect(
        AnnotationRole::Reward,
        (setup.entry_time, last),
        (setup.entry_price, setup.take_profit),
        &style.reward,
    ));

    Ok(PriceBands {
        levels: Some(levels),
        annotations: set,
    })
}

fn level_lines<'a>(levels: &WindowedLevels, style: &'a AnnotationStyle) -> [(AnnotationRole, f64, &'a LineStyle); 4] {
    [
        (AnnotationRole::BodyHigh, levels.max_close_open, &style.body_line),
        (AnnotationRole::BodyLow, levels.min_close_open, &style.body_line),
        (AnnotationRole::RangeHigh, levels.max_high_low, &style.range_line),
        (AnnotationRole::RangeLow, levels.min_high_low, &style.range_line),
    ]
}

fn rect(
    role: AnnotationRole,
    (x0, x1): (DateTime<FixedOffset>, DateTime<FixedOffset>),
    (y0, y1): (f64, f64),
    style: &BoxStyle,
) -> Annotation {
    Annotation::Rectangle(Rectangle {
        role,
        x0,
        x1,
        y0,
        y1,
        fill_color: style.fill_color.clone(),
        opacity: style.opacity,
        layer: style.layer,
        border: style.border.clone(),
    })
}

fn entry_marker(setup: &TradeSetup, style: &AnnotationStyle) -> Annotation {
    Annotation::PointMarker(PointMarker {
        role: AnnotationRole::Entry,
        x: setup.entry_time,
        y: setup.entry_price,
        color: style.entry_marker.color.clone(),
        size: style.entry_marker.size,
        label: style.entry_marker.label.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};
    use shared::style::{Layer, LineDash};

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    // 5-minute bars from 09:30 to 11:55 local, drifting down through the window.
    fn session() -> Vec<Candle> {
        let open = ts("2023-11-09T09:30:00-05:00");
        (0..30)
            .map(|i| {
                let mid = 4400.0 - i as f64;
                Candle {
                    timestamp: open + Duration::minutes(5 * i),
                    open: mid + 0.5,
                    high: mid + 2.0,
                    low: mid - 2.0,
                    close: mid - 0.5,
                }
            })
            .collect()
    }

    fn window() -> TradingWindow {
        TradingWindow::new(
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 25, 0).unwrap(),
        )
    }

    fn setup() -> TradeSetup {
        TradeSetup {
            entry_time: ts("2023-11-09T10:50:00-05:00"),
            entry_price: 4391.5,
            stop_loss: 4399.5,
            take_profit: 4368.0,
        }
    }

    fn roles(set: &AnnotationSet) -> Vec<AnnotationRole> {
        set.iter().map(Annotation::role).collect()
    }

    #[test]
    fn test_full_set_in_render_order() {
        let set = compute_annotations(&session(), &window(), &setup()).unwrap();
        assert_eq!(
            roles(&set),
            vec![
                AnnotationRole::Consolidation,
                AnnotationRole::BodyHigh,
                AnnotationRole::BodyLow,
                AnnotationRole::RangeHigh,
                AnnotationRole::RangeLow,
                AnnotationRole::Entry,
                AnnotationRole::Risk,
                AnnotationRole::Reward,
            ]
        );
    }

    #[test]
    fn test_levels_feed_line_heights() {
        let set = compute_annotations(&session(), &window(), &setup()).unwrap();
        // Window covers bars 0..=10 (09:30..10:20): mid runs 4400 down to 4390.
        assert_eq!(set.line(AnnotationRole::BodyHigh).unwrap().y, 4400.5);
        assert_eq!(set.line(AnnotationRole::BodyLow).unwrap().y, 4389.5);
        assert_eq!(set.line(AnnotationRole::RangeHigh).unwrap().y, 4402.0);
        assert_eq!(set.line(AnnotationRole::RangeLow).unwrap().y, 4388.0);
    }

    #[test]
    fn test_geometry_extents() {
        let candles = session();
        let set = compute_annotations(&candles, &window(), &setup()).unwrap();
        let first = candles.first().unwrap().timestamp;
        let last = candles.last().unwrap().timestamp;

        let high = set.line(AnnotationRole::RangeHigh).unwrap();
        assert_eq!((high.x0, high.x1), (first, last));
        assert_eq!(high.line.dash, LineDash::Solid);
        assert_eq!(set.line(AnnotationRole::BodyLow).unwrap().line.dash, LineDash::Dot);

        let consolidation = set.rectangle(AnnotationRole::Consolidation).unwrap();
        assert_eq!(consolidation.x0, first);
        assert_eq!(consolidation.x1, ts("2023-11-09T10:25:00-05:00"));
        assert_eq!((consolidation.y0, consolidation.y1), (4389.5, 4400.5));
        assert_eq!(consolidation.layer, Layer::Below);

        let risk = set.rectangle(AnnotationRole::Risk).unwrap();
        assert_eq!((risk.x0, risk.x1), (setup().entry_time, last));
        assert_eq!((risk.y0, risk.y1), (4391.5, 4399.5));
        assert_eq!(risk.fill_color, "red");

        let reward = set.rectangle(AnnotationRole::Reward).unwrap();
        assert_eq!((reward.y0, reward.y1), (4391.5, 4368.0));
        assert_eq!(reward.fill_color, "green");

        let marker = set.marker().unwrap();
        assert_eq!((marker.x, marker.y), (setup().entry_time, 4391.5));
    }

    #[test]
    fn test_empty_candles_give_empty_set() {
        let set = compute_annotations(&[], &window(), &setup()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_empty_window_keeps_only_marker() {
        let afternoon = TradingWindow::new(
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        );
        let set = compute_annotations(&session(), &afternoon, &setup()).unwrap();
        assert_eq!(roles(&set), vec![AnnotationRole::Entry]);
    }

    #[test]
    fn test_degenerate_risk_box_is_accepted() {
        let mut flat = setup();
        flat.stop_loss = flat.entry_price;
        let set = compute_annotations(&session(), &window(), &flat).unwrap();
        let risk = set.rectangle(AnnotationRole::Risk).unwrap();
        assert_eq!(risk.y0, risk.y1);
        assert!(risk.is_degenerate());
        assert_eq!(risk.height(), 0.0);
        assert!(!set.rectangle(AnnotationRole::Reward).unwrap().is_degenerate());
    }

    #[test]
    fn test_deterministic_output() {
        let a = compute_annotations(&session(), &window(), &setup()).unwrap();
        let b = compute_annotations(&session(), &window(), &setup()).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_malformed_candle_is_rejected() {
        let mut candles = session();
        candles[12].low = candles[12].high + 1.0;
        let err = compute_annotations(&candles, &window(), &setup()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_custom_style_is_applied() {
        let mut style = AnnotationStyle::default();
        style.risk.fill_color = "#ef5350".to_string();
        style.entry_marker.size = 14;
        style.reward.layer = Layer::Above;
        let set = compute_annotations_styled(&session(), &window(), &setup(), &style).unwrap();
        assert_eq!(set.rectangle(AnnotationRole::Risk).unwrap().fill_color, "#ef5350");
        assert_eq!(set.rectangle(AnnotationRole::Risk).unwrap().layer, Layer::Below);
        assert_eq!(set.rectangle(AnnotationRole::Reward).unwrap().layer, Layer::Above);
        assert_eq!(set.marker().unwrap().size, 14);
    }

    #[test]
    fn test_price_bands_pair_levels_with_shapes() {
        let candles = session();
        let bands = compute_price_bands(&candles, &window(), &setup(), &AnnotationStyle::default()).unwrap();
        let levels = bands.levels.unwrap();
        assert_eq!(Some(levels), windowed_levels(&candles, &window()));
        assert_eq!(bands.annotations, compute_annotations(&candles, &window(), &setup()).unwrap());
        assert_eq!(bands.annotations.line(AnnotationRole::RangeLow).unwrap().y, levels.min_high_low);

        let afternoon = TradingWindow::new(
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        );
        let bands = compute_price_bands(&candles, &afternoon, &setup(), &AnnotationStyle::default()).unwrap();
        assert!(bands.levels.is_none());
        assert_eq!(bands.annotations.len(), 1);
    }
}
