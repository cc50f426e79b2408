// Colors and fills for every annotation role. Plain CSS color strings so any renderer can use them.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dot,
}

/// Whether a shape is drawn under or over the candle trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    #[default]
    Below,
    Above,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub dash: LineDash,
}

impl LineStyle {
    pub fn new(color: &str, dash: LineDash) -> Self {
        Self {
            color: color.to_string(),
            dash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub fill_color: String,
    pub opacity: f64,
    pub border: LineStyle,
    #[serde(default)]
    pub layer: Layer,
}

impl BoxStyle {
    fn translucent(color: &str, dash: LineDash) -> Self {
        Self {
            fill_color: color.to_string(),
            opacity: 0.3,
            border: LineStyle::new(color, dash),
            layer: Layer::Below,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    pub size: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    /// Dotted lines at the window's body extremes (close/open).
    pub body_line: LineStyle,
    /// Solid lines at the window's range extremes (high/low).
    pub range_line: LineStyle,
    pub consolidation: BoxStyle,
    pub risk: BoxStyle,
    pub reward: BoxStyle,
    pub entry_marker: MarkerStyle,
}

impl Default for AnnotationStyle {
    // Dark chart background: white and red lines, grey consolidation band.
    fn default() -> Self {
        Self {
            body_line: LineStyle::new("red", LineDash::Dot),
            range_line: LineStyle::new("white", LineDash::Solid),
            consolidation: BoxStyle::translucent("lightgrey", LineDash::Dot),
            risk: BoxStyle::translucent("red", LineDash::Solid),
            reward: BoxStyle::translucent("green", LineDash::Solid),
            entry_marker: MarkerStyle {
                color: "white".to_string(),
                size: 10,
                label: "Entry Point".to_string(),
            },
        }
    }
}
