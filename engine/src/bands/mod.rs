// Intraday price bands: windowed levels and the chart annotations derived from them.
pub mod annotations;
pub mod levels;

pub use annotations::{compute_annotations, compute_annotations_styled, compute_price_bands, PriceBands};
pub use levels::{compute_levels, validate_candles, windowed_levels};
