// Trading-journal engine: price bands for the reference trade chart, the
// navigation calendar, and the loaders/settings that feed them.

pub mod bands;
pub mod calendar;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use bands::{compute_annotations, compute_annotations_styled, compute_price_bands, PriceBands};
pub use calendar::build_month_grid;
pub use error::EngineError;
