pub mod annotations;
pub mod models;
pub mod style;
pub mod utils;

// Models only: computation lives in the engine crate, rendering in whatever consumes the JSON.
