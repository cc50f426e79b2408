// Services compose loaders, the band engine and the calendar for the presentation layer.
pub mod dashboard;

pub use dashboard::{ChartView, DashboardService, DashboardSnapshot};
