//! Custom widgets for the dashboard

pub mod sparkline;

pub use sparkline::TemperatureSparkline;
