pub mod app;
pub mod chart;
pub mod coingecko;
pub mod config;
pub mod input;
pub mod labels;
pub mod range;
pub mod series;
pub mod state;
pub mod style;
pub mod ui;
pub mod units;
