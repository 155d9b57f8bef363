pub mod api_server_axum;
pub mod app_config;
pub mod calendar;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod nse;
pub mod report;
pub mod signal_commands;
pub mod signals;
pub mod upstox;
pub mod utility;
pub mod yahoo;

// Re-exports for convenience
pub use app_config::{AppConfig, Mode};
pub use error::SignalError;
pub use models::{BidSignal, CoverageSignal, Direction, Instrument, PriceGapSignal, SignalReport, SixthSenseRow};
pub use report::MarketData;
