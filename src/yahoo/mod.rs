pub mod models;
pub mod yahoo_client;

pub use models::{ChartResponse, ChartResult};
pub use yahoo_client::YahooClient;
