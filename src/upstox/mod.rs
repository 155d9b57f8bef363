pub mod models;
pub mod upstox_client;

pub use models::{CandleData, OptionContract, UpstoxResponse};
pub use upstox_client::UpstoxClient;
