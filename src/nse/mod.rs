pub mod models;
pub mod nse_client;

pub use models::{IndexConstituent, IndexQuote};
pub use nse_client::NSEClient;

/// NSE's name for the NIFTY index in its public API.
pub const NIFTY_INDEX_NAME: &str = "NIFTY 50";
