use std::time::Duration;

// -----------------------------------------------
// UPSTOX API ENDPOINTS
// -----------------------------------------------
pub const UPSTOX_BASE_URL: &str = "https://api.upstox.com";

pub fn upstox_option_contract_url(base: &str, instrument_key: &str) -> String {
    format!(
        "{}/v2/option/contract?instrument_key={}",
        base,
        urlencoding::encode(instrument_key)
    )
}

pub fn upstox_intraday_candles_url(base: &str, instrument_key: &str) -> String {
    format!(
        "{}/v2/historical-candle/intraday/{}/1minute",
        base,
        urlencoding::encode(instrument_key)
    )
}

/// Historical endpoint takes `to_date` before `from_date`; both are the same day here.
pub fn upstox_historical_candles_url(base: &str, instrument_key: &str, date: &str) -> String {
    format!(
        "{}/v2/historical-candle/{}/1minute/{}/{}",
        base,
        urlencoding::encode(instrument_key),
        date,
        date
    )
}

// -----------------------------------------------
// YAHOO FINANCE ENDPOINTS
// -----------------------------------------------
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

pub fn yahoo_chart_url(base: &str, ticker: &str) -> String {
    format!("{}/v8/finance/chart/{}", base, urlencoding::encode(ticker))
}

// -----------------------------------------------
// NSE ENDPOINTS
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

pub fn nse_index_quote_url(base: &str, index: &str) -> String {
    format!(
        "{}/api/equity-stockIndices?index={}",
        base,
        urlencoding::encode(index)
    )
}

// -----------------------------------------------
// BID SWEEP INDICES (display name, upstox key)
// -----------------------------------------------
pub const BID_SWEEP_INDICES: &[(&str, &str)] = &[
    ("NIFTY 50", "NSE_INDEX|Nifty 50"),
    ("BANK NIFTY", "NSE_INDEX|Nifty Bank"),
    ("SENSEX", "BSE_INDEX|SENSEX"),
];

// -----------------------------------------------
// SIGNAL PARAMETERS
// -----------------------------------------------
pub const SIXTH_SENSE_DAYS: usize = 5;
/// Extra calendar days fetched so weekends still leave enough bars.
pub const SIXTH_SENSE_LOOKBACK_PADDING: i64 = 10;

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// SESSION WARMUP (NSE only)
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 200;

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 100;
pub const RETRY_FACTOR: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 3;
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// -----------------------------------------------
// SERVER
// -----------------------------------------------
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const EXPIRY_CACHE_DURATION: Duration = Duration::from_secs(300); // 5 minutes

// -----------------------------------------------
// HTTP HEADERS
// -----------------------------------------------
pub const HEADER_ACCEPT_JSON: &str = "application/json";
pub const HEADER_ACCEPT_HTML: &str = "text/html";
pub const HEADER_NSE_REFERER: &str = "https://www.nseindia.com/";
pub const HEADER_X_REQUESTED_WITH: &str = "XMLHttpRequest";

// -----------------------------------------------
// CREDENTIALS
// -----------------------------------------------
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const ACCESS_TOKEN_ENV: &str = "UPSTOX_ACCESS_TOKEN";
