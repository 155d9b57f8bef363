use std::fmt;

/// Failures that stop a signal report from being built at all.
///
/// Individual upstream misses (a missing candle, a Yahoo timeout) do not end up
/// here; they degrade the affected signal to "not available" instead.
#[derive(Debug)]
pub enum SignalError {
    MissingAccessToken,
    NoValidExpiry,
    Upstream(String),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalError::MissingAccessToken => write!(f, "No access token found"),
            SignalError::NoValidExpiry => write!(f, "No valid expiry found"),
            SignalError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
        }
    }
}

impl std::error::Error for SignalError {}

impl From<anyhow::Error> for SignalError {
    fn from(err: anyhow::Error) -> Self {
        SignalError::Upstream(format!("{:#}", err))
    }
}
