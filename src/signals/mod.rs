pub mod candles;
pub mod coverage;
pub mod gap;
pub mod selection;
pub mod sixthsense;

// Re-exports (public API)
pub use candles::{ltp_at_close, open_at_915};
pub use coverage::{PREMIUM_PCT, coverage_premium, premium_pct};
pub use gap::{bid_signal, compute_gap, price_gap_signal};
pub use selection::{display_dte, nearest_expiry_from, select_instrument};
pub use sixthsense::sixth_sense_rows;

/// Round to two decimals, the precision every signal is reported in.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
