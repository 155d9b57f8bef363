use super::round2;
use crate::models::{CoverageEntry, Instrument};

/// Premium percentage of spot by days to expiry (0..=4).
pub const PREMIUM_PCT: [(i64, f64); 5] = [(0, 0.54), (1, 0.81), (2, 1.05), (3, 1.20), (4, 1.38)];

/// Table lookup; any DTE outside the table uses the expiry-day rate.
pub fn premium_pct(dte: i64) -> f64 {
    PREMIUM_PCT
        .iter()
        .find(|(d, _)| *d == dte)
        .map(|(_, pct)| *pct)
        .unwrap_or(PREMIUM_PCT[0].1)
}

pub fn coverage_premium(instrument: Instrument, dte: i64, spot: f64) -> CoverageEntry {
    let pct = premium_pct(dte);
    CoverageEntry {
        name: instrument,
        dte,
        spot,
        pct,
        premium: round2(spot * pct / 100.0),
    }
}
