use super::round2;
use crate::calendar::BidWindow;
use crate::models::{BidSignal, Direction, Gap, PriceGapSignal};
use chrono::NaiveDate;

/// Gap of `price` over `base`, in points and percent of `base`.
///
/// The percentage is taken from the already-rounded point gap, which is what
/// the printed numbers show. A missing or non-positive base yields no gap.
pub fn compute_gap(base: Option<f64>, price: Option<f64>) -> Option<Gap> {
    let (base, price) = (base?, price?);
    if base <= 0.0 || price <= 0.0 {
        return None;
    }

    let gap = round2(price - base);
    Some(Gap {
        gap,
        gap_pct: round2(gap / base * 100.0),
        direction: Direction::of(gap),
    })
}

/// BID: previous session's 3:30 PM LTP vs today's 9:15 AM open.
pub fn bid_signal(window: &BidWindow, ltp_330: Option<f64>, open_915: Option<f64>) -> BidSignal {
    let gap = compute_gap(ltp_330, open_915);
    BidSignal {
        ltp_330,
        open_915,
        gap: gap.map(|g| g.gap),
        gap_pct: gap.map(|g| g.gap_pct),
        direction: gap.map(|g| g.direction),
        prev_date: window.prev_day,
        today_date: window.today,
        market_open: window.market_open,
    }
}

/// PriceGap: 3:30 PM LTP measured against the official daily close.
pub fn price_gap_signal(date: NaiveDate, ltp_330: Option<f64>, daily_close: Option<f64>) -> PriceGapSignal {
    let gap = compute_gap(daily_close, ltp_330);
    PriceGapSignal {
        ltp_330,
        daily_close,
        gap: gap.map(|g| g.gap),
        gap_pct: gap.map(|g| g.gap_pct),
        direction: gap.map(|g| g.direction),
        date,
    }
}
