use crate::calendar::days_between;
use crate::models::{Instrument, InstrumentSelection};
use chrono::NaiveDate;

/// First expiry whose DTE as of `today` lies within the instrument's trading window.
fn tradable_expiry(instrument: Instrument, expiries: &[NaiveDate], today: NaiveDate) -> Option<InstrumentSelection> {
    let mut sorted = expiries.to_vec();
    sorted.sort();

    sorted.into_iter().find_map(|expiry| {
        let dte = days_between(today, expiry);
        (0..=instrument.max_trade_dte())
            .contains(&dte)
            .then_some(InstrumentSelection { instrument, expiry, dte })
    })
}

/// Pick the index to trade today.
///
/// NIFTY trades at 0-2 DTE and SENSEX at 0-1 DTE. The lower DTE wins and a tie
/// goes to NIFTY. `None` when neither index is inside its window.
pub fn select_instrument(
    nifty_expiries: &[NaiveDate],
    sensex_expiries: &[NaiveDate],
    today: NaiveDate,
) -> Option<InstrumentSelection> {
    let nifty = tradable_expiry(Instrument::Nifty, nifty_expiries, today);
    let sensex = tradable_expiry(Instrument::Sensex, sensex_expiries, today);

    match (nifty, sensex) {
        (Some(n), Some(s)) if n.dte <= s.dte => Some(n),
        (_, Some(s)) => Some(s),
        (n, None) => n,
    }
}

/// DTE shown to the user: the signals are for the next session.
pub fn display_dte(dte: i64) -> i64 {
    (dte - 1).max(0)
}

/// Nearest expiry on or after `date`, with its DTE as of `date`.
pub fn nearest_expiry_from(expiries: &[NaiveDate], date: NaiveDate) -> Option<(NaiveDate, i64)> {
    expiries
        .iter()
        .filter(|e| **e >= date)
        .min()
        .map(|e| (*e, days_between(date, *e)))
}
