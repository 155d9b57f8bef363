//! Trading-day arithmetic in Indian Standard Time.
//!
//! Exchanges trade Monday to Friday, 09:15 to 15:30 IST. Holidays are not
//! modelled; on a holiday the brokerage simply returns no candles and the
//! affected signal shows as unavailable.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within a day")
}

/// Current wall-clock time in IST.
pub fn now_ist() -> NaiveDateTime {
    Utc::now().with_timezone(&ist()).naive_local()
}

pub fn market_open_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 15, 0).expect("09:15 is a valid time")
}

pub fn market_close_time() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).expect("15:30 is a valid time")
}

pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn last_trading_day_on_or_before(date: NaiveDate) -> NaiveDate {
    let mut day = date;
    while !is_trading_day(day) {
        day -= Duration::days(1);
    }
    day
}

pub fn previous_trading_day(date: NaiveDate) -> NaiveDate {
    last_trading_day_on_or_before(date - Duration::days(1))
}

/// Tomorrow, rolled forward past the weekend.
pub fn next_trading_day(now: NaiveDateTime) -> NaiveDate {
    let mut day = now.date() + Duration::days(1);
    while !is_trading_day(day) {
        day += Duration::days(1);
    }
    day
}

/// Calendar days from `from` to `to`; negative when `to` is in the past.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Sessions compared by the BID signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidWindow {
    /// Session whose 3:30 PM LTP is the base.
    pub prev_day: NaiveDate,
    /// Session whose 9:15 AM open is compared.
    pub today: NaiveDate,
    pub market_open: bool,
}

/// Before 09:15 on a trading day the comparison shifts back one session, so
/// the latest complete overnight gap is shown. On a weekend that is Friday's.
pub fn bid_window(now: NaiveDateTime) -> BidWindow {
    let mut today = last_trading_day_on_or_before(now.date());
    let is_today_trading_day = today == now.date();
    let market_open = is_today_trading_day && now.time() >= market_open_time();

    if is_today_trading_day && !market_open {
        today = previous_trading_day(today);
    }

    BidWindow {
        prev_day: previous_trading_day(today),
        today,
        market_open,
    }
}

/// Session for the PriceGap signal and whether it is today's (closed) session.
///
/// The daily close only exists after 15:30, so before that the most recent
/// completed session is used.
pub fn pricegap_day(now: NaiveDateTime) -> (NaiveDate, bool) {
    let today = last_trading_day_on_or_before(now.date());
    let is_today_trading_day = today == now.date();
    let data_available = is_today_trading_day && now.time() >= market_close_time();

    if data_available {
        (today, true)
    } else if is_today_trading_day {
        (previous_trading_day(today), false)
    } else {
        (today, false)
    }
}
