use crate::models::Candle;
use chrono::Timelike;

/// 3:30 PM LTP: close of the latest candle at or before 15:29.
///
/// The 15:29 candle closes at 15:30. When the session ended early (or the
/// feed stops short) the latest earlier candle stands in.
pub fn ltp_at_close(candles: &[Candle]) -> Option<f64> {
    candles
        .iter()
        .filter(|c| {
            let (h, m) = (c.timestamp.hour(), c.timestamp.minute());
            h < 15 || (h == 15 && m <= 29)
        })
        .max_by_key(|c| (c.timestamp.hour(), c.timestamp.minute()))
        .map(|c| c.close)
}

/// 9:15 AM open: open of the session's first candle.
pub fn open_at_915(candles: &[Candle]) -> Option<f64> {
    candles
        .iter()
        .find(|c| c.timestamp.hour() == 9 && c.timestamp.minute() == 15)
        .map(|c| c.open)
}
