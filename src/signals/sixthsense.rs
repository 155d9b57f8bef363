use super::round2;
use crate::models::{DailyBar, SixthSenseRow};

/// Last `days` sessions, oldest first, with each session's close-vs-open change.
pub fn sixth_sense_rows(bars: &[DailyBar], days: usize) -> Vec<SixthSenseRow> {
    let mut sorted: Vec<&DailyBar> = bars.iter().filter(|b| b.open > 0.0).collect();
    sorted.sort_by_key(|b| b.date);

    let start = sorted.len().saturating_sub(days);
    sorted[start..]
        .iter()
        .map(|bar| SixthSenseRow {
            date: bar.date,
            open: round2(bar.open),
            close: round2(bar.close),
            change: round2((bar.close - bar.open) / bar.open * 100.0),
        })
        .collect()
}
