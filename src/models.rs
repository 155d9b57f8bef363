use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index whose weekly options the signals are computed for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Instrument {
    Nifty,
    Sensex,
}

impl Instrument {
    pub const ALL: [Instrument; 2] = [Instrument::Nifty, Instrument::Sensex];

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Nifty => "NIFTY",
            Instrument::Sensex => "SENSEX",
        }
    }

    /// Upstox instrument key of the underlying index.
    pub fn index_key(&self) -> &'static str {
        match self {
            Instrument::Nifty => "NSE_INDEX|Nifty 50",
            Instrument::Sensex => "BSE_INDEX|SENSEX",
        }
    }

    pub fn yahoo_ticker(&self) -> &'static str {
        match self {
            Instrument::Nifty => "^NSEI",
            Instrument::Sensex => "^BSESN",
        }
    }

    /// Highest DTE at which this index is traded (NIFTY 0-2, SENSEX 0-1).
    pub fn max_trade_dte(&self) -> i64 {
        match self {
            Instrument::Nifty => 2,
            Instrument::Sensex => 1,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn of(gap: f64) -> Self {
        if gap > 0.0 {
            Direction::Up
        } else if gap < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "─",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Flat => "Flat",
        }
    }
}

/// One-minute candle from the brokerage.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Exchange-local (IST) time of the candle's start.
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily bar from the secondary data source.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Gap and its percentage against a base price.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Gap {
    pub gap: f64,
    pub gap_pct: f64,
    pub direction: Direction,
}

/// Overnight gap: previous session's 3:30 PM LTP vs today's 9:15 AM open.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BidSignal {
    pub ltp_330: Option<f64>,
    pub open_915: Option<f64>,
    pub gap: Option<f64>,
    pub gap_pct: Option<f64>,
    pub direction: Option<Direction>,
    pub prev_date: NaiveDate,
    pub today_date: NaiveDate,
    pub market_open: bool,
}

/// 3:30 PM LTP vs official daily close of the same session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceGapSignal {
    pub ltp_330: Option<f64>,
    pub daily_close: Option<f64>,
    pub gap: Option<f64>,
    pub gap_pct: Option<f64>,
    pub direction: Option<Direction>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SixthSenseRow {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    /// Intraday change in percent, close vs open.
    pub change: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoverageEntry {
    pub name: Instrument,
    pub dte: i64,
    pub spot: f64,
    pub pct: f64,
    pub premium: f64,
}

/// Why a coverage row could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageGap {
    NoValidExpiry,
    SpotUnavailable { dte: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    pub instrument: Instrument,
    pub outcome: Result<CoverageEntry, CoverageGap>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoverageSignal {
    /// Next trading day, e.g. "Wed 15 Jan".
    pub date: String,
    pub instruments: Vec<CoverageEntry>,
    #[serde(skip)]
    pub rows: Vec<CoverageRow>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct InstrumentSelection {
    pub instrument: Instrument,
    pub expiry: NaiveDate,
    /// Days to expiry as of today.
    pub dte: i64,
}

/// Everything the CLI prints and `/api/signals` returns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignalReport {
    pub instrument: Instrument,
    pub expiry_date: NaiveDate,
    /// DTE as of the next trading day.
    pub dte: i64,
    pub timestamp: NaiveDateTime,
    pub bid: BidSignal,
    pub pricegap: PriceGapSignal,
    pub sixthsense: Vec<SixthSenseRow>,
    pub coverage: CoverageSignal,
}

/// BID row for one index in the sweep.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BidSweepEntry {
    pub name: String,
    pub bid: BidSignal,
}
