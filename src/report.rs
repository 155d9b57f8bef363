use crate::calendar::{self, BidWindow};
use crate::config;
use crate::error::SignalError;
use crate::models::{
    BidSignal, BidSweepEntry, CoverageGap, CoverageRow, CoverageSignal, Instrument,
    InstrumentSelection, PriceGapSignal, SignalReport, SixthSenseRow,
};
use crate::nse::{NSEClient, NIFTY_INDEX_NAME};
use crate::signals;
use crate::upstox::UpstoxClient;
use crate::yahoo::YahooClient;
use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::future::Future;
use tracing::{info, warn};

/// Log and drop an upstream failure; the signal then shows as unavailable.
fn or_unavailable<T>(what: &str, result: Result<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(what, error = %format!("{:#}", e), "data not available");
            None
        }
    }
}

// -----------------------------------------------
// MARKET DATA SOURCES
// -----------------------------------------------
#[derive(Clone)]
pub struct MarketData {
    pub upstox: UpstoxClient,
    pub yahoo: YahooClient,
    pub nse: NSEClient,
}

impl MarketData {
    pub fn new() -> Result<Self> {
        Ok(Self {
            upstox: UpstoxClient::new()?,
            yahoo: YahooClient::new()?,
            nse: NSEClient::new()?,
        })
    }

    /// Build the full report using a freshly fetched expiry list.
    pub async fn build_report(&self, token: Option<&str>, now: NaiveDateTime) -> Result<SignalReport, SignalError> {
        self.build_report_with(token, now, move |token, instrument| async move {
            self.upstox.fetch_expiries(token, instrument).await
        })
        .await
    }

    /// Build the full report; `expiries` supplies each instrument's expiry
    /// list so callers can put a cache in front of the brokerage.
    pub async fn build_report_with<'a, F, Fut>(
        &'a self,
        token: Option<&'a str>,
        now: NaiveDateTime,
        expiries: F,
    ) -> Result<SignalReport, SignalError>
    where
        F: Fn(&'a str, Instrument) -> Fut,
        Fut: Future<Output = Result<Vec<NaiveDate>>>,
    {
        let token = token.ok_or(SignalError::MissingAccessToken)?;
        let today = now.date();

        let nifty_expiries = expiries(token, Instrument::Nifty).await?;
        let sensex_expiries = expiries(token, Instrument::Sensex).await?;

        let selection = signals::select_instrument(&nifty_expiries, &sensex_expiries, today)
            .ok_or(SignalError::NoValidExpiry)?;
        info!(
            instrument = %selection.instrument,
            expiry = %selection.expiry,
            dte = selection.dte,
            "selected instrument"
        );

        let bid = self
            .bid_for(token, selection.instrument.index_key(), calendar::bid_window(now), today)
            .await;
        let pricegap = self.price_gap_for(token, selection.instrument, now).await;
        let sixthsense = self.sixth_sense_for(selection.instrument, now).await;
        let coverage = self
            .coverage_for(now, [(Instrument::Nifty, &nifty_expiries), (Instrument::Sensex, &sensex_expiries)])
            .await;

        Ok(assemble(selection, now, bid, pricegap, sixthsense, coverage))
    }

    /// BID for every sweep index, without instrument selection.
    pub async fn build_bid_sweep(&self, token: Option<&str>, now: NaiveDateTime) -> Result<Vec<BidSweepEntry>, SignalError> {
        let token = token.ok_or(SignalError::MissingAccessToken)?;
        let window = calendar::bid_window(now);

        let mut entries = Vec::with_capacity(config::BID_SWEEP_INDICES.len());
        for (name, key) in config::BID_SWEEP_INDICES {
            let bid = self.bid_for(token, key, window, now.date()).await;
            entries.push(BidSweepEntry {
                name: name.to_string(),
                bid,
            });
        }
        Ok(entries)
    }

    // -----------------------------------------------
    // STRATEGY 1: BID
    // -----------------------------------------------
    async fn bid_for(&self, token: &str, instrument_key: &str, window: BidWindow, today: NaiveDate) -> BidSignal {
        let ltp_330 = or_unavailable(
            "bid ltp_330",
            self.upstox.fetch_ltp_330(token, instrument_key, window.prev_day, today).await,
        );
        let open_915 = or_unavailable(
            "bid open_915",
            self.upstox.fetch_open_915(token, instrument_key, window.today, today).await,
        );

        signals::bid_signal(&window, ltp_330, open_915)
    }

    // -----------------------------------------------
    // STRATEGY 2: PRICEGAP
    // -----------------------------------------------
    async fn price_gap_for(&self, token: &str, instrument: Instrument, now: NaiveDateTime) -> PriceGapSignal {
        let (date, closed_today) = calendar::pricegap_day(now);
        let ticker = instrument.yahoo_ticker();

        let ltp_330 = or_unavailable(
            "pricegap ltp_330",
            self.upstox.fetch_ltp_330(token, instrument.index_key(), date, now.date()).await,
        );
        let mut daily_close = or_unavailable("pricegap daily_close", self.yahoo.fetch_close_on(ticker, date).await);

        // Today's daily bar can lag the close; the 1d range already carries it
        if daily_close.is_none() && closed_today {
            daily_close = or_unavailable("pricegap latest close", self.yahoo.fetch_latest_close(ticker).await);
        }

        signals::price_gap_signal(date, ltp_330, daily_close)
    }

    // -----------------------------------------------
    // STRATEGY 3: SIXTHSENSE
    // -----------------------------------------------
    async fn sixth_sense_for(&self, instrument: Instrument, now: NaiveDateTime) -> Vec<SixthSenseRow> {
        let to = now.date();
        let from = to - Duration::days(config::SIXTH_SENSE_DAYS as i64 + config::SIXTH_SENSE_LOOKBACK_PADDING);

        match self.yahoo.fetch_daily_bars(instrument.yahoo_ticker(), from, to).await {
            Ok(bars) => signals::sixth_sense_rows(&bars, config::SIXTH_SENSE_DAYS),
            Err(e) => {
                warn!(what = "sixthsense", error = %format!("{:#}", e), "data not available");
                Vec::new()
            }
        }
    }

    // -----------------------------------------------
    // STRATEGY 4: COVERAGE PREMIUM
    // -----------------------------------------------
    async fn coverage_for(&self, now: NaiveDateTime, expiries: [(Instrument, &Vec<NaiveDate>); 2]) -> CoverageSignal {
        let next_day = calendar::next_trading_day(now);

        let mut rows = Vec::with_capacity(expiries.len());
        for (instrument, list) in expiries {
            let outcome = match signals::nearest_expiry_from(list, next_day) {
                None => Err(CoverageGap::NoValidExpiry),
                Some((_, dte)) => match self.spot_for(instrument).await {
                    Some(spot) => Ok(signals::coverage_premium(instrument, dte, spot)),
                    None => Err(CoverageGap::SpotUnavailable { dte }),
                },
            };
            rows.push(CoverageRow { instrument, outcome });
        }

        CoverageSignal {
            date: next_day.format("%a %d %b").to_string(),
            instruments: rows.iter().filter_map(|r| r.outcome.clone().ok()).collect(),
            rows,
        }
    }

    /// NIFTY spot from NSE, falling back to the Yahoo close; SENSEX from Yahoo.
    async fn spot_for(&self, instrument: Instrument) -> Option<f64> {
        if instrument == Instrument::Nifty {
            if let Some(spot) = or_unavailable("nse spot", self.nse.fetch_index_spot(NIFTY_INDEX_NAME).await) {
                return Some(spot);
            }
        }

        or_unavailable("yahoo spot", self.yahoo.fetch_latest_close(instrument.yahoo_ticker()).await)
    }
}

fn assemble(
    selection: InstrumentSelection,
    now: NaiveDateTime,
    bid: BidSignal,
    pricegap: PriceGapSignal,
    sixthsense: Vec<SixthSenseRow>,
    coverage: CoverageSignal,
) -> SignalReport {
    SignalReport {
        instrument: selection.instrument,
        expiry_date: selection.expiry,
        dte: signals::display_dte(selection.dte),
        // whole seconds, e.g. 2025-01-14T10:02:11
        timestamp: now.with_nanosecond(0).unwrap_or(now),
        bid,
        pricegap,
        sixthsense,
        coverage,
    }
}
