use chrono::{NaiveDate, NaiveDateTime};
use index_signals::error::SignalError;
use index_signals::models::{CoverageGap, Direction, Instrument, SignalReport};
use index_signals::nse::NSEClient;
use index_signals::report::MarketData;
use index_signals::upstox::UpstoxClient;
use index_signals::yahoo::YahooClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

// 2025-01-13 and 2025-01-14, 09:15 IST
const MON_0915: i64 = 1736739900;
const TUE_0915: i64 = 1736826300;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

fn chart(timestamp: i64, open: f64, close: f64) -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "^NSEI", "gmtoffset": 19800 },
                "timestamp": [timestamp],
                "indicators": { "quote": [{
                    "open": [open], "high": [open.max(close)], "low": [open.min(close)], "close": [close]
                }]}
            }],
            "error": null
        }
    })
}

fn candles(rows: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": { "candles": rows } }))
}

/// Monday's session from the historical endpoint, Tuesday's from intraday,
/// Monday's daily bar from Yahoo and a live 1d quote of 23300.
async fn mount_market(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/historical-candle/.+/1minute/2025-01-13/2025-01-13$"))
        .respond_with(candles(json!([
            ["2025-01-13T15:29:00+05:30", 23090.0, 23095.0, 23080.0, 23085.95, 0, 0],
            ["2025-01-13T09:15:00+05:30", 23200.0, 23210.0, 23190.0, 23205.0, 0, 0]
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/historical-candle/intraday/.+/1minute$"))
        .respond_with(candles(json!([
            ["2025-01-14T09:15:00+05:30", 23115.0, 23131.0, 23110.0, 23130.0, 0, 0]
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v8/finance/chart/.+"))
        .and(query_param("range", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart(TUE_0915, 23150.0, 23300.0)))
        .with_priority(2)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v8/finance/chart/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart(MON_0915, 23200.0, 23090.0)))
        .mount(server)
        .await;
}

fn market(server: &MockServer) -> MarketData {
    let uri = server.uri();
    MarketData {
        upstox: UpstoxClient::with_base_url(&uri).unwrap(),
        yahoo: YahooClient::with_base_url(&uri).unwrap(),
        nse: NSEClient::with_base_url(&uri).unwrap(),
    }
}

async fn report_at(market: &MarketData, now: NaiveDateTime, nifty: Vec<NaiveDate>, sensex: Vec<NaiveDate>) -> SignalReport {
    market
        .build_report_with(Some(TOKEN), now, move |_, instrument| {
            let list = match instrument {
                Instrument::Nifty => nifty.clone(),
                Instrument::Sensex => sensex.clone(),
            };
            async move { Ok::<_, anyhow::Error>(list) }
        })
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pricegap_uses_close_of_reported_session() {
        let server = MockServer::start().await;
        mount_market(&server).await;
        let market = market(&server);

        // Tuesday 11:00: the latest completed session is Monday
        let report = report_at(&market, at("2025-01-14 11:00"), vec![d("2025-01-14"), d("2025-01-16")], vec![]).await;
        let pricegap = report.pricegap;

        assert_eq!(pricegap.date, d("2025-01-13"));
        assert_eq!(pricegap.ltp_330, Some(23085.95));
        assert_eq!(pricegap.daily_close, Some(23090.0));
        assert_eq!(pricegap.gap, Some(-4.05));
        assert_eq!(pricegap.gap_pct, Some(-0.02));
        assert_eq!(pricegap.direction, Some(Direction::Down));

        assert_eq!(report.bid.prev_date, d("2025-01-13"));
        assert_eq!(report.bid.today_date, d("2025-01-14"));
        assert_eq!(report.bid.gap, Some(29.05));
    }

    #[tokio::test]
    async fn test_pricegap_after_close_falls_back_to_latest_quote() {
        let server = MockServer::start().await;
        mount_market(&server).await;
        let market = market(&server);

        // Yahoo has no Tuesday bar yet; the 1d range carries today's close
        let report = report_at(&market, at("2025-01-14 16:00"), vec![d("2025-01-14"), d("2025-01-16")], vec![]).await;

        assert_eq!(report.pricegap.date, d("2025-01-14"));
        assert_eq!(report.pricegap.daily_close, Some(23300.0));
        assert_eq!(report.pricegap.ltp_330, Some(23130.0));
    }

    #[tokio::test]
    async fn test_nifty_spot_falls_back_to_yahoo() {
        // no NSE mocks: the index quote answers 404
        let server = MockServer::start().await;
        mount_market(&server).await;
        Mock::given(method("GET"))
            .and(path_regex(r"BSESN"))
            .respond_with(ResponseTemplate::new(404))
            .with_priority(1)
            .mount(&server)
            .await;
        let market = market(&server);

        let report = report_at(
            &market,
            at("2025-01-14 11:00"),
            vec![d("2025-01-14"), d("2025-01-16")],
            vec![d("2025-01-16")],
        )
        .await;
        let coverage = &report.coverage;

        assert_eq!(coverage.date, "Wed 15 Jan");
        assert_eq!(coverage.instruments.len(), 1);
        let nifty = &coverage.instruments[0];
        assert_eq!(nifty.name, Instrument::Nifty);
        assert_eq!(nifty.dte, 1);
        assert_eq!(nifty.spot, 23300.0);
        assert_eq!(nifty.premium, 188.73);

        // SENSEX had an expiry but no spot
        assert_eq!(coverage.rows[1].instrument, Instrument::Sensex);
        assert_eq!(coverage.rows[1].outcome, Err(CoverageGap::SpotUnavailable { dte: 1 }));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["coverage"]["instruments"].as_array().unwrap().len(), 1);
        assert_eq!(json["coverage"]["instruments"][0]["name"], "NIFTY");
        assert!(json["coverage"].get("rows").is_none());
    }

    #[tokio::test]
    async fn test_coverage_without_expiry_stays_out_of_json() {
        let server = MockServer::start().await;
        mount_market(&server).await;
        let market = market(&server);

        let report = report_at(&market, at("2025-01-14 11:00"), vec![d("2025-01-14"), d("2025-01-16")], vec![]).await;

        assert_eq!(report.coverage.rows.len(), 2);
        assert_eq!(report.coverage.rows[1].outcome, Err(CoverageGap::NoValidExpiry));

        let json = serde_json::to_value(&report).unwrap();
        let names: Vec<&str> = json["coverage"]["instruments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["NIFTY"]);
    }

    #[tokio::test]
    async fn test_bid_sweep_covers_three_indices_in_order() {
        let server = MockServer::start().await;
        mount_market(&server).await;
        let market = market(&server);

        let entries = market.build_bid_sweep(Some(TOKEN), at("2025-01-14 11:00")).await.unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["NIFTY 50", "BANK NIFTY", "SENSEX"]);
        for entry in &entries {
            assert_eq!(entry.bid.ltp_330, Some(23085.95));
            assert_eq!(entry.bid.open_915, Some(23115.0));
            assert_eq!(entry.bid.direction, Some(Direction::Up));
        }

        let missing = market.build_bid_sweep(None, at("2025-01-14 11:00")).await;
        assert!(matches!(missing, Err(SignalError::MissingAccessToken)));
    }
}
