use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use index_signals::api_server_axum::{build_router, AppState};
use index_signals::app_config::{AppConfig, Mode};
use index_signals::calendar;
use index_signals::nse::NSEClient;
use index_signals::report::MarketData;
use index_signals::upstox::UpstoxClient;
use index_signals::yahoo::YahooClient;
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scratch directory holding config.json and the dashboard page.
fn scratch_dir(name: &str, token: Option<&str>) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("index-signals-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("dashboard.html"), "<h1>TRADING SIGNALS</h1>").unwrap();
    if let Some(token) = token {
        std::fs::write(dir.join("config.json"), json!({ "access_token": token }).to_string()).unwrap();
    }
    dir
}

fn app(server: &MockServer, dir: &PathBuf) -> Router {
    let uri = server.uri();
    let market = MarketData {
        upstox: UpstoxClient::with_base_url(&uri).unwrap(),
        yahoo: YahooClient::with_base_url(&uri).unwrap(),
        nse: NSEClient::with_base_url(&uri).unwrap(),
    };
    let config = AppConfig {
        mode: Mode::Server,
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: dir.clone(),
        config_file: dir.join("config.json"),
    };
    build_router(AppState::with_market(market, config))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn mount_expiries(server: &MockServer, key: &str, expiries: &[String]) {
    let data: Vec<Value> = expiries.iter().map(|e| json!({ "expiry": e })).collect();
    Mock::given(method("GET"))
        .and(path("/v2/option/contract"))
        .and(query_param("instrument_key", key))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": data })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_market_data(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/v2/historical-candle/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "candles": [
                ["2025-01-13T15:29:00+05:30", 23090.0, 23095.0, 23080.0, 23085.95, 0, 0],
                ["2025-01-13T09:15:00+05:30", 23115.0, 23131.0, 23110.0, 23130.0, 0, 0]
            ]}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v8/finance/chart/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "^NSEI", "gmtoffset": 19800 },
                    "timestamp": [1736394300, 1736480700, 1736739900],
                    "indicators": { "quote": [{
                        "open":  [23600.0, 23500.0, 23200.0],
                        "high":  [23650.0, 23550.0, 23300.0],
                        "low":   [23500.0, 23400.0, 23050.0],
                        "close": [23526.5, 23431.5, 23085.95]
                    }]}
                }],
                "error": null
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/equity-stockIndices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "NIFTY 50",
            "data": [{ "symbol": "NIFTY 50", "lastPrice": 23456.7 }]
        })))
        .mount(server)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let dir = scratch_dir("health", None);
        let app = app(&server, &dir);

        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({ "status": "healthy", "service": "index-signals" }));
    }

    #[tokio::test]
    async fn test_dashboard_served_at_root() {
        let server = MockServer::start().await;
        let dir = scratch_dir("dashboard", None);
        let app = app(&server, &dir);

        for uri in ["/", "/index.html", "/dashboard.html"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(body.contains("TRADING SIGNALS"));
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_503() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/option/contract"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": [] })))
            .expect(0)
            .mount(&server)
            .await;

        let dir = scratch_dir("no-token", None);
        let _ = std::fs::remove_file(dir.join("config.json"));
        let app = app(&server, &dir);

        let (status, body) = get(&app, "/api/signals").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"], "No access token found");
    }

    #[tokio::test]
    async fn test_no_valid_expiry_is_404() {
        let server = MockServer::start().await;
        let far = (calendar::now_ist().date() + Duration::days(20)).to_string();
        mount_expiries(&server, "NSE_INDEX|Nifty 50", &[far.clone()]).await;
        mount_expiries(&server, "BSE_INDEX|SENSEX", &[far]).await;

        let dir = scratch_dir("no-expiry", Some("test-token"));
        let app = app(&server, &dir);

        let (status, body) = get(&app, "/api/signals").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"], "No valid expiry found");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_502() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/option/contract"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "status": "error" })))
            .mount(&server)
            .await;

        let dir = scratch_dir("upstream", Some("test-token"));
        let app = app(&server, &dir);

        let (status, body) = get(&app, "/api/signals").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("\"error\""));
    }

    #[tokio::test]
    async fn test_full_report_and_expiry_cache() {
        let server = MockServer::start().await;
        let today = calendar::now_ist().date();
        let next_week = today + Duration::days(7);
        mount_expiries(&server, "NSE_INDEX|Nifty 50", &[today.to_string(), next_week.to_string()]).await;
        mount_expiries(&server, "BSE_INDEX|SENSEX", &[]).await;
        mount_market_data(&server).await;

        let dir = scratch_dir("full", Some("test-token"));
        let app = app(&server, &dir);

        let (status, body) = get(&app, "/api/signals").await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let report: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(report["instrument"], "NIFTY");
        assert_eq!(report["expiry_date"], today.to_string());
        assert_eq!(report["dte"], 0);

        assert_eq!(report["bid"]["ltp_330"], 23085.95);
        assert_eq!(report["bid"]["open_915"], 23115.0);
        assert_eq!(report["bid"]["gap"], 29.05);
        assert_eq!(report["bid"]["direction"], "up");

        assert!(report["pricegap"]["date"].is_string());

        // whole seconds: "YYYY-MM-DDTHH:MM:SS"
        let timestamp = report["timestamp"].as_str().unwrap();
        assert_eq!(timestamp.len(), 19, "{}", timestamp);
        assert!(!timestamp.contains('.'));

        assert_eq!(report["sixthsense"].as_array().unwrap().len(), 3);
        assert_eq!(report["sixthsense"][0]["date"], "2025-01-09");

        let coverage = report["coverage"]["instruments"].as_array().unwrap();
        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage[0]["name"], "NIFTY");
        assert_eq!(coverage[0]["spot"], 23456.7);

        // second poll is served from the expiry cache (mocks expect one call each)
        let (status, _) = get(&app, "/api/signals").await;
        assert_eq!(status, StatusCode::OK);
    }
}
