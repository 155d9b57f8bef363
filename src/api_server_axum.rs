use crate::app_config::AppConfig;
use crate::calendar;
use crate::config;
use crate::error::SignalError;
use crate::models::{Instrument, SignalReport};
use crate::report::MarketData;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const DASHBOARD_FILE: &str = "dashboard.html";

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    market: MarketData,
    config: Arc<AppConfig>,
    cache: Arc<RwLock<Cache>>,
}

#[derive(Default)]
struct Cache {
    expiries: HashMap<Instrument, (Vec<NaiveDate>, Instant)>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self::with_market(MarketData::new()?, config))
    }

    /// State over an existing set of clients (tests point these at mock servers).
    pub fn with_market(market: MarketData, config: AppConfig) -> Self {
        Self {
            market,
            config: Arc::new(config),
            cache: Arc::new(RwLock::new(Cache::default())),
        }
    }

    /// Expiry list for `instrument`, served from cache for five minutes.
    async fn cached_expiries(&self, token: &str, instrument: Instrument) -> Result<Vec<NaiveDate>> {
        {
            let cache = self.cache.read().await;
            if let Some((expiries, cached_at)) = cache.expiries.get(&instrument) {
                if cached_at.elapsed() < config::EXPIRY_CACHE_DURATION {
                    debug!(%instrument, "expiry cache hit");
                    return Ok(expiries.clone());
                }
            }
        }

        let expiries = self.market.upstox.fetch_expiries(token, instrument).await?;

        {
            let mut cache = self.cache.write().await;
            cache.expiries.insert(instrument, (expiries.clone(), Instant::now()));
        }

        Ok(expiries)
    }
}

// -----------------------------------------------
// ERROR RESPONSES
// -----------------------------------------------

impl SignalError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SignalError::MissingAccessToken => StatusCode::SERVICE_UNAVAILABLE,
            SignalError::NoValidExpiry => StatusCode::NOT_FOUND,
            SignalError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for SignalError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /api/signals - All four signals for the auto-selected instrument
async fn get_signals(State(app_state): State<AppState>) -> Result<Json<SignalReport>, SignalError> {
    let start_time = Instant::now();
    let now = calendar::now_ist();

    let token = app_state.config.access_token().unwrap_or_else(|e| {
        warn!(error = %format!("{:#}", e), "could not read credentials file");
        None
    });

    let state = &app_state;
    let report = state
        .market
        .build_report_with(token.as_deref(), now, move |token, instrument| {
            state.cached_expiries(token, instrument)
        })
        .await;

    match &report {
        Ok(r) => info!(
            instrument = %r.instrument,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "signals served"
        ),
        Err(e) => warn!(error = %e, "signals request failed"),
    }

    report.map(Json)
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "index-signals" }))
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub fn build_router(app_state: AppState) -> Router {
    let static_dir = app_state.config.static_dir.clone();
    let dashboard = static_dir.join(DASHBOARD_FILE);

    Router::new()
        .route("/api/signals", get(get_signals))
        .route("/health", get(health))
        .route_service("/", ServeFile::new(&dashboard))
        .route_service("/index.html", ServeFile::new(&dashboard))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

pub async fn start_server(app_config: AppConfig) -> Result<()> {
    let addr = app_config.bind_addr();
    let app = build_router(AppState::new(app_config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "server listening");

    println!("🚀 Index Signals server running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   GET  /             (dashboard)");
    println!("   GET  /api/signals");
    println!("   GET  /health");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
