use anyhow::Result;
use colored::Colorize;
use index_signals::app_config::{AppConfig, Mode};
use index_signals::signal_commands::SignalCommands;
use index_signals::{api_server_axum, logging};

/// Run API server mode
async fn run_server(app_config: AppConfig) -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Index Signals Server".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    api_server_axum::start_server(app_config).await
}

#[tokio::main]
async fn main() -> Result<()> {
    // ========================================
    // CONFIGURATION - from environment
    // ========================================
    let app_config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Set SIGNALS_MODE environment variable to control execution mode");
            eprintln!("Examples:");
            eprintln!("  SIGNALS_MODE=signals cargo run                  # Print all four signals");
            eprintln!("  SIGNALS_MODE=bid cargo run                      # BID sweep for NIFTY, BANK NIFTY, SENSEX");
            eprintln!("  SIGNALS_MODE=server SIGNALS_PORT=8080 cargo run # Dashboard + /api/signals");
            std::process::exit(1);
        }
    };

    match app_config.mode {
        Mode::Server => {
            logging::init_logging("info");
            run_server(app_config).await?;
        }
        Mode::Bid => {
            logging::init_logging("warn");
            SignalCommands::run_bid_sweep(&app_config).await?;
        }
        Mode::Signals => {
            logging::init_logging("warn");
            SignalCommands::run_signals(&app_config).await?;
        }
    }

    Ok(())
}
