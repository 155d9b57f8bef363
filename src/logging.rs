use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_DIR: &str = "./logs";
pub const LOG_FILE: &str = "index-signals.log";

/// Initialize logging to stderr and a daily-rolling JSON file in ./logs.
///
/// `default_level` applies when RUST_LOG is unset. CLI modes pass "warn" so
/// log lines do not interleave with the printed signals.
pub fn init_logging(default_level: &str) {
    let file_layer = match std::fs::create_dir_all(LOG_DIR) {
        Ok(()) => {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .json(),
            )
        }
        Err(e) => {
            eprintln!("Could not create {}: {} (file logging disabled)", LOG_DIR, e);
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(true),
        )
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn test_logging() {
        init_logging("info");
        // A second init must not panic.
        init_logging("warn");

        info!("This is an info message");
        warn!("This is a warning message");

        assert!(std::path::Path::new(LOG_DIR).exists());
    }
}
