use crate::config;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// What the binary does on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print all four signals for the auto-selected index.
    Signals,
    /// Print the BID signal for every sweep index.
    Bid,
    /// Serve `/api/signals` and the dashboard.
    Server,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "signals" | "cli" => Ok(Mode::Signals),
            "bid" => Ok(Mode::Bid),
            "server" | "serve" => Ok(Mode::Server),
            other => anyhow::bail!("Invalid mode '{}'. Use 'signals', 'bid' or 'server'", other),
        }
    }
}

/// Application configuration handler
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: Mode,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub config_file: PathBuf,
}

/// Shape of config.json; only the token is read.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    access_token: Option<String>,
}

impl AppConfig {
    /// Create new configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mode = std::env::var("SIGNALS_MODE").unwrap_or_default().parse()?;

        Ok(Self {
            mode,
            host: std::env::var("SIGNALS_HOST").unwrap_or_else(|_| config::DEFAULT_HOST.to_string()),
            port: Self::get_port(),
            static_dir: std::env::var("SIGNALS_STATIC_DIR")
                .unwrap_or_else(|_| config::DEFAULT_STATIC_DIR.to_string())
                .into(),
            config_file: std::env::var("SIGNALS_CONFIG")
                .unwrap_or_else(|_| config::DEFAULT_CONFIG_FILE.to_string())
                .into(),
        })
    }

    /// Get port from environment or default
    fn get_port() -> u16 {
        std::env::var("SIGNALS_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(config::DEFAULT_PORT)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Brokerage token: config file first, then UPSTOX_ACCESS_TOKEN.
    ///
    /// Read on every call so a token refreshed on disk is picked up without a
    /// restart.
    pub fn access_token(&self) -> Result<Option<String>> {
        if let Some(token) = read_token_file(&self.config_file)? {
            return Ok(Some(token));
        }
        Ok(std::env::var(config::ACCESS_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()))
    }
}

/// Token from a JSON credentials file; `None` when the file does not exist.
pub fn read_token_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let creds: CredentialsFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    debug!(path = %path.display(), "loaded credentials file");
    Ok(creds.access_token.filter(|t| !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("".parse::<Mode>().unwrap(), Mode::Signals);
        assert_eq!("BID".parse::<Mode>().unwrap(), Mode::Bid);
        assert_eq!("server".parse::<Mode>().unwrap(), Mode::Server);
        assert!("batch".parse::<Mode>().is_err());
    }

    #[test]
    fn test_token_file() {
        let dir = std::env::temp_dir().join(format!("index-signals-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"access_token": "abc123", "api_key": "ignored"}"#).unwrap();
        assert_eq!(read_token_file(&path).unwrap(), Some("abc123".to_string()));

        std::fs::write(&path, r#"{"access_token": "  "}"#).unwrap();
        assert_eq!(read_token_file(&path).unwrap(), None);

        std::fs::write(&path, "not json").unwrap();
        assert!(read_token_file(&path).is_err());

        assert_eq!(read_token_file(&dir.join("missing.json")).unwrap(), None);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
