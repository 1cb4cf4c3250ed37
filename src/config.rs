use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client configuration loaded from the environment (and `.env`, if present).
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the recruiting service, without a trailing slash.
    pub api_url: String,

    /// Directory holding the local cache database. `None` uses the
    /// platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Per-request timeout. Requests never time out when unset.
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Optional environment variables:
    /// - HIREEASE_API_URL: service base URL (default: http://localhost:8000)
    /// - HIREEASE_DATA_DIR: cache directory override
    /// - HIREEASE_HTTP_TIMEOUT_SECS: request timeout in seconds
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("HIREEASE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = env::var_os("HIREEASE_DATA_DIR").map(PathBuf::from);
        let http_timeout = match env::var("HIREEASE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        Ok(Self::new(&api_url, data_dir, http_timeout))
    }

    pub fn new(api_url: &str, data_dir: Option<PathBuf>, http_timeout: Option<Duration>) -> Self {
        Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            data_dir,
            http_timeout,
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("HIREEASE_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))?;
    if secs == 0 {
        return Err(anyhow!("HIREEASE_HTTP_TIMEOUT_SECS must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
