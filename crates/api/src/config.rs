use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Default log verbosity when `RUST_LOG` is unset (default: `debug`).
    pub log_level: String,
    /// How long `/extract` waits for a worker resolution (default: `200`).
    pub extract_timeout_secs: u64,
    /// Upper bound between store rechecks while waiting (default: `1000`).
    pub poll_interval_ms: u64,
    /// Interval between delivery attempts on a worker channel (default: `1000`).
    pub delivery_interval_ms: u64,
    /// HTTP request timeout in seconds; must exceed the extract timeout
    /// (default: `210`).
    pub request_timeout_secs: u64,
    /// Age after which an untaken resolution is purged (default: `600`).
    pub orphan_ttl_secs: u64,
    /// How often the orphan sweeper runs (default: `60`).
    pub orphan_sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default   |
    /// |------------------------------|-----------|
    /// | `HOST`                       | `0.0.0.0` |
    /// | `PORT`                       | `8000`    |
    /// | `LOG_LEVEL`                  | `debug`   |
    /// | `EXTRACT_TIMEOUT_SECS`       | `200`     |
    /// | `POLL_INTERVAL_MS`           | `1000`    |
    /// | `DELIVERY_INTERVAL_MS`       | `1000`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `210`     |
    /// | `ORPHAN_TTL_SECS`            | `600`     |
    /// | `ORPHAN_SWEEP_INTERVAL_SECS` | `60`      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".into());

        Self {
            host,
            port: parse_var("PORT", 8000),
            log_level,
            extract_timeout_secs: parse_var("EXTRACT_TIMEOUT_SECS", 200),
            poll_interval_ms: parse_var("POLL_INTERVAL_MS", 1000),
            delivery_interval_ms: parse_var("DELIVERY_INTERVAL_MS", 1000),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 210),
            orphan_ttl_secs: parse_var("ORPHAN_TTL_SECS", 600),
            orphan_sweep_interval_secs: parse_var("ORPHAN_SWEEP_INTERVAL_SECS", 60),
        }
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn delivery_interval(&self) -> Duration {
        Duration::from_millis(self.delivery_interval_ms)
    }

    pub fn orphan_ttl(&self) -> Duration {
        Duration::from_secs(self.orphan_ttl_secs)
    }

    pub fn orphan_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.orphan_sweep_interval_secs)
    }
}

/// Parse a numeric env var, panicking at startup on garbage so
/// misconfiguration fails fast.
fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid number: {e}")),
        Err(_) => default,
    }
}
