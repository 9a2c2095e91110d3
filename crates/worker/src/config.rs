use std::time::Duration;

use relay_core::extractor::{ExtractorSettings, DEFAULT_EXTRACTION_TIMEOUT};

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Relay WebSocket endpoint work frames arrive on.
    pub ws_url: String,
    /// Base URL of the relay HTTP API results are posted to.
    pub api_url: String,
    /// Default log verbosity when `RUST_LOG` is unset.
    pub log_level: String,
    pub extractor: ExtractorSettings,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                |
    /// |---------------------------|----------------------------------------|
    /// | `WORKER_WS_URL`           | `ws://127.0.0.1:8000/ws/new_message`   |
    /// | `WORKER_API_URL`          | `http://127.0.0.1:8000`                |
    /// | `LOG_LEVEL`               | `info`                                 |
    /// | `EXTRACTOR_BINARY`        | `ontogpt`                              |
    /// | `EXTRACTOR_TEMPLATE_PATH` | `habitat_template_v2.yaml`             |
    /// | `EXTRACTOR_MODEL`         | `ollama/mistral`                       |
    /// | `EXTRACTOR_TIMEOUT_SECS`  | `600`                                  |
    pub fn from_env() -> Self {
        let timeout = match std::env::var("EXTRACTOR_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().unwrap_or_else(|e| {
                panic!("EXTRACTOR_TIMEOUT_SECS must be a valid number: {e}")
            })),
            Err(_) => DEFAULT_EXTRACTION_TIMEOUT,
        };

        Self {
            ws_url: var_or("WORKER_WS_URL", "ws://127.0.0.1:8000/ws/new_message"),
            api_url: var_or("WORKER_API_URL", "http://127.0.0.1:8000"),
            log_level: var_or("LOG_LEVEL", "info"),
            extractor: ExtractorSettings {
                binary: var_or("EXTRACTOR_BINARY", "ontogpt"),
                template_path: var_or("EXTRACTOR_TEMPLATE_PATH", "habitat_template_v2.yaml"),
                model: var_or("EXTRACTOR_MODEL", "ollama/mistral"),
                timeout,
            },
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
