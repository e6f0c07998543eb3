//! Harness configuration from environment variables.
//!
//! A local `.env` file can supply values, but real environment variables
//! always win. Both endpoint roots are derived from the single service port.

use std::path::Path;

/// API key used when `API_KEY` is not set anywhere.
pub const DEFAULT_API_KEY: &str = "sk-dev123456";

/// Service port used when `SERVICE_PORT` is not set anywhere.
pub const DEFAULT_SERVICE_PORT: &str = "3000";

/// Resolved harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub api_key: String,
    pub service_port: String,
}

impl HarnessConfig {
    /// Load configuration: apply `.env` from the working directory (if any),
    /// then read the environment.
    pub fn load() -> Self {
        load_env_file(Path::new(".env"));
        Self::from_env()
    }

    /// Read configuration from the current environment only.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            service_port: std::env::var("SERVICE_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVICE_PORT.to_string()),
        }
    }

    /// Base URL of the default completions endpoint.
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}/v1", self.service_port)
    }

    /// Base URL of the CLI endpoint variant (supports tool invocation).
    pub fn cli_base_url(&self) -> String {
        format!("http://localhost:{}/cli/v1", self.service_port)
    }

    /// Whether the API key is the built-in development default.
    pub fn uses_default_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Whether the service port is the built-in default.
    pub fn uses_default_port(&self) -> bool {
        self.service_port == DEFAULT_SERVICE_PORT
    }
}

// ─── .env loading ────────────────────────────────────────────────────────────

/// Load `KEY=VALUE` pairs from a dotenv-style file into the process
/// environment. Variables already set in the environment are left untouched.
///
/// Supported syntax: blank lines, `#` comments, an optional `export ` prefix,
/// and single- or double-quoted values. Anything else is skipped.
pub fn load_env_file(path: &Path) {
    let Ok(raw) = std::fs::read_to_string(path) else {
        return;
    };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || std::env::var_os(key).is_some() {
            continue;
        }
        let value = strip_quotes(value.trim());
        std::env::set_var(key, value);
    }
}

/// Remove one layer of matching single or double quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ─── Tests ───────────────────────────────────────────────────────────────────
