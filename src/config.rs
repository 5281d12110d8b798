//! Configuration loading from the `.env` file.
//!
//! Reads `.env` relative to the current working directory, exports its
//! entries into the process environment (already-set variables win, matching
//! dotenv semantics), then resolves everything into an immutable [`Config`]
//! that is passed by reference to whatever needs credentials. Nothing else
//! in the process reads environment variables after startup.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use crate::error::AppError;
use crate::logger;

/// Fixed relative path of the environment file.
pub const ENV_FILE: &str = ".env";

/// Required key carrying the Hugging Face access token.
pub const TOKEN_KEY: &str = "HUGGINGFACEHUB_API_TOKEN";

/// Alternative token keys honoured when [`TOKEN_KEY`] is absent.
const TOKEN_FALLBACK_KEYS: [&str; 2] = ["HF_TOKEN", "HUGGINGFACE_TOKEN"];

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token sent on every inference request. Never logged.
    pub api_token: String,
    /// Model repo id / artifact alias on the inference host.
    pub model_id: String,
    /// Base URL of the hosted inference endpoint; the model id is appended
    /// as a path segment per request.
    pub api_base_url: String,
    /// Which annotator backend is active (`"hf-endpoint"` or `"dummy"`).
    pub provider: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Socket address the web UI binds to.
    pub bind: String,
    pub log_level: String,
}

fn default_model_id() -> String {
    "modern-radgraph-xl".to_string()
}

fn default_api_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_provider() -> String {
    "hf-endpoint".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load config from `.env` in the working directory.
pub fn load() -> Result<Config, AppError> {
    load_from(Path::new(ENV_FILE))
}

/// Full load pipeline for an explicit path: read the file, export its
/// entries to the process environment, then resolve with process-env
/// precedence. Fails before any network activity when the file is absent
/// or the token key is missing.
pub fn load_from(path: &Path) -> Result<Config, AppError> {
    let file = read_env_file(path)?;

    // Export entries so the usual dotenv convention holds for the rest of
    // the process; variables already set in the environment are kept as-is.
    dotenvy::from_path(path)
        .map_err(|e| AppError::Config(format!("cannot load '{}': {e}", path.display())))?;

    resolve(|key| env::var(key).ok().or_else(|| file.get(key).cloned()))
}

/// Parse the key=value file into a map, with an actionable error when the
/// file is missing entirely.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>, AppError> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "environment file '{}' not found — copy .env.example to .env and set {TOKEN_KEY}",
            path.display()
        )));
    }

    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| AppError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let mut map = HashMap::new();
    for item in iter {
        let (key, value) = item
            .map_err(|e| AppError::Config(format!("malformed entry in '{}': {e}", path.display())))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Resolve a [`Config`] through a key lookup.
///
/// `load_from` passes a process-env-over-file lookup; tests pass plain maps
/// instead of mutating the environment.
fn resolve<F>(get: F) -> Result<Config, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_token = get(TOKEN_KEY)
        .or_else(|| TOKEN_FALLBACK_KEYS.iter().find_map(|k| get(k)))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            AppError::Config(format!(
                "{TOKEN_KEY} is not set — add a Hugging Face access token to .env"
            ))
        })?;

    let timeout_seconds = match get("RADGRAPH_TIMEOUT_SECONDS") {
        Some(v) => v.parse().map_err(|_| {
            AppError::Config(format!(
                "RADGRAPH_TIMEOUT_SECONDS must be a positive integer, got '{v}'"
            ))
        })?,
        None => default_timeout_seconds(),
    };

    let log_level = get("RADANNOTATE_LOG_LEVEL").unwrap_or_else(default_log_level);
    logger::parse_level(&log_level)?;

    Ok(Config {
        api_token,
        model_id: get("RADGRAPH_MODEL_ID").unwrap_or_else(default_model_id),
        api_base_url: get("RADGRAPH_API_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(default_api_base_url),
        provider: get("RADGRAPH_PROVIDER").unwrap_or_else(default_provider),
        timeout_seconds,
        bind: get("RADANNOTATE_BIND").unwrap_or_else(default_bind),
        log_level,
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy annotator, no real token, no network.
#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Self {
            api_token: "test-token".into(),
            model_id: "test-model".into(),
            api_base_url: "http://localhost:0/models".into(),
            provider: "dummy".into(),
            timeout_seconds: 1,
            bind: "127.0.0.1:0".into(),
            log_level: "info".into(),
        }
    }
}
