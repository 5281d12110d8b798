//! Annotator provider abstraction.
//!
//! `AnnotatorProvider` is an enum over concrete backends. Add a new variant +
//! module in `providers/` for each additional inference host.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Enum dispatch avoids `dyn` trait objects; `annotate` is an `async fn` on
//! the enum so callers need no trait-object machinery.

pub mod providers;

use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("inference request failed: {0}")]
    Request(String),
    #[error("inference endpoint error: {0}")]
    Api(String),
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available annotator backends.
#[derive(Debug, Clone)]
pub enum AnnotatorProvider {
    HfEndpoint(providers::hf_endpoint::HfEndpointProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl AnnotatorProvider {
    /// Send `report` to the backend and return its raw structured output.
    /// One outbound call, no retries.
    pub async fn annotate(&self, report: &str, model_id: &str) -> Result<Value, ProviderError> {
        match self {
            AnnotatorProvider::HfEndpoint(p) => p.annotate(report, model_id).await,
            AnnotatorProvider::Dummy(p) => p.annotate(report, model_id).await,
        }
    }

    /// Lightweight reachability probe; never runs inference.
    pub async fn ping(&self) -> Result<(), ProviderError> {
        match self {
            AnnotatorProvider::HfEndpoint(p) => p.ping().await,
            AnnotatorProvider::Dummy(_) => Ok(()),
        }
    }

    /// Stable backend name used in health responses and logs.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotatorProvider::HfEndpoint(_) => "hf-endpoint",
            AnnotatorProvider::Dummy(_) => "dummy",
        }
    }
}
