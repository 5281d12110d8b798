//! Annotator backend implementations.
//!
//! `build(config)` is the factory — called once at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod hf_endpoint;

use crate::config::Config;
use crate::radgraph::{AnnotatorProvider, ProviderError};

/// Construct an [`AnnotatorProvider`] from the resolved config.
pub fn build(config: &Config) -> Result<AnnotatorProvider, ProviderError> {
    match config.provider.as_str() {
        "hf-endpoint" => {
            let p = hf_endpoint::HfEndpointProvider::new(
                config.api_base_url.clone(),
                config.api_token.clone(),
                config.timeout_seconds,
            )?;
            Ok(AnnotatorProvider::HfEndpoint(p))
        }
        "dummy" => Ok(AnnotatorProvider::Dummy(dummy::DummyProvider)),
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}
