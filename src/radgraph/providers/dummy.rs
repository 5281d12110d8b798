//! Dummy annotator — returns a fixed annotation shaped like real model
//! output. Used for tests and offline runs of the full UI round-trip
//! without a real token.

use serde_json::{Value, json};

use crate::radgraph::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn annotate(&self, report: &str, model_id: &str) -> Result<Value, ProviderError> {
        Ok(json!({
            "model": model_id,
            "text": report,
            "entities": {
                "1": {"tokens": "effusion", "label": "OBS-DP", "start": 14, "end": 14},
                "2": {"tokens": "small", "label": "OBS-DP", "start": 12, "end": 12},
                "3": {"tokens": "pleural", "label": "ANAT-DP", "start": 13, "end": 13}
            },
            "relations": [
                {"source": "2", "target": "1", "label": "modify"},
                {"source": "1", "target": "3", "label": "located_at"}
            ]
        }))
    }
}
