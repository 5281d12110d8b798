//! Normalization of raw model output into entity and relation tables.
//!
//! Graph-extraction models return several output shapes depending on the
//! wrapper version: a single document object, a batch array, or a
//! model/annotations pair. [`normalize_outputs`] flattens all of them into
//! one object per document; [`Annotation::from_output`] then extracts the
//! tables, tolerating the field-name variants seen in the wild.
//! Unrecognized shapes yield empty tables, never an error — the raw JSON is
//! always kept for display.

use serde::Serialize;
use serde_json::{Value, json};

/// One extracted entity row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: String,
    pub text: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

/// One extracted relation row. `source` and `target` are entity ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// A fully-processed annotation for a single document.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub raw: Value,
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

/// Flatten raw model output into one JSON object per document.
///
/// - a single object is a one-document batch
/// - a two-element array whose second element is an array and whose first is
///   not an object is the model/annotations pair shape — the annotations win
/// - any non-object document is wrapped as `{"raw": <value>}`
pub fn normalize_outputs(raw: Value) -> Vec<Value> {
    let docs = match raw {
        Value::Object(_) => vec![raw],
        Value::Array(items) => {
            let is_pair_shape = items.len() == 2
                && !items[0].is_object()
                && items[1].is_array();
            if is_pair_shape {
                match items.into_iter().nth(1) {
                    Some(Value::Array(inner)) => inner,
                    _ => Vec::new(),
                }
            } else {
                items
            }
        }
        other => vec![other],
    };

    docs.into_iter()
        .map(|doc| {
            if doc.is_object() {
                doc
            } else {
                json!({ "raw": doc })
            }
        })
        .collect()
}

impl Annotation {
    /// Extract entity and relation tables from one normalized document.
    pub fn from_output(output: Value) -> Self {
        let entities = extract_entities(&output);
        let relations = extract_relations(&output);
        Self { raw: output, entities, relations }
    }
}

fn extract_entities(output: &Value) -> Vec<Entity> {
    let Some(map) = output.get("entities").and_then(Value::as_object) else {
        return Vec::new();
    };

    map.iter()
        .map(|(id, ent)| Entity {
            id: id.clone(),
            text: first_text(ent, &["text", "tokens", "tokens_text", "tokens_text_joined"]),
            label: ent
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            start: ent.get("start").and_then(Value::as_i64),
            end: ent.get("end").and_then(Value::as_i64),
        })
        .collect()
}

fn extract_relations(output: &Value) -> Vec<Relation> {
    let Some(items) = output.get("relations").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|rel| match rel {
            Value::Object(_) => {
                let source = first_id(rel, &["source", "from", "head"])?;
                let target = first_id(rel, &["target", "to", "tail"])?;
                let label = first_text(rel, &["label", "type"]);
                Some(Relation { source, target, label })
            }
            Value::Array(parts) if parts.len() >= 3 => Some(Relation {
                source: id_string(&parts[0]),
                target: id_string(&parts[1]),
                label: id_string(&parts[2]),
            }),
            _ => None,
        })
        .collect()
}

/// First present of `keys` rendered as display text. Token arrays are joined
/// with spaces; anything else falls through to [`id_string`].
fn first_text(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| value.get(k))
        .map(|v| match v {
            Value::Array(tokens) => tokens
                .iter()
                .map(id_string)
                .collect::<Vec<_>>()
                .join(" "),
            other => id_string(other),
        })
        .unwrap_or_default()
}

/// First present of `keys` as an id, skipping nulls.
fn first_id(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(k))
        .filter(|v| !v.is_null())
        .map(id_string)
}

/// Render a scalar JSON value as a plain string (no surrounding quotes).
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── CSV rendering ─────────────────────────────────────────────────────────────

/// Entities table as CSV, header included.
pub fn entities_csv(entities: &[Entity]) -> String {
    let mut out = String::from("id,text,label,start,end\n");
    for e in entities {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&e.id),
            csv_field(&e.text),
            csv_field(&e.label),
            e.start.map(|v| v.to_string()).unwrap_or_default(),
            e.end.map(|v| v.to_string()).unwrap_or_default(),
        ));
    }
    out
}

/// Relations table as CSV, header included.
pub fn relations_csv(relations: &[Relation]) -> String {
    let mut out = String::from("source,target,label\n");
    for r in relations {
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(&r.source),
            csv_field(&r.target),
            csv_field(&r.label),
        ));
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_object_is_one_document() {
        let docs = normalize_outputs(json!({"entities": {}}));
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_object());
    }

    #[test]
    fn array_is_one_document_each() {
        let docs = normalize_outputs(json!([{"a": 1}, {"b": 2}]));
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn pair_shape_collapses_to_annotations() {
        let docs = normalize_outputs(json!(["model-handle", [{"entities": {}}, {"entities": {}}]]));
        assert_eq!(docs.len(), 2);
        assert!(docs[0].get("entities").is_some());
    }

    #[test]
    fn two_object_array_is_not_pair_shape() {
        let docs = normalize_outputs(json!([{"a": 1}, {"b": 2}]));
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["a"], 1);
    }

    #[test]
    fn non_object_documents_wrapped() {
        let docs = normalize_outputs(json!(["just a string"]));
        assert_eq!(docs[0]["raw"], "just a string");

        let docs = normalize_outputs(json!(42));
        assert_eq!(docs[0]["raw"], 42);
    }

    #[test]
    fn entities_extracted_with_spans() {
        let ann = Annotation::from_output(json!({
            "entities": {
                "1": {"text": "effusion", "label": "OBS-DP", "start": 12, "end": 12},
                "2": {"text": "small", "label": "OBS-DP"}
            }
        }));
        assert_eq!(ann.entities.len(), 2);
        let first = ann.entities.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(first.text, "effusion");
        assert_eq!(first.label, "OBS-DP");
        assert_eq!(first.start, Some(12));
        let second = ann.entities.iter().find(|e| e.id == "2").unwrap();
        assert_eq!(second.start, None);
    }

    #[test]
    fn entity_text_falls_back_to_tokens() {
        let ann = Annotation::from_output(json!({
            "entities": {
                "1": {"tokens": ["right", "lower", "lobe"], "label": "ANAT-DP"}
            }
        }));
        assert_eq!(ann.entities[0].text, "right lower lobe");
    }

    #[test]
    fn relations_accept_alternate_field_names() {
        let ann = Annotation::from_output(json!({
            "relations": [
                {"source": "1", "target": "2", "label": "modify"},
                {"from": "3", "to": "4", "type": "located_at"},
                {"head": 5, "tail": 6, "label": "suggestive_of"}
            ]
        }));
        assert_eq!(ann.relations.len(), 3);
        assert_eq!(ann.relations[1].source, "3");
        assert_eq!(ann.relations[1].label, "located_at");
        assert_eq!(ann.relations[2].source, "5");
    }

    #[test]
    fn relations_accept_triple_arrays() {
        let ann = Annotation::from_output(json!({
            "relations": [["1", "2", "modify"]]
        }));
        assert_eq!(
            ann.relations[0],
            Relation { source: "1".into(), target: "2".into(), label: "modify".into() }
        );
    }

    #[test]
    fn malformed_rows_skipped() {
        let ann = Annotation::from_output(json!({
            "relations": [
                {"source": "1"},
                ["lonely"],
                {"source": "1", "target": "2", "label": "modify"}
            ]
        }));
        assert_eq!(ann.relations.len(), 1);
    }

    #[test]
    fn unrecognized_shape_yields_empty_tables() {
        let ann = Annotation::from_output(json!({"ner": [], "sentences": []}));
        assert!(ann.entities.is_empty());
        assert!(ann.relations.is_empty());
        assert_eq!(ann.raw["ner"], json!([]));
    }

    #[test]
    fn entities_csv_renders_rows() {
        let csv = entities_csv(&[Entity {
            id: "1".into(),
            text: "pleural effusion".into(),
            label: "OBS-DP".into(),
            start: Some(10),
            end: Some(11),
        }]);
        assert_eq!(csv, "id,text,label,start,end\n1,pleural effusion,OBS-DP,10,11\n");
    }

    #[test]
    fn csv_quotes_delimiters_and_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn relations_csv_empty_is_header_only() {
        assert_eq!(relations_csv(&[]), "source,target,label\n");
    }
}
