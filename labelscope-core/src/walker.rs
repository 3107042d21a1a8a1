use crate::accumulator::FieldAccumulator;
use crate::config::AnalyzerConfig;
use crate::markup::{looks_like_markup, MarkupInspector};
use crate::types::FieldPath;
use serde_json::Value;
use std::collections::BTreeMap;

/// Recursive traversal engine. Visits one document tree, classifies each
/// leaf value, and routes it to the accumulator for its field path,
/// delegating markup-like strings to the inspector. Re-entrant: repeated
/// calls with different documents mutate only the shared collection, so
/// walking the same document twice doubles every count exactly.
pub struct SchemaWalker<'a> {
    config: &'a AnalyzerConfig,
    inspector: &'a dyn MarkupInspector,
}

impl<'a> SchemaWalker<'a> {
    pub fn new(config: &'a AnalyzerConfig, inspector: &'a dyn MarkupInspector) -> Self {
        Self { config, inspector }
    }

    /// Traverse one document (or sub-document), updating the shared
    /// accumulator collection. `prefix` is either empty or ends with `.`.
    ///
    /// Nesting depth is bounded in practice by serde_json's own parser
    /// recursion limit, so plain recursion cannot outrun the input.
    pub fn visit(
        &self,
        document: &serde_json::Map<String, Value>,
        prefix: &str,
        stats: &mut BTreeMap<FieldPath, FieldAccumulator>,
    ) {
        for (key, value) in document {
            let field_key = format!("{prefix}{key}");

            match value {
                Value::Object(nested) => {
                    // Only leaves accumulate; the object itself gets no entry
                    self.visit(nested, &format!("{field_key}."), stats);
                }
                Value::Array(items) => {
                    stats
                        .entry(field_key.clone())
                        .or_default()
                        .record_array(items.len(), self.config);
                    // First element only. A documented simplification, not
                    // per-index schema tracking
                    if let Some(Value::Object(first)) = items.first() {
                        self.visit(first, &format!("{field_key}[0]."), stats);
                    }
                }
                Value::String(text) => {
                    let acc = stats.entry(field_key).or_default();
                    if looks_like_markup(text) {
                        let analysis = self.inspector.inspect(text);
                        if analysis.tags.is_empty() {
                            // The heuristic over-matched: no actual elements
                            acc.record_text(text, self.config);
                        } else {
                            acc.record_markup(text, &analysis);
                        }
                    } else {
                        acc.record_text(text, self.config);
                    }
                }
                Value::Number(n) => {
                    stats
                        .entry(field_key)
                        .or_default()
                        .record_scalar(n.to_string(), self.config);
                }
                Value::Bool(b) => {
                    stats
                        .entry(field_key)
                        .or_default()
                        .record_scalar(b.to_string(), self.config);
                }
                Value::Null => {
                    stats
                        .entry(field_key)
                        .or_default()
                        .record_scalar("null".to_string(), self.config);
                }
            }
        }
    }
}
