use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The schema version stamped on every report output.
/// Bump this when the output shape changes.
pub const REPORT_SCHEMA_VERSION: &str = "0.1.0";

/// A dot-joined field path, e.g. `openfda.brand_name` or `results[0].warnings`.
/// Array traversal is fixed to index 0, so the only index marker that ever
/// appears is `[0]`.
pub type FieldPath = String;

/// What the markup inspector found inside one markup-like string value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupAnalysis {
    /// Distinct tag names present (lowercased local names)
    pub tags: HashSet<String>,
    /// At least one table-representing element present
    pub has_table: bool,
    /// At least one ordered/unordered-list element present
    pub has_list: bool,
    /// Distinct values of the section-code attribute across all elements
    pub section_codes: HashSet<String>,
    /// Plain-text preview, bounded length
    pub text_preview: String,
}

impl MarkupAnalysis {
    /// True when the inspector found nothing at all, the degraded result
    /// for strings that only looked like markup.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.section_codes.is_empty()
            && !self.has_table
            && !self.has_list
            && self.text_preview.is_empty()
    }
}

/// The serialization-ready analysis report. Built once from the final
/// accumulator collection, immutable thereafter. Carries a schema version
/// so consumers can detect and handle shape changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub created_at: DateTime<Utc>,
    /// Number of distinct field paths observed across the corpus
    pub total_fields: usize,
    /// Per-field derived stats, keyed by field path (dots preserved literally)
    pub field_analysis: BTreeMap<FieldPath, FieldInfo>,
    /// Paths classified as markup-bearing, in path order
    pub html_fields: Vec<FieldPath>,
    /// Paths matching the key-section keyword set, in path order
    pub key_sections: Vec<FieldPath>,
    /// Hierarchical tree reconstructed from the field paths
    pub data_structure: BTreeMap<String, StructureNode>,
}

/// Derived, report-facing view of one FieldAccumulator.
/// Set-typed fields are sorted lexicographically so reports are
/// reproducible across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldInfo {
    pub occurrences: u64,
    pub max_length: usize,
    pub samples: Vec<String>,
    pub is_html: bool,
    pub html_tags: Vec<String>,
    pub has_tables: bool,
    pub has_lists: bool,
    pub section_codes: Vec<String>,
}

/// One level of the data-structure tree: either a branch of nested field
/// names or a leaf carrying the field's classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StructureNode {
    Leaf(StructureLeaf),
    Branch(BTreeMap<String, StructureNode>),
}

impl StructureNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, StructureNode::Leaf(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureLeaf {
    /// "html" when the field's tag set is non-empty, otherwise "text"
    #[serde(rename = "type")]
    pub node_type: String,
    pub occurrences: u64,
}

/// One row of the tabular field summary export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSummaryRow {
    pub field_path: FieldPath,
    pub is_html: bool,
    pub max_length: usize,
    pub has_tables: bool,
    pub has_lists: bool,
    /// Comma-joined, first 10 tags only
    pub html_tags: String,
    /// First retained sample, or empty
    pub sample: String,
}
