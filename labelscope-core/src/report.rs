use crate::accumulator::FieldAccumulator;
use crate::config::AnalyzerConfig;
use crate::types::*;
use chrono::Utc;
use std::collections::BTreeMap;

/// Folds the final accumulator collection into an immutable Report.
/// A single pure pass: nothing here mutates the accumulators.
pub struct ReportBuilder<'a> {
    config: &'a AnalyzerConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, stats: &BTreeMap<FieldPath, FieldAccumulator>) -> Report {
        let mut field_analysis = BTreeMap::new();
        let mut html_fields = Vec::new();
        let mut key_sections = Vec::new();

        for (field, acc) in stats {
            let info = derive_field_info(acc);

            if info.is_html {
                html_fields.push(field.clone());
            }

            let lowered = field.to_lowercase();
            if self
                .config
                .key_section_keywords
                .iter()
                .any(|keyword| lowered.contains(keyword))
            {
                key_sections.push(field.clone());
            }

            field_analysis.insert(field.clone(), info);
        }

        Report {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            total_fields: stats.len(),
            field_analysis,
            html_fields,
            key_sections,
            data_structure: build_structure_tree(stats),
        }
    }
}

/// Derive the report-facing view of one accumulator. Sets become
/// lexicographically sorted vectors so output is reproducible.
fn derive_field_info(acc: &FieldAccumulator) -> FieldInfo {
    let mut html_tags: Vec<String> = acc.html_tags.iter().cloned().collect();
    html_tags.sort();
    let mut section_codes: Vec<String> = acc.section_codes.iter().cloned().collect();
    section_codes.sort();

    FieldInfo {
        occurrences: acc.count,
        max_length: acc.max_length,
        samples: acc.samples.clone(),
        is_html: acc.is_html(),
        html_tags,
        has_tables: acc.has_tables,
        has_lists: acc.has_lists,
        section_codes,
    }
}

/// Rebuild the hierarchical tree by splitting every field path on `.` and
/// inserting into nested mappings.
///
/// Collision policy (leaf wins): because the accumulator map iterates in
/// path order, a path that is also a prefix of longer paths becomes a leaf
/// first; the longer paths are then skipped with a warning instead of
/// silently replacing the leaf. A leaf landing where a branch already
/// exists likewise leaves the branch intact.
fn build_structure_tree(
    stats: &BTreeMap<FieldPath, FieldAccumulator>,
) -> BTreeMap<String, StructureNode> {
    let mut tree: BTreeMap<String, StructureNode> = BTreeMap::new();

    'paths: for (field, acc) in stats {
        let parts: Vec<&str> = field.split('.').collect();
        let mut current = &mut tree;

        for part in &parts[..parts.len() - 1] {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| StructureNode::Branch(BTreeMap::new()));
            match entry {
                StructureNode::Branch(children) => current = children,
                StructureNode::Leaf(_) => {
                    println!(
                        "⚠️  Structure tree: '{}' is both a field and a prefix of '{}', keeping the leaf",
                        part, field
                    );
                    continue 'paths;
                }
            }
        }

        let leaf_name = parts[parts.len() - 1].to_string();
        match current.entry(leaf_name) {
            std::collections::btree_map::Entry::Occupied(e) => {
                // Branch already built from longer sibling paths
                println!(
                    "⚠️  Structure tree: '{}' already present as a {}, skipping leaf insert",
                    field,
                    if e.get().is_leaf() { "leaf" } else { "branch" }
                );
            }
            std::collections::btree_map::Entry::Vacant(e) => {
                let node_type = if acc.is_html() { "html" } else { "text" };
                e.insert(StructureNode::Leaf(StructureLeaf {
                    node_type: node_type.to_string(),
                    occurrences: acc.count,
                }));
            }
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MarkupAnalysis;

    fn build(stats: &BTreeMap<FieldPath, FieldAccumulator>) -> Report {
        let config = AnalyzerConfig::default();
        ReportBuilder::new(&config).build(stats)
    }

    fn text_acc(sample: &str) -> FieldAccumulator {
        let mut acc = FieldAccumulator::default();
        acc.record_text(sample, &AnalyzerConfig::default());
        acc
    }

    fn html_acc(tags: &[&str]) -> FieldAccumulator {
        let mut acc = FieldAccumulator::default();
        let mut analysis = MarkupAnalysis::default();
        for t in tags {
            analysis.tags.insert(t.to_string());
        }
        analysis.text_preview = "preview".to_string();
        acc.record_markup("<x/>", &analysis);
        acc
    }

    #[test]
    fn empty_corpus_yields_empty_report() {
        let report = build(&BTreeMap::new());
        assert_eq!(report.total_fields, 0);
        assert!(report.field_analysis.is_empty());
        assert!(report.html_fields.is_empty());
        assert!(report.key_sections.is_empty());
        assert!(report.data_structure.is_empty());
    }

    #[test]
    fn html_fields_and_key_sections_derived() {
        let mut stats = BTreeMap::new();
        stats.insert("name".to_string(), text_acc("Aspirin"));
        stats.insert("warnings".to_string(), html_acc(&["p"]));
        stats.insert("dosage_and_administration".to_string(), text_acc("daily"));

        let report = build(&stats);
        assert_eq!(report.total_fields, 3);
        assert_eq!(report.html_fields, vec!["warnings"]);
        assert_eq!(
            report.key_sections,
            vec!["dosage_and_administration", "warnings"]
        );
        assert!(report.field_analysis["warnings"].is_html);
        assert!(!report.field_analysis["name"].is_html);
    }

    #[test]
    fn key_section_match_is_case_insensitive_substring() {
        let mut stats = BTreeMap::new();
        stats.insert("BoxedWARNING".to_string(), text_acc("x"));
        stats.insert("openfda.generic_name".to_string(), text_acc("y"));

        let report = build(&stats);
        assert_eq!(report.key_sections, vec!["BoxedWARNING"]);
    }

    #[test]
    fn html_tags_sorted_lexicographically() {
        let mut stats = BTreeMap::new();
        stats.insert("w".to_string(), html_acc(&["ul", "b", "p", "li"]));

        let report = build(&stats);
        assert_eq!(report.field_analysis["w"].html_tags, vec!["b", "li", "p", "ul"]);
    }

    #[test]
    fn structure_tree_nests_on_dots() {
        let mut stats = BTreeMap::new();
        stats.insert("openfda.brand_name".to_string(), text_acc("A"));
        stats.insert("openfda.route".to_string(), text_acc("ORAL"));
        stats.insert("id".to_string(), text_acc("x"));

        let report = build(&stats);
        assert!(matches!(report.data_structure["id"], StructureNode::Leaf(_)));
        match &report.data_structure["openfda"] {
            StructureNode::Branch(children) => {
                assert_eq!(children.len(), 2);
                match &children["brand_name"] {
                    StructureNode::Leaf(leaf) => {
                        assert_eq!(leaf.node_type, "text");
                        assert_eq!(leaf.occurrences, 1);
                    }
                    other => panic!("expected leaf, got {other:?}"),
                }
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn array_index_marker_stays_inside_segment() {
        let mut stats = BTreeMap::new();
        stats.insert("results[0].x".to_string(), text_acc("1"));

        let report = build(&stats);
        match &report.data_structure["results[0]"] {
            StructureNode::Branch(children) => assert!(children.contains_key("x")),
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn leaf_wins_over_later_branch() {
        // "a" is both an accumulation leaf and a prefix of "a.b"
        let mut stats = BTreeMap::new();
        stats.insert("a".to_string(), text_acc("leaf"));
        stats.insert("a.b".to_string(), text_acc("nested"));

        let report = build(&stats);
        // The leaf is kept; the longer path is only in field_analysis
        assert!(report.data_structure["a"].is_leaf());
        assert_eq!(report.total_fields, 2);
        assert!(report.field_analysis.contains_key("a.b"));
    }

    #[test]
    fn report_serializes_with_literal_dots_in_keys() {
        let mut stats = BTreeMap::new();
        stats.insert("openfda.route".to_string(), text_acc("ORAL"));

        let report = build(&stats);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["field_analysis"]["openfda.route"].is_object());
        assert_eq!(json["schema_version"], REPORT_SCHEMA_VERSION);
        // Leaf serializes flat: {"type": "...", "occurrences": n}
        assert_eq!(json["data_structure"]["openfda"]["route"]["type"], "text");
    }
}
