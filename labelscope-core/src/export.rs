use crate::error::AnalyzerError;
use crate::types::*;
use std::fs;

impl Report {
    /// Flatten the per-field analysis into tabular rows, one per field path.
    pub fn to_field_summary_rows(&self) -> Vec<FieldSummaryRow> {
        self.field_analysis
            .iter()
            .map(|(field, info)| FieldSummaryRow {
                field_path: field.clone(),
                is_html: info.is_html,
                max_length: info.max_length,
                has_tables: info.has_tables,
                has_lists: info.has_lists,
                html_tags: info
                    .html_tags
                    .iter()
                    .take(10)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
                sample: info.samples.first().cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Render the tabular field summary as CSV text.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "field_path,is_html,max_length,has_tables,has_lists,html_tags,sample\n",
        );
        for row in self.to_field_summary_rows() {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                csv_escape(&row.field_path),
                row.is_html,
                row.max_length,
                row.has_tables,
                row.has_lists,
                csv_escape(&row.html_tags),
                csv_escape(&row.sample),
            ));
        }
        out
    }

    /// Render the human-readable textual summary.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}\n", "=".repeat(80)));
        out.push_str("DRUG LABEL JSON STRUCTURE ANALYSIS\n");
        out.push_str(&format!("{}\n", "=".repeat(80)));
        out.push_str(&format!("\nTotal unique fields found: {}\n", self.total_fields));

        out.push_str("\n📊 DATA STRUCTURE:\n");
        render_tree(&self.data_structure, 2, &mut out);

        out.push_str("\n📝 KEY MEDICAL SECTIONS:\n");
        for section in &self.key_sections {
            let info = &self.field_analysis[section];
            out.push_str(&format!("\n  • {}\n", section));
            out.push_str(&format!(
                "    - Type: {}\n",
                if info.is_html { "HTML" } else { "Text" }
            ));
            out.push_str(&format!("    - Max length: {} chars\n", info.max_length));
            if info.has_tables {
                out.push_str("    - Contains tables: Yes\n");
            }
            if info.has_lists {
                out.push_str("    - Contains lists: Yes\n");
            }
        }

        out.push_str("\n🔧 HTML CONTENT ANALYSIS:\n");
        for field in self.html_fields.iter().take(5) {
            let info = &self.field_analysis[field];
            out.push_str(&format!("\n  • {}\n", field));
            out.push_str(&format!(
                "    - HTML tags: {}\n",
                info.html_tags
                    .iter()
                    .take(10)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            if !info.section_codes.is_empty() {
                out.push_str(&format!(
                    "    - Section codes: {}\n",
                    info.section_codes
                        .iter()
                        .take(5)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }

        out.push_str("\n💡 INSIGHTS FOR PROCESSING:\n");
        out.push_str("  • The data contains both structured fields and HTML content\n");
        out.push_str("  • HTML sections will need parsing to extract clean text\n");
        out.push_str("  • Tables in adverse reactions will need special handling\n");
        out.push_str("  • Section codes can help identify content types\n");
        out.push_str("  • Consider extracting and structuring:\n");
        out.push_str("    - Drug identifiers (name, generic name, NDC)\n");
        out.push_str("    - Key sections as separate fields\n");
        out.push_str("    - Lists and tables as structured data\n");

        out
    }

    /// Save the report to `path` in the requested format:
    /// `report` (pretty JSON), `table` (CSV), or `summary` (plain text).
    pub fn save_with_format(&self, path: &str, format: &str) -> Result<(), AnalyzerError> {
        let contents = match format {
            "table" => self.to_csv(),
            "summary" => self.render_summary(),
            _ => serde_json::to_string_pretty(self)
                .map_err(AnalyzerError::ReportSerialization)?,
        };
        fs::write(path, contents).map_err(|source| AnalyzerError::Output {
            path: path.to_string(),
            source,
        })
    }
}

fn render_tree(tree: &std::collections::BTreeMap<String, StructureNode>, indent: usize, out: &mut String) {
    for (key, node) in tree {
        match node {
            StructureNode::Leaf(leaf) => {
                out.push_str(&format!(
                    "{}├── {} ({})\n",
                    " ".repeat(indent),
                    key,
                    leaf.node_type
                ));
            }
            StructureNode::Branch(children) => {
                out.push_str(&format!("{}├── {}/\n", " ".repeat(indent), key));
                render_tree(children, indent + 4, out);
            }
        }
    }
}

/// Quote a CSV field when it contains a comma, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::FieldAccumulator;
    use crate::config::AnalyzerConfig;
    use crate::report::ReportBuilder;
    use crate::types::MarkupAnalysis;
    use std::collections::BTreeMap;

    fn sample_report() -> Report {
        let config = AnalyzerConfig::default();
        let mut stats = BTreeMap::new();

        let mut name = FieldAccumulator::default();
        name.record_text("Aspirin, extended", &config);
        stats.insert("name".to_string(), name);

        let mut warnings = FieldAccumulator::default();
        let mut analysis = MarkupAnalysis::default();
        analysis.tags.insert("p".to_string());
        analysis.tags.insert("table".to_string());
        analysis.has_table = true;
        analysis.section_codes.insert("W1".to_string());
        analysis.text_preview = "Risk of bleeding".to_string();
        warnings.record_markup("<p>Risk of bleeding</p>", &analysis);
        stats.insert("warnings".to_string(), warnings);

        ReportBuilder::new(&config).build(&stats)
    }

    #[test]
    fn summary_rows_match_field_analysis() {
        let report = sample_report();
        let rows = report.to_field_summary_rows();
        assert_eq!(rows.len(), 2);

        let warnings = rows.iter().find(|r| r.field_path == "warnings").unwrap();
        assert!(warnings.is_html);
        assert!(warnings.has_tables);
        assert_eq!(warnings.html_tags, "p, table");
        assert_eq!(warnings.sample, "[HTML] Risk of bleeding...");
    }

    #[test]
    fn csv_has_header_and_quotes_embedded_commas() {
        let report = sample_report();
        let csv = report.to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "field_path,is_html,max_length,has_tables,has_lists,html_tags,sample"
        );
        // "Aspirin, extended" contains a comma, so it must be quoted
        assert!(csv.contains("\"Aspirin, extended\""));
        assert!(csv.contains("\"p, table\""));
    }

    #[test]
    fn csv_escapes_quotes_by_doubling() {
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("plain"), "plain");
    }

    #[test]
    fn summary_mentions_key_blocks() {
        let report = sample_report();
        let summary = report.render_summary();
        assert!(summary.contains("Total unique fields found: 2"));
        assert!(summary.contains("DATA STRUCTURE"));
        assert!(summary.contains("KEY MEDICAL SECTIONS"));
        assert!(summary.contains("warnings"));
        assert!(summary.contains("Section codes: W1"));
        assert!(summary.contains("INSIGHTS FOR PROCESSING"));
    }

    #[test]
    fn tree_rendering_marks_branches_and_leaves() {
        let config = AnalyzerConfig::default();
        let mut stats = BTreeMap::new();
        let mut acc = FieldAccumulator::default();
        acc.record_text("ORAL", &config);
        stats.insert("openfda.route".to_string(), acc);
        let report = ReportBuilder::new(&config).build(&stats);

        let summary = report.render_summary();
        assert!(summary.contains("├── openfda/"));
        assert!(summary.contains("├── route (text)"));
    }
}
