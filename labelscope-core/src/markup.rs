//! Embedded-markup inspection.
//!
//! Drug-label JSON frequently embeds HTML fragments inside string fields:
//! section bodies with `<p>`/`<h1>` structure, adverse-reaction tables,
//! bulleted lists, and `data-sectioncode` attributes tagging content blocks.
//! This module detects markup-like strings and inspects them with a lenient
//! event-based scan. Malformed or partial fragments never fail: the scan
//! stops at the first parse error and returns whatever it collected.

use crate::accumulator::truncate_chars;
use crate::config::AnalyzerConfig;
use crate::types::MarkupAnalysis;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Permissive structural heuristic, not a validating parser: any <...>
// substring marks the value as markup-like.
static MARKUP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Check whether a string value looks like it contains markup.
pub fn looks_like_markup(text: &str) -> bool {
    MARKUP_REGEX.is_match(text)
}

/// The markup-analysis seam. The walker calls this synchronously for every
/// string value that looks markup-like; implementations must degrade to
/// empty results on unparsable input rather than fail.
pub trait MarkupInspector {
    fn inspect(&self, markup: &str) -> MarkupAnalysis;
}

/// Event-based inspector built on quick-xml with lenient reader settings.
pub struct XmlMarkupInspector {
    section_code_attr: String,
    table_tags: HashSet<String>,
    list_tags: HashSet<String>,
    preview_chars: usize,
}

impl XmlMarkupInspector {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            section_code_attr: config.section_code_attr.to_lowercase(),
            table_tags: config.table_tags.iter().map(|t| t.to_lowercase()).collect(),
            list_tags: config.list_tags.iter().map(|t| t.to_lowercase()).collect(),
            preview_chars: config.markup_preview_chars,
        }
    }

    fn visit_element(&self, e: &quick_xml::events::BytesStart, analysis: &mut MarkupAnalysis) {
        let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_lowercase();

        // A real tag name starts with a letter. Bare comparison spans like
        // "< 3 and 4 >" parse as elements with empty or numeric names;
        // those are text, not markup, and must leave the analysis untouched.
        if !tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return;
        }

        if self.table_tags.contains(&tag) {
            analysis.has_table = true;
        }
        if self.list_tags.contains(&tag) {
            analysis.has_list = true;
        }

        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_lowercase();
            if key == self.section_code_attr {
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                if !value.is_empty() {
                    analysis.section_codes.insert(value);
                }
            }
        }

        analysis.tags.insert(tag);
    }

    fn append_preview(&self, text: &str, preview: &mut String) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let remaining = self
            .preview_chars
            .saturating_sub(preview.chars().count());
        if remaining == 0 {
            return;
        }
        if !preview.is_empty() {
            preview.push(' ');
        }
        preview.push_str(&truncate_chars(trimmed, remaining));
    }
}

impl MarkupInspector for XmlMarkupInspector {
    fn inspect(&self, markup: &str) -> MarkupAnalysis {
        let mut analysis = MarkupAnalysis::default();

        let mut reader = Reader::from_str(markup);
        // HTML fragments routinely have unmatched or mismatched end tags
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut preview = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    self.visit_element(&e, &mut analysis);
                }
                Ok(Event::Text(t)) => {
                    // Bare & and unknown entities are common in label HTML
                    let text = t
                        .unescape()
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    self.append_preview(&text, &mut preview);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                // Degrade gracefully: keep what was collected so far
                Err(_) => break,
            }
        }

        analysis.text_preview = preview;
        analysis
    }
}
