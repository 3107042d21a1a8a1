use crate::config::AnalyzerConfig;
use crate::types::MarkupAnalysis;
use std::collections::HashSet;

/// Everything ever observed at one field path. Created lazily on the first
/// observation, mutated on every subsequent one, never deleted.
///
/// Invariants: `count >= samples.len()`; `has_tables`/`has_lists` and both
/// sets are monotone (observations only add); a field is markup-bearing iff
/// `html_tags` is non-empty, and that classification cannot revert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldAccumulator {
    /// Incremented once per observed value at this path
    pub count: u64,
    /// First-come retained samples, bounded by `sample_limit`
    pub samples: Vec<String>,
    /// Maximum observed text length, in characters
    pub max_length: usize,
    /// Distinct markup tag names ever seen at this path
    pub html_tags: HashSet<String>,
    pub has_tables: bool,
    pub has_lists: bool,
    /// Distinct section-code attribute values ever seen at this path
    pub section_codes: HashSet<String>,
}

impl FieldAccumulator {
    /// Record an array value: one count, one bounded sample noting its length.
    pub fn record_array(&mut self, len: usize, config: &AnalyzerConfig) {
        self.count += 1;
        self.push_sample(format!("[Array with {} items]", len), config);
    }

    /// Record a plain-text value.
    pub fn record_text(&mut self, text: &str, config: &AnalyzerConfig) {
        self.count += 1;
        self.max_length = self.max_length.max(text.chars().count());
        let sample = if text.chars().count() > config.sample_preview_chars {
            format!("{}...", truncate_chars(text, config.sample_preview_chars))
        } else {
            text.to_string()
        };
        self.push_sample(sample, config);
    }

    /// Record a markup-bearing text value: the length observation plus the
    /// inspector's findings. The markup-flagged preview is only stored when
    /// no sample has been recorded yet.
    pub fn record_markup(&mut self, text: &str, analysis: &MarkupAnalysis) {
        self.count += 1;
        self.max_length = self.max_length.max(text.chars().count());

        if self.samples.is_empty() {
            self.samples
                .push(format!("[HTML] {}...", analysis.text_preview));
        }

        self.html_tags.extend(analysis.tags.iter().cloned());
        self.section_codes
            .extend(analysis.section_codes.iter().cloned());
        self.has_tables |= analysis.has_table;
        self.has_lists |= analysis.has_list;
    }

    /// Record any other scalar (number, boolean, null) by its string form.
    pub fn record_scalar(&mut self, display: String, config: &AnalyzerConfig) {
        self.count += 1;
        self.push_sample(display, config);
    }

    fn push_sample(&mut self, sample: String, config: &AnalyzerConfig) {
        if self.samples.len() < config.sample_limit {
            self.samples.push(sample);
        }
    }

    /// Combine two partial accumulations of the same field path. Counts add,
    /// max-length takes the max, samples concatenate then truncate to the
    /// limit, sets union, flags OR. Intended for callers that partition a
    /// corpus by document and merge afterwards.
    pub fn merge(&mut self, other: FieldAccumulator, config: &AnalyzerConfig) {
        self.count += other.count;
        self.max_length = self.max_length.max(other.max_length);
        self.samples.extend(other.samples);
        self.samples.truncate(config.sample_limit);
        self.html_tags.extend(other.html_tags);
        self.section_codes.extend(other.section_codes);
        self.has_tables |= other.has_tables;
        self.has_lists |= other.has_lists;
    }

    /// Markup-bearing iff at least one tag was ever seen here.
    pub fn is_html(&self) -> bool {
        !self.html_tags.is_empty()
    }
}

/// Truncate to at most `limit` characters, respecting char boundaries.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig::default()
    }

    #[test]
    fn samples_capped_at_limit() {
        let config = config();
        let mut acc = FieldAccumulator::default();
        for i in 0..10 {
            acc.record_scalar(i.to_string(), &config);
        }
        assert_eq!(acc.count, 10);
        assert_eq!(acc.samples, vec!["0", "1", "2"]);
    }

    #[test]
    fn long_text_sample_truncated_with_ellipsis() {
        let config = config();
        let mut acc = FieldAccumulator::default();
        let long = "x".repeat(250);
        acc.record_text(&long, &config);
        assert_eq!(acc.max_length, 250);
        assert_eq!(acc.samples.len(), 1);
        assert_eq!(acc.samples[0].chars().count(), 103); // 100 + "..."
        assert!(acc.samples[0].ends_with("..."));
    }

    #[test]
    fn short_text_sample_kept_verbatim() {
        let config = config();
        let mut acc = FieldAccumulator::default();
        acc.record_text("Aspirin", &config);
        assert_eq!(acc.samples, vec!["Aspirin"]);
    }

    #[test]
    fn max_length_is_monotone_true_maximum() {
        let config = config();
        let mut acc = FieldAccumulator::default();
        acc.record_text("abcdef", &config);
        acc.record_text("ab", &config);
        acc.record_text("abcd", &config);
        assert_eq!(acc.max_length, 6);
    }

    #[test]
    fn markup_classification_is_stable() {
        let config = config();
        let mut acc = FieldAccumulator::default();
        acc.record_text("plain", &config);
        assert!(!acc.is_html());

        let mut analysis = MarkupAnalysis::default();
        analysis.tags.insert("b".to_string());
        analysis.text_preview = "bold".to_string();
        acc.record_markup("<b>bold</b>", &analysis);
        assert!(acc.is_html());

        // Further plain observations do not unmark the field
        acc.record_text("plain again", &config);
        assert!(acc.is_html());
        assert_eq!(acc.count, 3);
    }

    #[test]
    fn markup_preview_only_stored_when_no_sample_yet() {
        let config = config();
        let mut acc = FieldAccumulator::default();
        acc.record_text("first", &config);

        let mut analysis = MarkupAnalysis::default();
        analysis.tags.insert("p".to_string());
        analysis.text_preview = "para".to_string();
        acc.record_markup("<p>para</p>", &analysis);

        assert_eq!(acc.samples, vec!["first"]);
    }

    #[test]
    fn flags_are_monotone() {
        let mut acc = FieldAccumulator::default();

        let mut with_table = MarkupAnalysis::default();
        with_table.tags.insert("table".to_string());
        with_table.has_table = true;
        acc.record_markup("<table/>", &with_table);

        let mut plain = MarkupAnalysis::default();
        plain.tags.insert("p".to_string());
        acc.record_markup("<p/>", &plain);

        assert!(acc.has_tables);
        assert!(!acc.has_lists);
    }

    #[test]
    fn merge_follows_documented_rule() {
        let config = config();
        let mut a = FieldAccumulator::default();
        a.record_text("one", &config);
        a.record_text("two", &config);

        let mut b = FieldAccumulator::default();
        b.record_text("a much longer value here", &config);
        b.record_text("three", &config);
        let mut analysis = MarkupAnalysis::default();
        analysis.tags.insert("i".to_string());
        analysis.has_list = true;
        b.record_markup("<i>x</i><ul/>", &analysis);

        a.merge(b, &config);
        assert_eq!(a.count, 5);
        assert_eq!(a.max_length, 24);
        assert_eq!(a.samples.len(), 3); // concat then truncate
        assert!(a.html_tags.contains("i"));
        assert!(a.has_lists);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
    }
}
