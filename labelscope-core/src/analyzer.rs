use crate::accumulator::FieldAccumulator;
use crate::cache::{ReportCacheKey, ReportCacheValue};
use crate::config::AnalyzerConfig;
use crate::error::{json_type_name, AnalyzerError};
use crate::markup::{MarkupInspector, XmlMarkupInspector};
use crate::report::ReportBuilder;
use crate::storage::{calculate_config_hash, calculate_input_hash, FileStorage, ReportStorage};
use crate::types::{FieldPath, Report};
use crate::walker::SchemaWalker;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// Parse a JSON source into the corpus document list. Accepts one top-level
/// object or an array of objects; anything else is an input error and the
/// run aborts with no partial report.
pub fn documents_from_str(input: &str) -> Result<Vec<Value>, AnalyzerError> {
    let parsed: Value = serde_json::from_str(input).map_err(AnalyzerError::InvalidJson)?;
    documents_from_value(parsed)
}

pub fn documents_from_value(parsed: Value) -> Result<Vec<Value>, AnalyzerError> {
    match parsed {
        Value::Object(_) => Ok(vec![parsed]),
        Value::Array(items) => {
            for item in &items {
                if !item.is_object() {
                    return Err(AnalyzerError::UnsupportedRoot {
                        found: json_type_name(item),
                    });
                }
            }
            Ok(items)
        }
        other => Err(AnalyzerError::UnsupportedRoot {
            found: json_type_name(&other),
        }),
    }
}

/// Walks label documents and accumulates per-field statistics. One analyzer
/// owns the accumulator map for the duration of one corpus analysis; the
/// report is an immutable snapshot taken at the end.
pub struct LabelAnalyzer {
    config: AnalyzerConfig,
    inspector: Box<dyn MarkupInspector>,
    field_stats: BTreeMap<FieldPath, FieldAccumulator>,
}

impl Default for LabelAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        let inspector = Box::new(XmlMarkupInspector::new(&config));
        Self::new_with_dependencies(config, inspector)
    }

    /// Create LabelAnalyzer with an injected markup inspector
    pub fn new_with_dependencies(
        config: AnalyzerConfig,
        inspector: Box<dyn MarkupInspector>,
    ) -> Self {
        Self {
            config,
            inspector,
            field_stats: BTreeMap::new(),
        }
    }

    /// Walk one document, merging its observations into the shared stats.
    pub fn analyze_document(&mut self, document: &Value) -> Result<(), AnalyzerError> {
        let object = document
            .as_object()
            .ok_or_else(|| AnalyzerError::UnsupportedRoot {
                found: json_type_name(document),
            })?;
        let walker = SchemaWalker::new(&self.config, self.inspector.as_ref());
        walker.visit(object, "", &mut self.field_stats);
        Ok(())
    }

    /// Analyze a JSON string holding one document or an array of documents.
    pub fn analyze_str(&mut self, input: &str) -> Result<Report, AnalyzerError> {
        let documents = documents_from_str(input)?;
        println!("📄 Analyzing {} label(s)", documents.len());
        for document in &documents {
            self.analyze_document(document)?;
        }
        Ok(self.report())
    }

    /// Analyze a JSON file holding one document or an array of documents.
    pub fn analyze_file(&mut self, path: &str) -> Result<Report, AnalyzerError> {
        let input = std::fs::read_to_string(path).map_err(|source| AnalyzerError::InputIo {
            path: path.to_string(),
            source,
        })?;
        self.analyze_str(&input)
    }

    /// Snapshot the current accumulation into an immutable report.
    pub fn report(&self) -> Report {
        ReportBuilder::new(&self.config).build(&self.field_stats)
    }

    /// Number of distinct field paths accumulated so far.
    pub fn field_count(&self) -> usize {
        self.field_stats.len()
    }
}

/// Cache-aware corpus pipeline: input bytes + config → report, with a
/// content-addressed report cache in front of the analysis.
pub struct CorpusProcessor {
    config: AnalyzerConfig,
    storage: Box<dyn ReportStorage + Send + Sync>,
}

impl CorpusProcessor {
    /// Create CorpusProcessor with full dependency injection
    pub fn new_with_dependencies(
        config: AnalyzerConfig,
        storage: Box<dyn ReportStorage + Send + Sync>,
    ) -> Self {
        Self { config, storage }
    }

    /// Convenience constructor for CLI usage with a file cache directory
    pub fn new_cli(config: AnalyzerConfig, cache_dir: &str) -> Result<Self> {
        let storage = Box::new(FileStorage::new(cache_dir)?);
        Ok(Self::new_with_dependencies(config, storage))
    }

    /// Analyze a corpus file, consulting and populating the report cache.
    pub fn process_file(&self, input_path: &str, skip_cache: bool) -> Result<Report> {
        let start_time = Instant::now();

        let input_bytes = std::fs::read(input_path).map_err(|source| AnalyzerError::InputIo {
            path: input_path.to_string(),
            source,
        })?;
        let input_hash = calculate_input_hash(&input_bytes);
        let config_hash = calculate_config_hash(&self.config)?;
        let cache_key = ReportCacheKey::new(input_hash, config_hash);

        if !skip_cache {
            if let Some(cached) = self.storage.get_report(&cache_key)? {
                println!("🎯 Cache hit: report for this corpus + config combination");
                println!(
                    "⏱️  Total analysis time: {:.3}s (cached)",
                    start_time.elapsed().as_secs_f64()
                );
                return Ok(cached.report);
            }
        } else {
            println!("🚫 Skipping cache lookup (--skip-cache enabled)");
        }

        println!("📄 Analyzing corpus: {}", input_path);

        let input_str = String::from_utf8_lossy(&input_bytes);
        let mut analyzer = LabelAnalyzer::with_config(self.config.clone());
        let report = analyzer.analyze_str(&input_str)?;

        if !skip_cache {
            let processing_time = start_time.elapsed().as_millis() as u64;
            let cache_value = ReportCacheValue::new(report.clone(), processing_time);
            self.storage.store_report(&cache_key, &cache_value)?;
        }

        println!(
            "⏱️  Total analysis time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }
}
