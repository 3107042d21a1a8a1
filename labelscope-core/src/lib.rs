// Labelscope Core Library
//
// Schema profiling for drug-label JSON corpora. Walks arbitrarily nested
// label documents, accumulates per-field statistics (including embedded-HTML
// structure), and folds them into a deterministic report.

pub mod accumulator;
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod markup;
pub mod report;
pub mod storage;
pub mod types;
pub mod walker;

// Re-export main types and functions for easy use
pub use accumulator::FieldAccumulator;
pub use analyzer::{documents_from_str, CorpusProcessor, LabelAnalyzer};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use markup::{looks_like_markup, MarkupInspector, XmlMarkupInspector};
pub use report::ReportBuilder;
pub use types::*;
pub use walker::SchemaWalker;
