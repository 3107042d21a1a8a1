use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_sample_limit() -> usize {
    3
}

fn default_sample_preview_chars() -> usize {
    100
}

fn default_markup_preview_chars() -> usize {
    200
}

fn default_key_section_keywords() -> Vec<String> {
    vec![
        "indication".to_string(),
        "dosage".to_string(),
        "warning".to_string(),
        "adverse".to_string(),
        "clinical".to_string(),
    ]
}

fn default_section_code_attr() -> String {
    "data-sectioncode".to_string()
}

fn default_table_tags() -> Vec<String> {
    vec!["table".to_string()]
}

fn default_list_tags() -> Vec<String> {
    vec!["ul".to_string(), "ol".to_string()]
}

/// Tunables for one corpus analysis. All fields have sensible defaults so an
/// empty YAML file (or no file at all) produces the stock behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Maximum retained sample values per field
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,

    /// Plain-text samples longer than this are truncated and ellipsis-suffixed
    #[serde(default = "default_sample_preview_chars")]
    pub sample_preview_chars: usize,

    /// Length bound for the plain-text preview extracted from markup values
    #[serde(default = "default_markup_preview_chars")]
    pub markup_preview_chars: usize,

    /// Case-insensitive substrings that mark a field path as a key section
    #[serde(default = "default_key_section_keywords")]
    pub key_section_keywords: Vec<String>,

    /// Attribute carrying the section identifier on markup elements
    #[serde(default = "default_section_code_attr")]
    pub section_code_attr: String,

    /// Tag names considered table-representing
    #[serde(default = "default_table_tags")]
    pub table_tags: Vec<String>,

    /// Tag names considered list-representing
    #[serde(default = "default_list_tags")]
    pub list_tags: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_limit: default_sample_limit(),
            sample_preview_chars: default_sample_preview_chars(),
            markup_preview_chars: default_markup_preview_chars(),
            key_section_keywords: default_key_section_keywords(),
            section_code_attr: default_section_code_attr(),
            table_tags: default_table_tags(),
            list_tags: default_list_tags(),
        }
    }
}

impl AnalyzerConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
