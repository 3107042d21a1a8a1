use crate::types::Report;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version constants for cache invalidation
pub mod versions {
    pub const LABELSCOPE_VERSION: &str = "0.1.0";
    pub const ANALYSIS_VERSION: &str = "1.0.0";
}

/// Cache key (input corpus + config → report)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReportCacheKey {
    pub input_hash: String,
    pub config_hash: String,
    pub labelscope_version: String,
    pub analysis_version: String,
}

impl ReportCacheKey {
    pub fn new(input_hash: String, config_hash: String) -> Self {
        Self {
            input_hash,
            config_hash,
            labelscope_version: versions::LABELSCOPE_VERSION.to_string(),
            analysis_version: versions::ANALYSIS_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.input_hash);
        hasher.update(&self.config_hash);
        hasher.update(&self.labelscope_version);
        hasher.update(&self.analysis_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Cache value (report with metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCacheValue {
    pub report: Report,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub cache_version: String,
}

impl ReportCacheValue {
    pub fn new(report: Report, processing_time_ms: u64) -> Self {
        Self {
            report,
            created_at: Utc::now(),
            processing_time_ms,
            cache_version: versions::LABELSCOPE_VERSION.to_string(),
        }
    }
}
