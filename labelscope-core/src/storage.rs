use crate::cache::{ReportCacheKey, ReportCacheValue};
use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Storage abstraction for caching analysis reports
pub trait ReportStorage {
    fn get_report(&self, cache_key: &ReportCacheKey) -> Result<Option<ReportCacheValue>>;
    fn store_report(&self, cache_key: &ReportCacheKey, cache_value: &ReportCacheValue)
        -> Result<()>;
}

/// File-based storage implementation using a local cache directory
pub struct FileStorage {
    cache_dir: String,
}

impl FileStorage {
    pub fn new(cache_dir: &str) -> Result<Self> {
        // Ensure cache directory exists
        fs::create_dir_all(format!("{cache_dir}/reports"))?;

        Ok(Self {
            cache_dir: cache_dir.to_string(),
        })
    }

    fn report_path(&self, cache_key: &ReportCacheKey) -> String {
        format!(
            "{}/reports/{}.json",
            self.cache_dir,
            cache_key.to_cache_hash()
        )
    }
}

impl ReportStorage for FileStorage {
    fn get_report(&self, cache_key: &ReportCacheKey) -> Result<Option<ReportCacheValue>> {
        let path = self.report_path(cache_key);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(path)?;
            let cache_value: ReportCacheValue = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize cached report: {}", e))?;
            Ok(Some(cache_value))
        } else {
            Ok(None)
        }
    }

    fn store_report(
        &self,
        cache_key: &ReportCacheKey,
        cache_value: &ReportCacheValue,
    ) -> Result<()> {
        let path = self.report_path(cache_key);
        let json_str = serde_json::to_string_pretty(cache_value)
            .map_err(|e| anyhow!("Failed to serialize report cache value: {}", e))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// No-op storage implementation that disables caching
pub struct NoOpStorage;

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ReportStorage for NoOpStorage {
    fn get_report(&self, _cache_key: &ReportCacheKey) -> Result<Option<ReportCacheValue>> {
        Ok(None) // Always cache miss
    }

    fn store_report(
        &self,
        _cache_key: &ReportCacheKey,
        _cache_value: &ReportCacheValue,
    ) -> Result<()> {
        Ok(()) // No-op
    }
}

/// Hash the full input content. Label corpora are plain JSON text, so the
/// whole-content digest is cheap and exact.
pub fn calculate_input_hash(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for configuration data (for the cache key)
pub fn calculate_config_hash<T: serde::Serialize>(config: &T) -> Result<String> {
    let config_json = serde_json::to_string(config)
        .map_err(|e| anyhow!("Failed to serialize config for hashing: {}", e))?;

    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
