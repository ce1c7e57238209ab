use super::error::EnrichError;
use crate::Similarity;
use crate::play::SizingBounds;
use crate::tags::TagPriority;
use std::time::Duration;

/// immutable pipeline configuration, passed down through the context.
/// thresholds here are tunable; the feature-vector layout is not.
#[derive(Debug, Clone)]
pub struct Config {
    /// object-store bucket used when the index payload names none
    pub default_bucket: String,
    pub min_score: Similarity,
    pub limit: usize,
    pub max_parent_depth: usize,
    /// advisory; the cache never evicts within an invocation
    pub max_shards_per_invocation: usize,
    pub tag_priority: TagPriority,
    pub max_tags_per_category: usize,
    pub sizing_bounds: SizingBounds,
    /// transient-I/O retries beyond the first attempt
    pub fetch_retries: usize,
    pub backoff_base: Duration,
    /// concurrent vector queries per invocation
    pub vector_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_bucket: "solver-shards".to_string(),
            min_score: 0.55,
            limit: 10,
            max_parent_depth: 2,
            max_shards_per_invocation: 8,
            tag_priority: TagPriority::Balanced,
            max_tags_per_category: 5,
            sizing_bounds: SizingBounds::default(),
            fetch_retries: 2,
            backoff_base: Duration::from_millis(100),
            vector_concurrency: 5,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), EnrichError> {
        if self.limit == 0 {
            return Err(EnrichError::Config("limit must be positive".to_string()));
        }
        if self.vector_concurrency == 0 {
            return Err(EnrichError::Config(
                "vector_concurrency must be positive".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.min_score) {
            return Err(EnrichError::Config(format!(
                "min_score {} outside cosine range",
                self.min_score
            )));
        }
        if self.default_bucket.is_empty() {
            return Err(EnrichError::Config("default_bucket empty".to_string()));
        }
        Ok(())
    }
}
