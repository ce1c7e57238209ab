use crate::play::ReplayError;

/// the caller's deadline expired; per-hand output is discarded whole.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[error("cancelled by deadline")]
pub struct Cancelled;

/// why a snapshot carries no solver block. misses are per-snapshot and
/// never fail the hand.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// no vector match, parent fallback included
    NoMatch,
    /// vector index unreachable after retries
    IndexUnavailable,
    /// shard object unreachable after retries
    ShardUnavailable,
    /// shard decoded badly; the cache entry was purged
    ShardCorrupt,
    /// document store unreachable after retries
    DocUnavailable,
    /// the index pointed at a node the stores do not hold
    NodeMissing,
    /// the snapshot itself was malformed
    InvalidInput(String),
}

impl MissReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MissReason::NoMatch => "no-match",
            MissReason::IndexUnavailable => "index-unavailable",
            MissReason::ShardUnavailable => "shard-unavailable",
            MissReason::ShardCorrupt => "shard-corrupt",
            MissReason::DocUnavailable => "doc-unavailable",
            MissReason::NodeMissing => "node-missing",
            MissReason::InvalidInput(_) => "invalid-input",
        }
    }
}

/// whole-pipeline failures. anything else degrades to a per-snapshot
/// miss record.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}
