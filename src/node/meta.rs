use crate::play::PositionBucket;
use crate::solver::OptimalStrategy;

/// the bucketed seat positions as the vector index stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetaPositions {
    pub oop_bucket: PositionBucket,
    pub ip_bucket: PositionBucket,
}

/// the vector-index payload: just enough to locate one `NodeAnalysis`
/// (by `original_id` for flop nodes in the document store, by
/// `node_identifier` inside the shard for turn/river nodes) plus the
/// categorical fields the exact-match filters run on. snake_case wire
/// names, matching the index corpus.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LeanNodeMeta {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_identifier: Option<String>,
    pub s3_bucket: String,
    pub s3_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    pub street: crate::cards::Street,
    pub pot_type: crate::play::PotType,
    pub flop_archetype: String,
    pub action_sequence: String,
    pub positions: MetaPositions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_strategy: Option<OptimalStrategy>,
}

impl LeanNodeMeta {
    /// the byte range of this node's shard, when the index carries one
    pub fn byte_range(&self) -> Option<(u64, u64)> {
        match (self.offset, self.length) {
            (Some(offset), Some(length)) => Some((offset, length)),
            _ => None,
        }
    }
}
