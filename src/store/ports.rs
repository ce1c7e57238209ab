use crate::Similarity;
use crate::cards::Street;
use crate::node::LeanNodeMeta;
use crate::node::NodeAnalysis;
use crate::node::ShardError;
use crate::play::PositionBucket;
use crate::play::PotType;
use bytes::Bytes;

/// blob storage addressed by `(bucket, key)` with optional byte range.
/// concrete adapters (S3 and friends) live outside the crate.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(
        &self,
        bucket: &str,
        key: &str,
        range: Option<(u64, u64)>,
    ) -> Result<Bytes, ShardError>;
}

/// the exact-match predicates the vector index supports. all equality;
/// `None` leaves a field unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub action_sequence: Option<String>,
    pub street: Option<Street>,
    pub pot_type: Option<PotType>,
    pub flop_archetype: Option<String>,
    pub oop_bucket: Option<PositionBucket>,
    pub ip_bucket: Option<PositionBucket>,
}

impl SearchFilter {
    pub fn matches(&self, meta: &LeanNodeMeta) -> bool {
        self.action_sequence
            .as_ref()
            .is_none_or(|s| *s == meta.action_sequence)
            && self.street.is_none_or(|s| s == meta.street)
            && self.pot_type.is_none_or(|p| p == meta.pot_type)
            && self
                .flop_archetype
                .as_ref()
                .is_none_or(|a| *a == meta.flop_archetype)
            && self
                .oop_bucket
                .is_none_or(|b| b == meta.positions.oop_bucket)
            && self.ip_bucket.is_none_or(|b| b == meta.positions.ip_bucket)
    }
}

/// one nearest-neighbour result: index id, cosine score, payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: u64,
    pub score: Similarity,
    pub meta: LeanNodeMeta,
}

/// approximate nearest-neighbour search over a street's collection.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        filter: &SearchFilter,
        limit: usize,
        score_threshold: Similarity,
    ) -> anyhow::Result<Vec<SearchHit>>;
}

/// document store holding flop-street nodes by id. read-only here.
#[async_trait::async_trait]
pub trait DocStore: Send + Sync {
    async fn flop_node(&self, node_id: &str) -> anyhow::Result<Option<NodeAnalysis>>;
}
