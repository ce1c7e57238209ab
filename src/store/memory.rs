use super::ports::DocStore;
use super::ports::ObjectStore;
use super::ports::SearchFilter;
use super::ports::SearchHit;
use super::ports::VectorIndex;
use crate::Similarity;
use crate::node::LeanNodeMeta;
use crate::node::NodeAnalysis;
use crate::node::ShardError;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// in-memory object store. backs the end-to-end tests and dry runs;
/// counts fetches so coalescing behaviour is observable.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    fetches: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn insert(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.objects
            .lock()
            .expect("object map lock")
            .insert((bucket.to_string(), key.to_string()), Bytes::from(bytes));
    }
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn fetch(
        &self,
        bucket: &str,
        key: &str,
        range: Option<(u64, u64)>,
    ) -> Result<Bytes, ShardError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.lock().expect("object map lock");
        let blob = objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| ShardError::Fetch(format!("no such object {}/{}", bucket, key)))?;
        match range {
            None => Ok(blob.clone()),
            Some((offset, length)) => {
                let start = offset as usize;
                let end = start + length as usize;
                if end > blob.len() {
                    return Err(ShardError::Fetch(format!(
                        "range {}..{} outside object of {} bytes",
                        start,
                        end,
                        blob.len()
                    )));
                }
                Ok(blob.slice(start..end))
            }
        }
    }
}

/// in-memory vector index: brute-force cosine over stored embeddings
/// with the same filter/threshold/ordering contract as the real index.
#[derive(Default)]
pub struct MemoryVectorIndex {
    collections: Mutex<HashMap<String, Vec<(Vec<f32>, LeanNodeMeta)>>>,
    searches: AtomicUsize,
}

impl MemoryVectorIndex {
    pub fn insert(&self, collection: &str, vector: Vec<f32>, meta: LeanNodeMeta) {
        self.collections
            .lock()
            .expect("index lock")
            .entry(collection.to_string())
            .or_default()
            .push((vector, meta));
    }
    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> Similarity {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

#[async_trait::async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        filter: &SearchFilter,
        limit: usize,
        score_threshold: Similarity,
    ) -> anyhow::Result<Vec<SearchHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.lock().expect("index lock");
        let mut hits = collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(|(_, meta)| filter.matches(meta))
            .map(|(stored, meta)| SearchHit {
                id: meta.id,
                score: cosine(vector, stored),
                meta: meta.clone(),
            })
            .filter(|hit| hit.score >= score_threshold)
            .collect::<Vec<_>>();
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

/// in-memory document store for flop nodes.
#[derive(Default)]
pub struct MemoryDocStore {
    nodes: Mutex<HashMap<String, NodeAnalysis>>,
}

impl MemoryDocStore {
    pub fn insert(&self, node: NodeAnalysis) {
        self.nodes
            .lock()
            .expect("doc store lock")
            .insert(node.node_id.clone(), node);
    }
}

#[async_trait::async_trait]
impl DocStore for MemoryDocStore {
    async fn flop_node(&self, node_id: &str) -> anyhow::Result<Option<NodeAnalysis>> {
        Ok(self
            .nodes
            .lock()
            .expect("doc store lock")
            .get(node_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Street;
    use crate::play::PositionBucket;
    use crate::play::PotType;

    fn meta(id: u64, sequence: &str) -> LeanNodeMeta {
        LeanNodeMeta {
            id,
            original_id: None,
            node_identifier: None,
            s3_bucket: "solver-shards".to_string(),
            s3_key: "turn/abc".to_string(),
            offset: None,
            length: None,
            street: Street::Turn,
            pot_type: PotType::Srp,
            flop_archetype: "HHM".to_string(),
            action_sequence: sequence.to_string(),
            positions: crate::node::MetaPositions {
                oop_bucket: PositionBucket::Blind,
                ip_bucket: PositionBucket::Late,
            },
            optimal_strategy: None,
        }
    }

    #[tokio::test]
    async fn filters_and_orders() {
        let index = MemoryVectorIndex::default();
        index.insert("turn_nodes", vec![1.0, 0.0], meta(2, "X"));
        index.insert("turn_nodes", vec![1.0, 0.0], meta(1, "X"));
        index.insert("turn_nodes", vec![1.0, 0.0], meta(3, "X-B"));
        let filter = SearchFilter {
            action_sequence: Some("X".to_string()),
            ..Default::default()
        };
        let hits = index
            .search("turn_nodes", &[1.0, 0.0], &filter, 10, 0.5)
            .await
            .unwrap();
        // equal scores tie-break by ascending id; the other sequence is filtered
        assert_eq!(hits.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn threshold_excludes() {
        let index = MemoryVectorIndex::default();
        index.insert("turn_nodes", vec![1.0, 0.0], meta(1, "X"));
        let hits = index
            .search("turn_nodes", &[0.0, 1.0], &SearchFilter::default(), 10, 0.55)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn byte_ranges_slice() {
        let objects = MemoryObjectStore::default();
        objects.insert("b", "k", (0u8..10).collect());
        let bytes = objects.fetch("b", "k", Some((2, 4))).await.unwrap();
        assert_eq!(&bytes[..], &[2, 3, 4, 5]);
        assert!(objects.fetch("b", "k", Some((8, 4))).await.is_err());
    }
}
