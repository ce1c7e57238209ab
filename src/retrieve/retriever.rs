use crate::Similarity;
use crate::cards::Street;
use crate::features::FeatureInput;
use crate::features::FeatureVector;
use crate::features::FlopArchetype;
use crate::node::LeanNodeMeta;
use crate::pipeline::Cancelled;
use crate::play::Action;
use crate::play::ActionSequence;
use crate::play::Snapshot;
use crate::store::SearchFilter;
use crate::store::SearchHit;
use crate::store::VectorIndex;
use std::sync::Arc;
use std::time::Instant;

/// a nearest-node match. `parent_depth` > 0 means the exact action
/// history had no hit and a truncated history matched instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedNode {
    pub meta: LeanNodeMeta,
    pub score: Similarity,
    pub approx: bool,
    pub parent_depth: usize,
    pub removed_actions: Vec<String>,
}

/// nearest-node retrieval over the street collections: exact categorical
/// filters plus cosine over the 71-dim embedding, with parent fallback.
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    pub min_score: Similarity,
    pub limit: usize,
    pub max_parent_depth: usize,
}

impl Retriever {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        min_score: Similarity,
        limit: usize,
        max_parent_depth: usize,
    ) -> Self {
        Self {
            index,
            min_score,
            limit,
            max_parent_depth,
        }
    }

    /// exact query first, then up to
    /// `max_parent_depth` single-action truncations. honours `deadline`
    /// between queries. `None` after the last fallback misses too.
    pub async fn find_similar_node(
        &self,
        snapshot: &Snapshot,
        deadline: Option<Instant>,
    ) -> anyhow::Result<Option<RetrievedNode>> {
        debug_assert!(snapshot.street != Street::Pref);
        let mut history = snapshot.action_history.clone();
        let mut removed_actions: Vec<String> = Vec::new();
        for depth in 0..=self.max_parent_depth {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(anyhow::Error::new(Cancelled));
            }
            if let Some(top) = self.query(snapshot, &history).await? {
                log::debug!(
                    "matched node {} at depth {} score {:.3}",
                    top.id,
                    depth,
                    top.score
                );
                return Ok(Some(RetrievedNode {
                    meta: top.meta,
                    score: top.score,
                    approx: depth > 0,
                    parent_depth: depth,
                    removed_actions: removed_actions.clone(),
                }));
            }
            match history.pop() {
                // an empty history has nothing to truncate: exact-only
                None => break,
                Some(action) => removed_actions.push(action.to_string()),
            }
        }
        log::debug!(
            "no node within {} fallbacks for {}",
            self.max_parent_depth,
            snapshot
        );
        Ok(None)
    }

    async fn query(
        &self,
        snapshot: &Snapshot,
        history: &[Action],
    ) -> anyhow::Result<Option<SearchHit>> {
        let sequence = ActionSequence::from(history);
        let vector = FeatureVector::from(&FeatureInput {
            street: snapshot.street,
            pot_type: snapshot.pot_type,
            oop_bucket: Some(snapshot.positions.oop.bucket()),
            ip_bucket: Some(snapshot.positions.ip.bucket()),
            eff_stack_bb: snapshot.effective_stack_bb,
            pot_bb: snapshot.pot_bb,
            board: &snapshot.board,
            sequence: &sequence,
        });
        let filter = SearchFilter {
            action_sequence: Some(sequence.to_string()),
            street: Some(snapshot.street),
            pot_type: Some(snapshot.pot_type),
            flop_archetype: Some(FlopArchetype::from(&snapshot.board).to_string()),
            oop_bucket: Some(snapshot.positions.oop.bucket()),
            ip_bucket: Some(snapshot.positions.ip.bucket()),
        };
        let mut hits = self
            .index
            .search(
                snapshot.street.collection(),
                vector.as_slice(),
                &filter,
                3 * self.limit,
                self.min_score,
            )
            .await?;
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        Ok(hits.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Board;
    use crate::node::MetaPositions;
    use crate::play::Decision;
    use crate::play::GameType;
    use crate::play::Position;
    use crate::play::Positions;
    use crate::play::PotType;
    use crate::play::Seat;
    use crate::store::MemoryVectorIndex;

    fn snapshot(history: &[&str]) -> Snapshot {
        Snapshot {
            street: Street::Flop,
            board: "AhKdQc".parse().unwrap(),
            pot_bb: 5.5,
            hero_stack_bb: 97.5,
            effective_stack_bb: 97.5,
            positions: Positions {
                oop: Position::BB,
                ip: Position::BTN,
            },
            next_to_act: Seat::Oop,
            action_history: history.iter().map(|t| Action::parse_token(t)).collect(),
            street_actions: Default::default(),
            hero_cards: "AhKh".parse().unwrap(),
            decision: Decision {
                hero_action: Action::Check,
            },
            game_type: GameType::Cash,
            pot_type: PotType::Srp,
        }
    }

    fn meta(id: u64, sequence: &str) -> LeanNodeMeta {
        LeanNodeMeta {
            id,
            original_id: Some(format!("node-{}", id)),
            node_identifier: None,
            s3_bucket: "solver-shards".to_string(),
            s3_key: "flop/a".to_string(),
            offset: None,
            length: None,
            street: Street::Flop,
            pot_type: PotType::Srp,
            flop_archetype: "HHH".to_string(),
            action_sequence: sequence.to_string(),
            positions: MetaPositions {
                oop_bucket: crate::play::PositionBucket::Blind,
                ip_bucket: crate::play::PositionBucket::Late,
            },
            optimal_strategy: None,
        }
    }

    fn indexed(id: u64, snapshot: &Snapshot, history: &[&str]) -> (MemoryVectorIndex, u64) {
        let index = MemoryVectorIndex::default();
        let sequence = ActionSequence::parse_tokens(history);
        let vector = FeatureVector::from(&FeatureInput {
            street: snapshot.street,
            pot_type: snapshot.pot_type,
            oop_bucket: Some(snapshot.positions.oop.bucket()),
            ip_bucket: Some(snapshot.positions.ip.bucket()),
            eff_stack_bb: snapshot.effective_stack_bb,
            pot_bb: snapshot.pot_bb,
            board: &snapshot.board,
            sequence: &sequence,
        });
        index.insert(
            "flop_nodes",
            vector.to_vec(),
            meta(id, sequence.as_str()),
        );
        (index, id)
    }

    #[tokio::test]
    async fn exact_match() {
        let snapshot = snapshot(&["x", "b3"]);
        let (index, id) = indexed(7, &snapshot, &["x", "b3"]);
        let retriever = Retriever::new(Arc::new(index), 0.55, 10, 2);
        let node = retriever
            .find_similar_node(&snapshot, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(node.meta.id, id);
        assert!(!node.approx);
        assert_eq!(node.parent_depth, 0);
        assert!(node.removed_actions.is_empty());
    }

    #[tokio::test]
    async fn parent_fallback_marks_approx() {
        let snapshot = snapshot(&["x", "b3", "r9"]);
        // only the one-action-shorter line is indexed
        let (index, _) = indexed(7, &snapshot, &["x", "b3"]);
        let retriever = Retriever::new(Arc::new(index), 0.55, 10, 2);
        let node = retriever
            .find_similar_node(&snapshot, None)
            .await
            .unwrap()
            .unwrap();
        assert!(node.approx);
        assert_eq!(node.parent_depth, 1);
        assert_eq!(node.removed_actions, vec!["raise 9".to_string()]);
    }

    #[tokio::test]
    async fn empty_history_is_exact_only() {
        let snapshot = snapshot(&[]);
        let index = MemoryVectorIndex::default();
        let retriever = Retriever::new(Arc::new(index), 0.55, 10, 2);
        let node = retriever.find_similar_node(&snapshot, None).await.unwrap();
        assert!(node.is_none());
    }

    #[tokio::test]
    async fn depth_capped() {
        let snapshot = snapshot(&["x", "b3", "r9", "c"]);
        // three actions back: beyond max_parent_depth = 2
        let (index, _) = indexed(7, &snapshot, &["x"]);
        let retriever = Retriever::new(Arc::new(index), 0.55, 10, 2);
        let node = retriever.find_similar_node(&snapshot, None).await.unwrap();
        assert!(node.is_none());
    }

    #[tokio::test]
    async fn expired_deadline_cancels() {
        let snapshot = snapshot(&["x"]);
        let index = MemoryVectorIndex::default();
        let retriever = Retriever::new(Arc::new(index), 0.55, 10, 2);
        let deadline = Some(Instant::now() - std::time::Duration::from_millis(1));
        let err = retriever
            .find_similar_node(&snapshot, deadline)
            .await
            .unwrap_err();
        assert!(err.is::<Cancelled>());
    }
}
