use crate::Similarity;
use crate::cards::Street;
use crate::features::FeatureInput;
use crate::features::FeatureVector;
use crate::features::cosine;
use crate::node::NodeAnalysis;
use crate::play::ActionSequence;
use crate::play::Snapshot;

/// a river node selected from the reused turn shard.
#[derive(Debug, Clone, PartialEq)]
pub struct RiverMatch {
    pub node: NodeAnalysis,
    pub score: Similarity,
}

/// river snapshots never touch the vector index: the turn match already
/// pulled the shard holding the relevant river nodes. two-stage local
/// search: exact action-sequence match first, then best cosine of each
/// survivor's reconstructed embedding against the snapshot's. a miss is
/// final; there is no fallback.
pub fn find_river_node(snapshot: &Snapshot, shard: &[NodeAnalysis]) -> Option<RiverMatch> {
    debug_assert!(snapshot.street == Street::Rive);
    let sequence = ActionSequence::from(snapshot.action_history.as_slice());
    let snapshot_vector = FeatureVector::from(&FeatureInput {
        street: snapshot.street,
        pot_type: snapshot.pot_type,
        oop_bucket: Some(snapshot.positions.oop.bucket()),
        ip_bucket: Some(snapshot.positions.ip.bucket()),
        eff_stack_bb: snapshot.effective_stack_bb,
        pot_bb: snapshot.pot_bb,
        board: &snapshot.board,
        sequence: &sequence,
    });
    let mut survivors: Vec<(&NodeAnalysis, Similarity)> = shard
        .iter()
        .filter(|node| node.street == Street::Rive)
        .filter(|node| ActionSequence::parse_tokens(&node.action_history) == sequence)
        .map(|node| {
            let node_sequence = ActionSequence::parse_tokens(&node.action_history);
            let vector = FeatureVector::from(&FeatureInput {
                street: node.street,
                pot_type: node.pot_type,
                oop_bucket: Some(node.positions.oop.bucket()),
                ip_bucket: Some(node.positions.ip.bucket()),
                eff_stack_bb: node.eff_stack,
                pot_bb: node.pot,
                board: &node.board,
                sequence: &node_sequence,
            });
            (node, cosine(&snapshot_vector, &vector))
        })
        .collect();
    survivors.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.node_id.cmp(&b.0.node_id))
    });
    let (node, score) = survivors.into_iter().next()?;
    log::debug!(
        "river local search picked {} at {:.3} from {} shard nodes",
        node.node_id,
        score,
        shard.len()
    );
    Some(RiverMatch {
        node: node.clone(),
        score,
    })
}
