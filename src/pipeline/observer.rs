use super::error::MissReason;
use crate::Similarity;
use crate::cards::Street;
use std::time::Duration;

/// injected instrumentation seam. the pipeline reports through this
/// instead of printing; the default implementation just logs.
pub trait Observer: Send + Sync {
    fn on_snapshot_start(&self, _index: usize, _street: Street) {}
    fn on_node_matched(&self, _index: usize, _node_id: &str, _score: Similarity, _approx: bool) {}
    fn on_miss(&self, _index: usize, _reason: &MissReason) {}
    fn on_snapshot_done(&self, _index: usize, _elapsed: Duration) {}
}

pub struct LogObserver;

impl Observer for LogObserver {
    fn on_snapshot_start(&self, index: usize, street: Street) {
        log::debug!("snapshot {} ({}) enrichment started", index, street);
    }
    fn on_node_matched(&self, index: usize, node_id: &str, score: Similarity, approx: bool) {
        log::info!(
            "snapshot {} matched {} score {:.3}{}",
            index,
            node_id,
            score,
            if approx { " (approx)" } else { "" }
        );
    }
    fn on_miss(&self, index: usize, reason: &MissReason) {
        log::info!("snapshot {} miss: {}", index, reason.as_str());
    }
    fn on_snapshot_done(&self, index: usize, elapsed: Duration) {
        log::debug!("snapshot {} done in {:?}", index, elapsed);
    }
}
