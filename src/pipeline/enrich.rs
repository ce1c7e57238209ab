use super::context::Context;
use super::error::Cancelled;
use super::error::EnrichError;
use super::error::MissReason;
use crate::cards::Street;
use crate::features::action_hash;
use crate::node::LeanNodeMeta;
use crate::node::NodeAnalysis;
use crate::node::ShardError;
use crate::play::ActionSequence;
use crate::play::HandRecord;
use crate::play::Replay;
use crate::play::Snapshot;
use crate::retrieve::RetrievedNode;
use crate::retrieve::Retriever;
use crate::retrieve::find_river_node;
use crate::solver::BlockInput;
use crate::solver::SolverBlock;
use crate::solver::build_solver_block;
use crate::store::ShardKey;
use crate::store::ShardStore;
use crate::tags::Tag;
use crate::tags::TagCategory;
use crate::tags::TagContext;
use crate::tags::generate_tags;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// the per-snapshot output handed downstream: the snapshot itself, the
/// solver annotation when a node was found, and the strategic tags.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSnapshot {
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver_block: Option<SolverBlock>,
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miss: Option<MissReason>,
}

/// one invocation's shared machinery.
struct Run {
    ctx: Context,
    shard_store: ShardStore,
    retriever: Retriever,
    semaphore: Semaphore,
    deadline: Option<Instant>,
}

/// enrich a played hand: replay it into snapshots, then annotate each
/// with its nearest solver node and tags. flop and turn snapshots run
/// as parallel tasks; river snapshots run afterwards so they can reuse
/// the shard their preceding turn match pulled. output order matches
/// snapshot order. misses degrade per snapshot; only replay failure,
/// bad configuration, or cancellation fail the hand.
pub async fn enrich_hand(
    ctx: &Context,
    hand: &HandRecord,
    deadline: Option<Instant>,
) -> Result<Vec<EnrichedSnapshot>, EnrichError> {
    ctx.config.validate()?;
    let snapshots = Replay::new(hand)?.snapshots()?;
    if snapshots.is_empty() {
        log::debug!("hand ended preflop, nothing to enrich");
        return Ok(Vec::new());
    }
    let run = Arc::new(Run {
        shard_store: ShardStore::new(
            ctx.object_store.clone(),
            ctx.config.max_shards_per_invocation,
            ctx.config.fetch_retries,
            ctx.config.backoff_base,
        ),
        retriever: Retriever::new(
            ctx.vector_index.clone(),
            ctx.config.min_score,
            ctx.config.limit,
            ctx.config.max_parent_depth,
        ),
        semaphore: Semaphore::new(ctx.config.vector_concurrency),
        deadline,
        ctx: ctx.clone(),
    });

    let mut results: Vec<Option<EnrichedSnapshot>> =
        snapshots.iter().map(|_| None).collect();
    let mut turn_shards: Vec<Option<ShardKey>> = snapshots.iter().map(|_| None).collect();

    // flop and turn snapshots are independent tasks
    let tasks: Vec<_> = snapshots
        .iter()
        .enumerate()
        .filter(|(_, snapshot)| snapshot.street != Street::Rive)
        .map(|(index, snapshot)| {
            let run = run.clone();
            let snapshot = snapshot.clone();
            tokio::spawn(async move {
                let outcome = run.enrich_indexed(index, &snapshot).await;
                (index, outcome)
            })
        })
        .collect();
    for joined in futures::future::join_all(tasks).await {
        let (index, outcome) = joined.expect("enrichment task panicked");
        let (enriched, shard) = outcome?;
        results[index] = Some(enriched);
        turn_shards[index] = shard;
    }

    // river snapshots reuse the shard of the immediately preceding turn
    // snapshot and no other: an earlier turn's shard is stale once a
    // closer decision point missed
    for (index, snapshot) in snapshots
        .iter()
        .enumerate()
        .filter(|(_, snapshot)| snapshot.street == Street::Rive)
    {
        let reusable = index
            .checked_sub(1)
            .filter(|prev| snapshots[*prev].street == Street::Turn)
            .and_then(|prev| turn_shards[prev].clone());
        let enriched = match reusable {
            Some(shard) => run.enrich_river(index, snapshot, &shard).await?,
            // with no turn match to lean on, the river queries the index
            None => run.enrich_indexed(index, snapshot).await?.0,
        };
        results[index] = Some(enriched);
    }

    Ok(results
        .into_iter()
        .map(|enriched| enriched.expect("every snapshot resolved"))
        .collect())
}

impl Run {
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn miss(&self, index: usize, snapshot: &Snapshot, reason: MissReason) -> EnrichedSnapshot {
        self.ctx.observer.on_miss(index, &reason);
        let tag = Tag::new(
            TagCategory::Meta,
            format!("META:{}", reason.as_str().to_ascii_uppercase()),
        );
        EnrichedSnapshot {
            snapshot: snapshot.clone(),
            solver_block: None,
            tags: vec![tag],
            miss: Some(reason),
        }
    }

    fn assemble(
        &self,
        index: usize,
        snapshot: &Snapshot,
        node: &NodeAnalysis,
        sim: crate::Similarity,
        approx: bool,
        meta: Option<&LeanNodeMeta>,
    ) -> EnrichedSnapshot {
        let block = build_solver_block(
            &BlockInput {
                node,
                snapshot,
                sim,
                approx,
                meta_strategy: meta.and_then(|m| m.optimal_strategy.as_ref()),
                hero: Some(snapshot.hero_cards),
            },
            &self.ctx.config.sizing_bounds,
        );
        let tags = generate_tags(
            &block,
            &TagContext {
                street: snapshot.street,
                pot_bb: snapshot.pot_bb,
                effective_stack_bb: snapshot.effective_stack_bb,
                pot_odds: snapshot.pot_odds(),
            },
            self.ctx.config.tag_priority,
            self.ctx.config.max_tags_per_category,
        );
        self.ctx
            .observer
            .on_node_matched(index, &block.node_id, sim, block.is_approximation);
        EnrichedSnapshot {
            snapshot: snapshot.clone(),
            solver_block: Some(block),
            tags,
            miss: None,
        }
    }

    /// flop/turn path (and river without a reusable shard): vector
    /// search, then node resolution through the doc store or a shard
    async fn enrich_indexed(
        &self,
        index: usize,
        snapshot: &Snapshot,
    ) -> Result<(EnrichedSnapshot, Option<ShardKey>), EnrichError> {
        self.ctx.observer.on_snapshot_start(index, snapshot.street);
        let started = Instant::now();
        let sequence = ActionSequence::from(snapshot.action_history.as_slice());
        log::debug!(
            "snapshot {} decision point {:08x}",
            index,
            action_hash(&sequence, snapshot.pot_bb)
        );
        let retrieved = match self.search(snapshot).await? {
            Ok(Some(retrieved)) => retrieved,
            Ok(None) => {
                return Ok((self.miss(index, snapshot, MissReason::NoMatch), None));
            }
            Err(reason) => return Ok((self.miss(index, snapshot, reason), None)),
        };
        let outcome = match snapshot.street {
            Street::Flop => self
                .resolve_flop(&retrieved)
                .await?
                .map(|node| (node, None)),
            _ => match self.resolve_sharded(&retrieved).await? {
                Ok((node, shard)) => Ok((node, Some(shard))),
                Err(reason) => Err(reason),
            },
        };
        let result = match outcome {
            Err(reason) => (self.miss(index, snapshot, reason), None),
            Ok((node, shard)) => (
                self.assemble(
                    index,
                    snapshot,
                    &node,
                    retrieved.score,
                    retrieved.approx,
                    Some(&retrieved.meta),
                ),
                shard,
            ),
        };
        self.ctx.observer.on_snapshot_done(index, started.elapsed());
        Ok(result)
    }

    /// river path: two-stage local search inside the reused turn shard.
    /// a miss here is final by design.
    async fn enrich_river(
        &self,
        index: usize,
        snapshot: &Snapshot,
        shard: &ShardKey,
    ) -> Result<EnrichedSnapshot, EnrichError> {
        self.ctx.observer.on_snapshot_start(index, snapshot.street);
        let started = Instant::now();
        if self.expired() {
            return Err(Cancelled.into());
        }
        let nodes = match self.shard_store.get(shard).await {
            Ok(nodes) => nodes,
            Err(ShardError::Cancelled) => return Err(Cancelled.into()),
            Err(ShardError::Fetch(_)) => {
                return Ok(self.miss(index, snapshot, MissReason::ShardUnavailable));
            }
            Err(ShardError::Decode(_)) => {
                return Ok(self.miss(index, snapshot, MissReason::ShardCorrupt));
            }
        };
        let result = match find_river_node(snapshot, &nodes) {
            None => self.miss(index, snapshot, MissReason::NoMatch),
            Some(matched) => self.assemble(
                index,
                snapshot,
                &matched.node,
                matched.score,
                false,
                None,
            ),
        };
        self.ctx.observer.on_snapshot_done(index, started.elapsed());
        Ok(result)
    }

    /// bounded-concurrency vector search with transient-error retries.
    /// Ok(Err(reason)) is a per-snapshot miss; Err(_) fails the hand.
    async fn search(
        &self,
        snapshot: &Snapshot,
    ) -> Result<Result<Option<RetrievedNode>, MissReason>, EnrichError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("semaphore never closed");
        let mut attempt = 0;
        loop {
            if self.expired() {
                return Err(Cancelled.into());
            }
            match self
                .retriever
                .find_similar_node(snapshot, self.deadline)
                .await
            {
                Ok(retrieved) => return Ok(Ok(retrieved)),
                Err(e) if e.is::<Cancelled>() => return Err(Cancelled.into()),
                Err(e) if attempt < self.ctx.config.fetch_retries => {
                    let delay = self.ctx.config.backoff_base * 2u32.pow(attempt as u32);
                    log::warn!("vector search failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::warn!("vector search exhausted retries: {}", e);
                    return Ok(Err(MissReason::IndexUnavailable));
                }
            }
        }
    }

    /// flop nodes live whole in the document store, keyed by original id
    async fn resolve_flop(
        &self,
        retrieved: &RetrievedNode,
    ) -> Result<Result<NodeAnalysis, MissReason>, EnrichError> {
        let Some(ref id) = retrieved.meta.original_id else {
            return Ok(Err(MissReason::NodeMissing));
        };
        let mut attempt = 0;
        loop {
            if self.expired() {
                return Err(Cancelled.into());
            }
            match self.ctx.doc_store.flop_node(id).await {
                Ok(Some(node)) => return Ok(Ok(node)),
                Ok(None) => return Ok(Err(MissReason::NodeMissing)),
                Err(e) if attempt < self.ctx.config.fetch_retries => {
                    let delay = self.ctx.config.backoff_base * 2u32.pow(attempt as u32);
                    log::warn!("doc store failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    log::warn!("doc store exhausted retries: {}", e);
                    return Ok(Err(MissReason::DocUnavailable));
                }
            }
        }
    }

    /// turn (and index-resolved river) nodes live inside shards,
    /// located by node identifier
    async fn resolve_sharded(
        &self,
        retrieved: &RetrievedNode,
    ) -> Result<Result<(NodeAnalysis, ShardKey), MissReason>, EnrichError> {
        let meta = &retrieved.meta;
        let bucket = if meta.s3_bucket.is_empty() {
            self.ctx.config.default_bucket.clone()
        } else {
            meta.s3_bucket.clone()
        };
        let shard = ShardKey {
            bucket,
            key: meta.s3_key.clone(),
            range: meta.byte_range(),
        };
        let nodes = match self.shard_store.get(&shard).await {
            Ok(nodes) => nodes,
            Err(ShardError::Cancelled) => return Err(Cancelled.into()),
            Err(ShardError::Fetch(_)) => return Ok(Err(MissReason::ShardUnavailable)),
            Err(ShardError::Decode(_)) => return Ok(Err(MissReason::ShardCorrupt)),
        };
        let node = nodes
            .iter()
            .find(|node| {
                meta.node_identifier.is_some() && node.node_identifier == meta.node_identifier
            })
            .or_else(|| {
                nodes
                    .iter()
                    .find(|node| Some(&node.node_id) == meta.original_id.as_ref())
            })
            .cloned();
        match node {
            Some(node) => Ok(Ok((node, shard))),
            None => Ok(Err(MissReason::NodeMissing)),
        }
    }
}
