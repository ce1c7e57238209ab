use super::ports::ObjectStore;
use crate::node::NodeAnalysis;
use crate::node::ShardError;
use crate::node::decode_shard;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::OnceCell;

/// identity of one decoded shard within an enrichment run.
/// the byte range participates: two windows of the same object are
/// different shards.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ShardKey {
    pub bucket: String,
    pub key: String,
    pub range: Option<(u64, u64)>,
}

impl std::fmt::Display for ShardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.range {
            Some((offset, length)) => {
                write!(f, "{}/{}[{}+{}]", self.bucket, self.key, offset, length)
            }
            None => write!(f, "{}/{}", self.bucket, self.key),
        }
    }
}

type Decoded = Arc<Vec<NodeAnalysis>>;

/// per-invocation shard cache. each entry is populated at most once:
/// concurrent `get`s of the same key attach to the in-flight fetch,
/// and a failed entry is purged so the next call retries.
/// entries live for the whole run; the cap is advisory.
pub struct ShardStore {
    object_store: Arc<dyn ObjectStore>,
    cache: Mutex<HashMap<ShardKey, Arc<OnceCell<Decoded>>>>,
    advisory_cap: usize,
    retries: usize,
    backoff: std::time::Duration,
}

impl ShardStore {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        advisory_cap: usize,
        retries: usize,
        backoff: std::time::Duration,
    ) -> Self {
        Self {
            object_store,
            cache: Mutex::new(HashMap::new()),
            advisory_cap,
            retries,
            backoff,
        }
    }

    pub async fn get(&self, shard: &ShardKey) -> Result<Decoded, ShardError> {
        let entry = {
            let mut cache = self.cache.lock().expect("shard cache lock");
            if cache.len() >= self.advisory_cap && !cache.contains_key(shard) {
                log::warn!(
                    "shard cache at {} entries, fetching {} anyway",
                    cache.len(),
                    shard
                );
            }
            cache.entry(shard.clone()).or_default().clone()
        };
        let result = entry
            .get_or_try_init(|| async {
                log::debug!("fetching shard {}", shard);
                let nodes = self.fetch_and_decode(shard).await?;
                log::debug!("decoded {} nodes from {}", nodes.len(), shard);
                Ok::<Decoded, ShardError>(Arc::new(nodes))
            })
            .await;
        match result {
            Ok(nodes) => Ok(nodes.clone()),
            Err(e) => {
                // purge so the entry goes back to Empty rather than
                // poisoning every later lookup of this key
                self.cache
                    .lock()
                    .expect("shard cache lock")
                    .remove(shard);
                Err(e)
            }
        }
    }

    /// transient transport errors retry with exponential backoff;
    /// decode errors are corruption and fail immediately
    async fn fetch_and_decode(&self, shard: &ShardKey) -> Result<Vec<NodeAnalysis>, ShardError> {
        let mut attempt = 0;
        let bytes = loop {
            match self
                .object_store
                .fetch(&shard.bucket, &shard.key, shard.range)
                .await
            {
                Ok(bytes) => break bytes,
                Err(ShardError::Fetch(reason)) if attempt < self.retries => {
                    let delay = self.backoff * 2u32.pow(attempt as u32);
                    log::warn!(
                        "shard fetch {} failed ({}), retry {} in {:?}",
                        shard,
                        reason,
                        attempt + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };
        decode_shard(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Street;
    use crate::node::analysis::tests::fixture;
    use crate::node::encode_shard;
    use crate::store::memory::MemoryObjectStore;

    fn shard_key(key: &str) -> ShardKey {
        ShardKey {
            bucket: "solver-shards".to_string(),
            key: key.to_string(),
            range: None,
        }
    }

    fn store_with(key: &str, nodes: Vec<NodeAnalysis>) -> (Arc<MemoryObjectStore>, ShardStore) {
        let objects = Arc::new(MemoryObjectStore::default());
        objects.insert("solver-shards", key, encode_shard(&nodes).unwrap());
        let store = ShardStore::new(
            objects.clone(),
            8,
            2,
            std::time::Duration::from_millis(1),
        );
        (objects, store)
    }

    #[tokio::test]
    async fn decodes_and_caches() {
        let nodes = vec![fixture("n1", Street::Turn, "AhKdQc2s")];
        let (objects, store) = store_with("turn/abc", nodes.clone());
        let key = shard_key("turn/abc");
        let first = store.get(&key).await.unwrap();
        let second = store.get(&key).await.unwrap();
        assert_eq!(*first, nodes);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(objects.fetches(), 1);
    }

    #[tokio::test]
    async fn concurrent_gets_coalesce() {
        let nodes = vec![fixture("n1", Street::Turn, "AhKdQc2s")];
        let (objects, store) = store_with("turn/abc", nodes);
        let store = Arc::new(store);
        let key = shard_key("turn/abc");
        let tasks = (0..16)
            .map(|_| {
                let store = store.clone();
                let key = key.clone();
                tokio::spawn(async move { store.get(&key).await.unwrap() })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(objects.fetches(), 1);
    }

    #[tokio::test]
    async fn missing_object_is_fetch_error_and_not_cached() {
        let (objects, store) = store_with("turn/abc", vec![]);
        let key = shard_key("turn/missing");
        let err = store.get(&key).await.unwrap_err();
        assert!(matches!(err, ShardError::Fetch(_)));
        // retries exhausted: initial attempt plus two retries
        assert_eq!(objects.fetches(), 3);
        // a later object appearance is picked up because the failure purged
        objects.insert(
            "solver-shards",
            "turn/missing",
            encode_shard(&[fixture("n9", Street::Turn, "AhKdQc2s")]).unwrap(),
        );
        assert!(store.get(&key).await.is_ok());
    }

    #[tokio::test]
    async fn corrupt_shard_is_decode_error() {
        let objects = Arc::new(MemoryObjectStore::default());
        objects.insert("solver-shards", "turn/bad", b"definitely not zstd".to_vec());
        let store = ShardStore::new(objects.clone(), 8, 2, std::time::Duration::from_millis(1));
        let err = store.get(&shard_key("turn/bad")).await.unwrap_err();
        assert!(matches!(err, ShardError::Decode(_)));
        // decode errors are not transport errors: no retries
        assert_eq!(objects.fetches(), 1);
    }
}
