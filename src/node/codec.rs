use super::analysis::NodeAnalysis;
use byteorder::BE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Read;
use std::io::Write;

/// shard transport and decode failures. fetch errors are transient and
/// retried; decode errors are fatal for the affected snapshot and purge
/// the cache entry so a later retry re-reads the object.
#[derive(Debug, thiserror::Error, Clone)]
pub enum ShardError {
    #[error("shard fetch failed: {0}")]
    Fetch(String),
    #[error("shard decode failed: {0}")]
    Decode(String),
    #[error("shard fetch cancelled")]
    Cancelled,
}

const MAGIC: [u8; 4] = *b"RBNS";
const VERSION: u16 = 1;

/// decode one shard object: a single zstd frame whose payload is a
/// versioned header followed by a length-prefixed sequence of
/// `NodeAnalysis` records.
///
/// payload layout, all integers big-endian:
/// magic `RBNS`, u16 version, u32 record count,
/// then per record a u32 byte length and that many bytes of JSON.
pub fn decode_shard(compressed: &[u8]) -> Result<Vec<NodeAnalysis>, ShardError> {
    let payload =
        zstd::stream::decode_all(compressed).map_err(|e| ShardError::Decode(e.to_string()))?;
    let ref mut reader = std::io::Cursor::new(payload.as_slice());
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| ShardError::Decode(e.to_string()))?;
    if magic != MAGIC {
        return Err(ShardError::Decode(format!("bad magic {:02x?}", magic)));
    }
    let version = reader
        .read_u16::<BE>()
        .map_err(|e| ShardError::Decode(e.to_string()))?;
    if version != VERSION {
        return Err(ShardError::Decode(format!(
            "unsupported shard version {}",
            version
        )));
    }
    let count = reader
        .read_u32::<BE>()
        .map_err(|e| ShardError::Decode(e.to_string()))? as usize;
    let mut nodes = Vec::with_capacity(count);
    for i in 0..count {
        let length = reader
            .read_u32::<BE>()
            .map_err(|e| ShardError::Decode(format!("record {}: {}", i, e)))?
            as usize;
        let mut record = vec![0u8; length];
        reader
            .read_exact(&mut record)
            .map_err(|e| ShardError::Decode(format!("record {}: {}", i, e)))?;
        let node = serde_json::from_slice::<NodeAnalysis>(&record)
            .map_err(|e| ShardError::Decode(format!("record {}: {}", i, e)))?;
        nodes.push(node);
    }
    if reader.position() as usize != payload.len() {
        return Err(ShardError::Decode("trailing bytes after records".to_string()));
    }
    Ok(nodes)
}

/// encode a shard object; the inverse of `decode_shard`. used by the
/// indexing side and by fixtures.
pub fn encode_shard(nodes: &[NodeAnalysis]) -> Result<Vec<u8>, ShardError> {
    let mut payload = Vec::new();
    payload
        .write_all(&MAGIC)
        .and_then(|_| payload.write_u16::<BE>(VERSION))
        .map_err(|e| ShardError::Decode(e.to_string()))?;
    payload
        .write_u32::<BE>(nodes.len() as u32)
        .map_err(|e| ShardError::Decode(e.to_string()))?;
    for node in nodes {
        let record = serde_json::to_vec(node).map_err(|e| ShardError::Decode(e.to_string()))?;
        payload
            .write_u32::<BE>(record.len() as u32)
            .and_then(|_| payload.write_all(&record))
            .map_err(|e| ShardError::Decode(e.to_string()))?;
    }
    zstd::stream::encode_all(payload.as_slice(), 0).map_err(|e| ShardError::Decode(e.to_string()))
}
