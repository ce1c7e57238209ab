use crate::BigBlinds;
use crate::play::ActionSequence;

/// 32-bit FNV-1a. hand-rolled because the contract is stability:
/// the indexing side and every version of this crate must produce
/// identical values for identical canonical input.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    const OFFSET: u32 = 0x811c9dc5;
    const PRIME: u32 = 0x01000193;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ *b as u32).wrapping_mul(PRIME))
}

/// stable identity hash of a canonical action history joined with the pot.
/// the pot is rounded to a tenth of a big blind before hashing so that
/// float noise cannot shift the value.
pub fn action_hash(sequence: &ActionSequence, pot_bb: BigBlinds) -> u32 {
    let canonical = format!("{}|{:.1}", sequence, pot_bb);
    fnv1a32(canonical.as_bytes())
}
