use super::flop::FlopArchetype;
use super::flop::RankClass;
use super::hash::fnv1a32;
use super::texture::Texture;
use crate::BigBlinds;
use crate::FEATURE_DIMS;
use crate::Similarity;
use crate::cards::Board;
use crate::cards::Street;
use crate::play::ActionSequence;
use crate::play::PositionBucket;
use crate::play::PotType;

/// everything the vector layout consumes, whether it comes from a live
/// snapshot or is reconstructed from a shard node for the river search.
#[derive(Debug, Clone)]
pub struct FeatureInput<'a> {
    pub street: Street,
    pub pot_type: PotType,
    pub oop_bucket: Option<PositionBucket>,
    pub ip_bucket: Option<PositionBucket>,
    pub eff_stack_bb: BigBlinds,
    pub pot_bb: BigBlinds,
    pub board: &'a Board,
    pub sequence: &'a ActionSequence,
}

/// the fixed 71-dimension embedding shared with the indexing side.
///
/// layout (all slots f32, zero unless noted):
///
/// | dims   | content                                              |
/// |--------|------------------------------------------------------|
/// | 0..3   | OOP position bucket one-hot (EARLY, LATE, BLIND)     |
/// | 3..6   | IP position bucket one-hot (EARLY, LATE, BLIND)      |
/// | 6      | street code, street / 3                              |
/// | 7      | pot-type code, code / 3                              |
/// | 8      | effective stack in bb / 200, clamped to 1            |
/// | 9      | pot in bb / 100, clamped to 1                        |
/// | 10..18 | board-texture bits, LSB first                        |
/// | 18..27 | flop archetype: per sorted card, class one-hot (HLM) |
/// | 27..43 | action-sequence FNV-1a hash, 16-bucket one-hot       |
/// | 43..71 | reserved, zero                                       |
///
/// changing any assignment desynchronizes retrieval from the corpus;
/// the conformance tests below pin the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f32; FEATURE_DIMS]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }
}

impl From<&FeatureInput<'_>> for FeatureVector {
    fn from(input: &FeatureInput) -> Self {
        let mut dims = [0f32; FEATURE_DIMS];
        if let Some(bucket) = input.oop_bucket {
            dims[bucket as usize] = 1.0;
        }
        if let Some(bucket) = input.ip_bucket {
            dims[3 + bucket as usize] = 1.0;
        }
        dims[6] = input.street as isize as f32 / 3.0;
        dims[7] = input.pot_type.code() as f32 / 3.0;
        dims[8] = (input.eff_stack_bb / 200.0).clamp(0.0, 1.0);
        dims[9] = (input.pot_bb / 100.0).clamp(0.0, 1.0);
        let texture = Texture::from(input.board);
        for bit in 0..8 {
            dims[10 + bit] = ((texture.bits() >> bit) & 1) as f32;
        }
        if input.board.flop().len() == 3 {
            for (i, class) in FlopArchetype::from(input.board).classes().iter().enumerate() {
                dims[18 + i * 3 + *class as usize] = 1.0;
            }
        }
        let bucket = fnv1a32(input.sequence.as_str().as_bytes()) % 16;
        dims[27 + bucket as usize] = 1.0;
        Self(dims)
    }
}

/// cosine similarity, NaN-free: zero vectors compare at zero.
pub fn cosine(a: &FeatureVector, b: &FeatureVector) -> Similarity {
    let dot: f32 = a.0.iter().zip(b.0.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.0.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.0.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::PositionBucket;

    fn input<'a>(board: &'a Board, sequence: &'a ActionSequence) -> FeatureInput<'a> {
        FeatureInput {
            street: Street::Flop,
            pot_type: PotType::Srp,
            oop_bucket: Some(PositionBucket::Blind),
            ip_bucket: Some(PositionBucket::Late),
            eff_stack_bb: 97.5,
            pot_bb: 5.5,
            board,
            sequence,
        }
    }

    #[test]
    fn layout_is_pinned() {
        let board = "AhKdQc".parse::<Board>().unwrap();
        let sequence = ActionSequence::parse_tokens(&["x"]);
        let vector = FeatureVector::from(&input(&board, &sequence));
        let dims = vector.as_slice();
        assert_eq!(dims.len(), 71);
        // buckets: OOP blind, IP late
        assert_eq!(dims[0..6], [0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        // street and pot type codes
        assert!((dims[6] - 1.0 / 3.0).abs() < 1e-6);
        assert!((dims[7] - 1.0 / 3.0).abs() < 1e-6);
        // stack and pot normalization
        assert!((dims[8] - 97.5 / 200.0).abs() < 1e-6);
        assert!((dims[9] - 5.5 / 100.0).abs() < 1e-6);
        // AKQ rainbow: connected + broadway-heavy bits only
        let texture = Texture::from(&board);
        assert_eq!(
            texture.bits(),
            Texture::CONNECTED | Texture::BROADWAY_HEAVY
        );
        assert_eq!(dims[10 + 4], 1.0);
        assert_eq!(dims[10 + 6], 1.0);
        // archetype HHH: one-hot H in each of the three slots
        assert_eq!(dims[18], 1.0);
        assert_eq!(dims[21], 1.0);
        assert_eq!(dims[24], 1.0);
        // exactly one hash bucket fires
        assert_eq!(dims[27..43].iter().filter(|&&d| d == 1.0).count(), 1);
        // padding stays zero
        assert!(dims[43..].iter().all(|&d| d == 0.0));
    }

    #[test]
    fn determinism() {
        let board = "Jh9h8c".parse::<Board>().unwrap();
        let sequence = ActionSequence::parse_tokens(&["x", "b5", "r15"]);
        let a = FeatureVector::from(&input(&board, &sequence));
        let b = FeatureVector::from(&input(&board, &sequence));
        assert_eq!(a, b);
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn different_sequences_diverge() {
        let board = "Jh9h8c".parse::<Board>().unwrap();
        let check = ActionSequence::parse_tokens(&["x"]);
        let bet = ActionSequence::parse_tokens(&["b5"]);
        let a = FeatureVector::from(&input(&board, &check));
        let b = FeatureVector::from(&input(&board, &bet));
        assert!(cosine(&a, &b) < 1.0);
    }

    #[test]
    fn missing_buckets_leave_zeros() {
        let board = "AhKdQc".parse::<Board>().unwrap();
        let sequence = ActionSequence::default();
        let mut i = input(&board, &sequence);
        i.oop_bucket = None;
        i.ip_bucket = None;
        let vector = FeatureVector::from(&i);
        assert!(vector.as_slice()[0..6].iter().all(|&d| d == 0.0));
    }
}
