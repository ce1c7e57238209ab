use super::archetype::MadeTier;
use super::archetype::PairSubtype;
use super::archetype::classify;
use crate::Equity;
use crate::Probability;
use crate::cards::Board;
use crate::cards::Hand;
use crate::cards::HandIterator;
use crate::cards::Hole;
use crate::cards::Street;
use crate::cards::Strength;
use crate::features::fnv1a32;
use crate::play::Seat;
use crate::ranges::Range;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    InvalidCard,
    EmptyRange,
    InternalNumeric,
}

/// equity/range/blocker computation failure. callers substitute the
/// documented default structures and keep the rest of the block.
#[derive(Debug, thiserror::Error, Clone)]
#[error("engine {kind:?}: {detail}")]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub detail: String,
}

impl EngineError {
    pub fn empty_range(detail: &str) -> Self {
        Self {
            kind: EngineErrorKind::EmptyRange,
            detail: detail.to_string(),
        }
    }
    pub fn numeric(detail: &str) -> Self {
        Self {
            kind: EngineErrorKind::InternalNumeric,
            detail: detail.to_string(),
        }
    }
}

/// who is ahead, range against range, from the hero's perspective.
/// equities and value percentages are in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeAdvantage {
    pub hero_equity: Equity,
    pub villain_equity: Equity,
    pub equity_delta: Equity,
    pub hero_value_pct: f32,
    pub villain_value_pct: f32,
    pub value_delta: f32,
}

impl RangeAdvantage {
    /// the documented fallback when the engine fails
    pub fn even() -> Self {
        Self {
            hero_equity: 50.0,
            villain_equity: 50.0,
            equity_delta: 0.0,
            hero_value_pct: 0.0,
            villain_value_pct: 0.0,
            value_delta: 0.0,
        }
    }
}

/// runouts sampled per combo pair when two cards remain to come;
/// single-card runouts enumerate instead
const TWO_CARD_SAMPLES: usize = 50;

/// range-vs-range equity over the combo×combo matrix, weighted by combo
/// weights. remaining community cards are dealt (enumerated for one,
/// deterministically sampled for two); a complete board reduces to a
/// weighted win/tie/loss tally.
pub fn calculate_range_equity(
    oop: &Range,
    ip: &Range,
    board: &Board,
    next_to_act: Seat,
) -> Result<RangeAdvantage, EngineError> {
    let dead = Hand::from(board);
    let oop = oop.without(dead);
    let ip = ip.without(dead);
    if oop.is_empty() {
        return Err(EngineError::empty_range("oop range empty after removal"));
    }
    if ip.is_empty() {
        return Err(EngineError::empty_range("ip range empty after removal"));
    }
    let pairs: Vec<(Hole, Probability, Hole, Probability)> = oop
        .combos()
        .flat_map(|(ho, wo)| {
            ip.combos()
                .filter(move |(hi, _)| !Hand::from(*hi).collides(Hand::from(ho)))
                .map(move |(hi, wi)| (ho, wo, hi, wi))
        })
        .collect();
    if pairs.is_empty() {
        return Err(EngineError::empty_range("ranges fully block each other"));
    }
    let (weighted_oop_equity, weight) = pairs
        .par_iter()
        .map(|(ho, wo, hi, wi)| {
            let w = wo * wi;
            (pair_equity(*ho, *hi, board) * w, w)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));
    if weight <= 0.0 || !weighted_oop_equity.is_finite() {
        return Err(EngineError::numeric("degenerate pair weights"));
    }
    let oop_equity = weighted_oop_equity / weight * 100.0;
    let (hero_equity, villain_equity) = match next_to_act {
        Seat::Oop => (oop_equity, 100.0 - oop_equity),
        Seat::Ip => (100.0 - oop_equity, oop_equity),
    };
    let (hero, villain) = match next_to_act {
        Seat::Oop => (&oop, &ip),
        Seat::Ip => (&ip, &oop),
    };
    let hero_value_pct = value_pct(hero, board);
    let villain_value_pct = value_pct(villain, board);
    Ok(RangeAdvantage {
        hero_equity,
        villain_equity,
        equity_delta: hero_equity - villain_equity,
        hero_value_pct,
        villain_value_pct,
        value_delta: hero_value_pct - villain_value_pct,
    })
}

/// equity of one combo against another on a possibly incomplete board,
/// from the first combo's perspective
pub fn pair_equity(a: Hole, b: Hole, board: &Board) -> Equity {
    let dead = Hand::from(a).union(Hand::from(b)).union(Hand::from(board));
    let remaining = 5 - board.cards().len();
    match remaining {
        0 => showdown(a, b, Hand::from(board)),
        1 => {
            let runouts: Vec<Hand> = HandIterator::deals(1, dead).collect();
            let sum: f32 = runouts
                .iter()
                .map(|runout| showdown(a, b, Hand::from(board).union(*runout)))
                .sum();
            sum / runouts.len() as f32
        }
        _ => {
            // deterministic per-pair sampling keeps results reproducible
            let seed = fnv1a32(format!("{}|{}|{}", a, b, board).as_bytes());
            let mut rng = SmallRng::seed_from_u64(seed as u64);
            let runouts: Vec<Hand> = HandIterator::deals(remaining, dead).collect();
            let sum: f32 = (0..TWO_CARD_SAMPLES)
                .map(|_| runouts[rng.random_range(0..runouts.len())])
                .map(|runout| showdown(a, b, Hand::from(board).union(runout)))
                .sum();
            sum / TWO_CARD_SAMPLES as f32
        }
    }
}

fn showdown(a: Hole, b: Hole, community: Hand) -> Equity {
    let sa = Strength::from(Hand::from(a).union(community));
    let sb = Strength::from(Hand::from(b).union(community));
    match sa.cmp(&sb) {
        std::cmp::Ordering::Greater => 1.0,
        std::cmp::Ordering::Equal => 0.5,
        std::cmp::Ordering::Less => 0.0,
    }
}

/// counts a combo as value when it has two pair or better, or a pair
/// of at least top-pair quality
pub fn is_value_combo(hole: Hole, board: &Board) -> bool {
    let archetype = classify(hole, board);
    archetype.made_tier >= MadeTier::TwoPair
        || (archetype.made_tier == MadeTier::Pair
            && matches!(
                archetype.pair_subtype,
                Some(PairSubtype::OverPair)
                    | Some(PairSubtype::TopPair)
                    | Some(PairSubtype::TopPairGoodKicker)
            ))
}

/// weighted share of a range classified as value, in [0, 100]
pub fn value_pct(range: &Range, board: &Board) -> f32 {
    if board.street() < Street::Flop {
        return 0.0;
    }
    let total = range.total_combos();
    if total <= 0.0 {
        return 0.0;
    }
    let value: Probability = range
        .combos()
        .filter(|(hole, _)| is_value_combo(*hole, board))
        .map(|(_, weight)| weight)
        .sum();
    value / total * 100.0
}
