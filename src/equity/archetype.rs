use crate::cards::Board;
use crate::cards::Evaluator;
use crate::cards::Hand;
use crate::cards::Hole;
use crate::cards::Rank;
use crate::cards::Ranking;
use crate::cards::Street;

/// made-hand tier on the current board. every legal combo maps to
/// exactly one tier; classification is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum MadeTier {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
}

/// refinement of `MadeTier::Pair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PairSubtype {
    OverPair,
    TopPair,
    TopPairGoodKicker,
    MiddlePair,
    WeakPair,
    BottomPair,
    Pocket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawFlag {
    FlushDraw,
    BackdoorFd,
    Oesd,
    Gutshot,
    DoubleGut,
    ComboDraw,
}

/// the equivalence class a hand falls into on a given board.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandArchetype {
    pub made_tier: MadeTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_subtype: Option<PairSubtype>,
    pub draw_flags: Vec<DrawFlag>,
    pub display_name: String,
}

impl From<Ranking> for MadeTier {
    fn from(ranking: Ranking) -> Self {
        match ranking {
            Ranking::HighCard(_) => MadeTier::HighCard,
            Ranking::OnePair(_) => MadeTier::Pair,
            Ranking::TwoPair(_, _) => MadeTier::TwoPair,
            Ranking::ThreeOAK(_) => MadeTier::Trips,
            Ranking::Straight(_) => MadeTier::Straight,
            Ranking::Flush(_) => MadeTier::Flush,
            Ranking::FullHouse(_, _) => MadeTier::FullHouse,
            Ranking::FourOAK(_) => MadeTier::Quads,
            Ranking::StraightFlush(_) => MadeTier::StraightFlush,
        }
    }
}

impl MadeTier {
    pub const fn name(&self) -> &'static str {
        match self {
            MadeTier::HighCard => "High Card",
            MadeTier::Pair => "Pair",
            MadeTier::TwoPair => "Two Pair",
            MadeTier::Trips => "Trips",
            MadeTier::Straight => "Straight",
            MadeTier::Flush => "Flush",
            MadeTier::FullHouse => "Full House",
            MadeTier::Quads => "Quads",
            MadeTier::StraightFlush => "Straight Flush",
        }
    }
}

impl PairSubtype {
    pub const fn name(&self) -> &'static str {
        match self {
            PairSubtype::OverPair => "Overpair",
            PairSubtype::TopPair => "Top Pair",
            PairSubtype::TopPairGoodKicker => "Top Pair Good Kicker",
            PairSubtype::MiddlePair => "Middle Pair",
            PairSubtype::WeakPair => "Weak Pair",
            PairSubtype::BottomPair => "Bottom Pair",
            PairSubtype::Pocket => "Pocket Pair",
        }
    }
}

impl DrawFlag {
    pub const fn name(&self) -> &'static str {
        match self {
            DrawFlag::FlushDraw => "Flush Draw",
            DrawFlag::BackdoorFd => "Backdoor Flush Draw",
            DrawFlag::Oesd => "Open-Ended Straight Draw",
            DrawFlag::Gutshot => "Gutshot",
            DrawFlag::DoubleGut => "Double Gutshot",
            DrawFlag::ComboDraw => "Combo Draw",
        }
    }
}

/// classify a hole/board pair into its archetype. total over all legal
/// inputs; draws are only looked for while cards remain to come and the
/// made hand has not already reached the draw's tier.
pub fn classify(hole: Hole, board: &Board) -> HandArchetype {
    let full = Hand::from(hole).union(Hand::from(board));
    let ranking = Evaluator::from(full).ranking();
    let made_tier = MadeTier::from(ranking);
    let pair_subtype = match (made_tier, ranking) {
        (MadeTier::Pair, Ranking::OnePair(rank)) => Some(pair_subtype(hole, board, rank)),
        _ => None,
    };
    let draw_flags = draw_flags(hole, board, made_tier);
    let display_name = display_name(made_tier, pair_subtype, &draw_flags);
    HandArchetype {
        made_tier,
        pair_subtype,
        draw_flags,
        display_name,
    }
}

fn pair_subtype(hole: Hole, board: &Board, paired: Rank) -> PairSubtype {
    let board_ranks: Vec<Rank> = board.cards().iter().map(|c| c.rank()).collect();
    let top = board_ranks.iter().copied().max().expect("postflop board");
    let bottom = board_ranks.iter().copied().min().expect("postflop board");
    if hole.is_pocket_pair() {
        let rank = hole.hi().rank();
        return if rank > top {
            PairSubtype::OverPair
        } else if rank < bottom {
            PairSubtype::WeakPair
        } else {
            PairSubtype::Pocket
        };
    }
    let hole_pairs_board = hole.cards().iter().any(|c| c.rank() == paired);
    if !hole_pairs_board {
        // the pair belongs to the board
        return PairSubtype::WeakPair;
    }
    if paired == top {
        let kicker = hole
            .cards()
            .iter()
            .map(|c| c.rank())
            .find(|r| *r != paired)
            .unwrap_or(paired);
        if kicker >= Rank::Ten {
            PairSubtype::TopPairGoodKicker
        } else {
            PairSubtype::TopPair
        }
    } else if paired == bottom {
        PairSubtype::BottomPair
    } else {
        PairSubtype::MiddlePair
    }
}

fn draw_flags(hole: Hole, board: &Board, made: MadeTier) -> Vec<DrawFlag> {
    if board.street() >= Street::Rive {
        return Vec::new();
    }
    let mut flags = Vec::new();
    if made < MadeTier::Flush {
        match flush_draw(hole, board) {
            Some(true) => flags.push(DrawFlag::FlushDraw),
            Some(false) if board.street() == Street::Flop => flags.push(DrawFlag::BackdoorFd),
            _ => {}
        }
    }
    if made < MadeTier::Straight {
        match straight_outs(hole, board) {
            0 => {}
            1 => flags.push(DrawFlag::Gutshot),
            2 if open_ended(hole, board) => flags.push(DrawFlag::Oesd),
            2 => flags.push(DrawFlag::DoubleGut),
            _ => flags.push(DrawFlag::Oesd),
        }
    }
    let flush = flags.contains(&DrawFlag::FlushDraw);
    let straight = flags
        .iter()
        .any(|f| matches!(f, DrawFlag::Oesd | DrawFlag::Gutshot | DrawFlag::DoubleGut));
    if flush && straight {
        flags.push(DrawFlag::ComboDraw);
    }
    flags
}

/// Some(true): four to a flush using a hole card.
/// Some(false): three to a flush using a hole card (backdoor material).
fn flush_draw(hole: Hole, board: &Board) -> Option<bool> {
    for suit in crate::cards::Suit::all().iter().copied() {
        let held = hole.cards().iter().filter(|c| c.suit() == suit).count();
        if held == 0 {
            continue;
        }
        let shown = board.cards().iter().filter(|c| c.suit() == suit).count();
        match held + shown {
            4 => return Some(true),
            3 => return Some(false),
            _ => {}
        }
    }
    None
}

/// distinct ranks whose arrival completes a straight for the hero
/// without the board making that straight on its own
fn straight_outs(hole: Hole, board: &Board) -> usize {
    let ours = Hand::from(hole).union(Hand::from(board));
    let dead = ours;
    Rank::all()
        .iter()
        .copied()
        .filter(|rank| {
            let card = some_live_card(*rank, dead);
            match card {
                None => false,
                Some(card) => {
                    completes_straight(ours.union(Hand::from(card)))
                        && !completes_straight(Hand::from(board).union(Hand::from(card)))
                }
            }
        })
        .count()
}

fn some_live_card(rank: Rank, dead: Hand) -> Option<crate::cards::Card> {
    crate::cards::Suit::all()
        .iter()
        .copied()
        .map(|suit| crate::cards::Card::from((rank, suit)))
        .find(|card| !dead.contains(*card))
}

fn completes_straight(hand: Hand) -> bool {
    const WHEEL: u16 = 0b_1_0000_0000_1111;
    let mask = hand
        .cards()
        .map(|c| u16::from(c.rank()))
        .fold(0u16, |acc, r| acc | r);
    let mut bits = mask;
    bits &= bits << 1;
    bits &= bits << 1;
    bits &= bits << 1;
    bits &= bits << 1;
    bits > 0 || mask & WHEEL == WHEEL
}

/// with two out-ranks, an open-ender's outs sit five ranks apart;
/// anything tighter is a double gutter
fn open_ended(hole: Hole, board: &Board) -> bool {
    let ours = Hand::from(hole).union(Hand::from(board));
    let outs: Vec<Rank> = Rank::all()
        .iter()
        .copied()
        .filter(|rank| match some_live_card(*rank, ours) {
            None => false,
            Some(card) => {
                completes_straight(ours.union(Hand::from(card)))
                    && !completes_straight(Hand::from(board).union(Hand::from(card)))
            }
        })
        .collect();
    match outs.as_slice() {
        [a, b] => (*b as i8 - *a as i8) == 5,
        _ => false,
    }
}

fn display_name(
    made: MadeTier,
    pair: Option<PairSubtype>,
    draws: &[DrawFlag],
) -> String {
    let mut parts: Vec<&'static str> = Vec::new();
    match pair {
        Some(subtype) => parts.push(subtype.name()),
        None => parts.push(made.name()),
    }
    for draw in draws.iter().filter(|d| **d != DrawFlag::ComboDraw) {
        parts.push(draw.name());
    }
    parts.join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archetype(hole: &str, board: &str) -> HandArchetype {
        classify(hole.parse().unwrap(), &board.parse().unwrap())
    }

    #[test]
    fn top_pair_good_kicker() {
        let a = archetype("AhKd", "Kh7c2s");
        assert_eq!(a.made_tier, MadeTier::Pair);
        assert_eq!(a.pair_subtype, Some(PairSubtype::TopPairGoodKicker));
        assert_eq!(a.display_name, "Top Pair Good Kicker");
    }

    #[test]
    fn overpair_vs_pocket() {
        assert_eq!(
            archetype("QdQc", "Jh7c4s").pair_subtype,
            Some(PairSubtype::OverPair)
        );
        assert_eq!(
            archetype("9d9c", "Jh7c4s").pair_subtype,
            Some(PairSubtype::Pocket)
        );
        assert_eq!(
            archetype("3d3c", "Jh7c4s").pair_subtype,
            Some(PairSubtype::WeakPair)
        );
    }

    #[test]
    fn bottom_and_middle_pair() {
        assert_eq!(
            archetype("7h6d", "Jh7c2s").pair_subtype,
            Some(PairSubtype::MiddlePair)
        );
        assert_eq!(
            archetype("2h6d", "Jh7c2s").pair_subtype,
            Some(PairSubtype::BottomPair)
        );
    }

    #[test]
    fn board_pair_is_weak() {
        let a = archetype("Ah6d", "Kh7c7s");
        assert_eq!(a.made_tier, MadeTier::Pair);
        assert_eq!(a.pair_subtype, Some(PairSubtype::WeakPair));
    }

    #[test]
    fn flush_draw_and_backdoor() {
        let a = archetype("Ah5h", "Kh7h2s");
        assert!(a.draw_flags.contains(&DrawFlag::FlushDraw));
        let b = archetype("Ah5h", "Kh7c2s");
        assert!(b.draw_flags.contains(&DrawFlag::BackdoorFd));
    }

    #[test]
    fn open_ender_vs_gutshot() {
        let oesd = archetype("9h8d", "7c6s2h");
        assert!(oesd.draw_flags.contains(&DrawFlag::Oesd));
        let gut = archetype("9h8d", "6c5s2h");
        assert!(gut.draw_flags.contains(&DrawFlag::Gutshot));
    }

    #[test]
    fn combo_draw() {
        let a = archetype("9h8h", "7h6h2s");
        assert!(a.draw_flags.contains(&DrawFlag::FlushDraw));
        assert!(a.draw_flags.contains(&DrawFlag::ComboDraw));
    }

    #[test]
    fn made_straight_has_no_straight_draw() {
        let a = archetype("9h8d", "7c6s5h");
        assert_eq!(a.made_tier, MadeTier::Straight);
        assert!(a.draw_flags.is_empty());
    }

    #[test]
    fn no_draws_on_river() {
        let a = archetype("9h8h", "7h6h2s3cKd");
        assert!(a.draw_flags.is_empty());
    }

    #[test]
    fn totality_over_random_inputs() {
        use crate::Arbitrary;
        for _ in 0..200 {
            let hole = Hole::random();
            let mut cards = Vec::new();
            while cards.len() < 5 {
                let card = crate::cards::Card::random();
                let held = Hand::from(hole).contains(card);
                if !held && !cards.contains(&card) {
                    cards.push(card);
                }
            }
            let board = Board::from(cards);
            let archetype = classify(hole, &board);
            assert!(!archetype.display_name.is_empty());
        }
    }
}
