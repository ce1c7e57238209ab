use crate::cards::Board;
use crate::cards::Rank;

/// coarse rank class for flop archetypes: L = 2–5, M = 6–9, H = T–A.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum RankClass {
    H = 0,
    L = 1,
    M = 2,
}

impl From<Rank> for RankClass {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Two | Rank::Three | Rank::Four | Rank::Five => RankClass::L,
            Rank::Six | Rank::Seven | Rank::Eight | Rank::Nine => RankClass::M,
            _ => RankClass::H,
        }
    }
}

impl RankClass {
    pub const fn letter(&self) -> char {
        match self {
            RankClass::H => 'H',
            RankClass::L => 'L',
            RankClass::M => 'M',
        }
    }
}

/// the three-letter flop equivalence class, letters sorted
/// lexicographically (H < L < M), e.g. `HHH` for AKQ, `HLM` for A7c2.
/// one of the exact-match retrieval filters.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FlopArchetype([RankClass; 3]);

impl From<&Board> for FlopArchetype {
    fn from(board: &Board) -> Self {
        let flop = board.flop();
        debug_assert!(flop.len() == 3);
        let mut classes = [RankClass::H; 3];
        for (slot, card) in classes.iter_mut().zip(flop) {
            *slot = RankClass::from(card.rank());
        }
        classes.sort();
        Self(classes)
    }
}

impl FlopArchetype {
    pub fn classes(&self) -> [RankClass; 3] {
        self.0
    }
}

impl std::fmt::Display for FlopArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for class in &self.0 {
            write!(f, "{}", class.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadway_flop_is_hhh() {
        let board = "AhKdQc".parse::<Board>().unwrap();
        assert_eq!(FlopArchetype::from(&board).to_string(), "HHH");
    }

    #[test]
    fn letters_sort_lexicographically() {
        let board = "7c2dAs".parse::<Board>().unwrap();
        assert_eq!(FlopArchetype::from(&board).to_string(), "HLM");
        let board = "2c6dTc".parse::<Board>().unwrap();
        assert_eq!(FlopArchetype::from(&board).to_string(), "HLM");
    }

    #[test]
    fn turn_card_does_not_change_archetype() {
        let flop = "9h6h2h".parse::<Board>().unwrap();
        let turn = "9h6h2hAs".parse::<Board>().unwrap();
        assert_eq!(FlopArchetype::from(&flop), FlopArchetype::from(&turn));
    }
}
