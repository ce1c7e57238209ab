use super::hand::Hand;
use super::kicks::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::suit::Suit;

/// a lazy evaluator for a hand's strength.
///
/// works off the compact bitset representation: searches for the
/// highest Ranking using rank/suit sub-masks and bitwise shifts,
/// checking hand classes from strongest to weakest.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    pub fn ranking(&self) -> Ranking {
        None.or_else(|| self.flush_or_better())
            .or_else(|| self.quads())
            .or_else(|| self.boat())
            .or_else(|| self.straight())
            .or_else(|| self.trips())
            .or_else(|| self.pairs())
            .or_else(|| self.high_card())
            .expect("at least one card in hand")
    }

    pub fn kickers(&self, ranking: Ranking) -> Kickers {
        let n = ranking.n_kickers();
        if n == 0 {
            return Kickers::from(0u16);
        }
        let used = match ranking {
            Ranking::TwoPair(hi, lo) => u16::from(hi) | u16::from(lo),
            Ranking::HighCard(hi)
            | Ranking::OnePair(hi)
            | Ranking::ThreeOAK(hi)
            | Ranking::FourOAK(hi) => u16::from(hi),
            _ => unreachable!("kickerless ranking"),
        };
        let mut bits = self.rank_mask() & !used;
        while bits.count_ones() as usize > n {
            bits &= !(1 << bits.trailing_zeros());
        }
        Kickers::from(bits)
    }

    fn high_card(&self) -> Option<Ranking> {
        self.n_of_a_kind_below(1, None).map(Ranking::HighCard)
    }
    fn pairs(&self) -> Option<Ranking> {
        self.n_of_a_kind_below(2, None).map(|hi| {
            self.n_of_a_kind_below(2, Some(hi))
                .map(|lo| Ranking::TwoPair(hi, lo))
                .unwrap_or(Ranking::OnePair(hi))
        })
    }
    fn trips(&self) -> Option<Ranking> {
        self.n_of_a_kind_below(3, None).map(Ranking::ThreeOAK)
    }
    fn boat(&self) -> Option<Ranking> {
        self.n_of_a_kind_below(3, None).and_then(|trips| {
            self.n_of_a_kind_below(2, Some(trips))
                .map(|pair| Ranking::FullHouse(trips, pair))
        })
    }
    fn quads(&self) -> Option<Ranking> {
        self.n_of_a_kind_below(4, None).map(Ranking::FourOAK)
    }
    fn straight(&self) -> Option<Ranking> {
        Self::straight_high(self.rank_mask()).map(Ranking::Straight)
    }
    fn flush_or_better(&self) -> Option<Ranking> {
        self.flush_suit().map(|suit| {
            let bits = self.suit_mask(suit);
            Self::straight_high(bits)
                .map(Ranking::StraightFlush)
                .unwrap_or(Ranking::Flush(Rank::from(bits)))
        })
    }

    /// highest rank completing a 5-run in the mask, wheel included
    fn straight_high(mask: u16) -> Option<Rank> {
        const WHEEL: u16 = 0b_1_0000_0000_1111;
        let mut bits = mask;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if mask & WHEEL == WHEEL {
            Some(Rank::Five)
        } else {
            None
        }
    }

    /// highest rank held at least n times, strictly below `under` if given
    fn n_of_a_kind_below(&self, n: u32, under: Option<Rank>) -> Option<Rank> {
        let cap = under.map(|r| r as u8).unwrap_or(13);
        let hand = u64::from(self.0);
        (0..cap)
            .rev()
            .find(|&r| ((hand >> (4 * r as u64)) & 0b1111).count_ones() >= n)
            .map(Rank::from)
    }

    fn rank_mask(&self) -> u16 {
        self.0
            .cards()
            .map(|c| u16::from(c.rank()))
            .fold(0, |acc, r| acc | r)
    }
    fn suit_mask(&self, suit: Suit) -> u16 {
        self.0
            .cards()
            .filter(|c| c.suit() == suit)
            .map(|c| u16::from(c.rank()))
            .fold(0, |acc, r| acc | r)
    }
    fn flush_suit(&self) -> Option<Suit> {
        Suit::all()
            .iter()
            .copied()
            .find(|&s| self.0.cards().filter(|c| c.suit() == s).count() >= 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::Card;

    fn ranking(cards: &str) -> Ranking {
        let hand = (0..cards.len() / 2)
            .map(|i| cards[i * 2..i * 2 + 2].parse::<Card>().unwrap())
            .collect::<Hand>();
        Evaluator::from(hand).ranking()
    }

    #[test]
    fn high_card() {
        assert_eq!(ranking("As7h5d4c2s"), Ranking::HighCard(Rank::Ace));
    }

    #[test]
    fn two_pair_over_one_pair() {
        assert_eq!(
            ranking("JsJh5d5cAs"),
            Ranking::TwoPair(Rank::Jack, Rank::Five)
        );
    }

    #[test]
    fn straight_over_trips() {
        assert_eq!(ranking("9s8h7d6c5s9d9h"), Ranking::Straight(Rank::Nine));
    }

    #[test]
    fn wheel() {
        assert_eq!(ranking("Ah2c3d4s5h"), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn flush_beats_straight() {
        assert_eq!(ranking("4h6h7h8h9hTc"), Ranking::Flush(Rank::Nine));
    }

    #[test]
    fn boat_from_double_trips() {
        assert_eq!(
            ranking("QsQhQd3c3s3hKd"),
            Ranking::FullHouse(Rank::Queen, Rank::Three)
        );
    }

    #[test]
    fn quads_over_boat() {
        assert_eq!(ranking("7s7h7d7cKsKh"), Ranking::FourOAK(Rank::Seven));
    }

    #[test]
    fn steel_wheel() {
        assert_eq!(ranking("Ad2d3d4d5d"), Ranking::StraightFlush(Rank::Five));
    }

    #[test]
    fn kickers_exclude_made_rank() {
        let cards = "AsAhKdQc9s";
        let hand = (0..cards.len() / 2)
            .map(|i| cards[i * 2..i * 2 + 2].parse::<Card>().unwrap())
            .collect::<Hand>();
        let evaluator = Evaluator::from(hand);
        let ranking = evaluator.ranking();
        assert_eq!(ranking, Ranking::OnePair(Rank::Ace));
        let kicks = evaluator.kickers(ranking);
        assert_eq!(
            u16::from(kicks),
            u16::from(Rank::King) | u16::from(Rank::Queen) | u16::from(Rank::Nine)
        );
    }
}
