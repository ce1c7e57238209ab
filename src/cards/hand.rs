use super::card::Card;

/// an unordered set of cards as a bitstring of 52 bits in a u64.
/// the equity engine lives on these: union, removal and membership
/// are single instructions, and showdown evaluation works off the
/// rank/suit sub-masks.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hand(u64);

impl Hand {
    pub const DECK: Self = Self((1 << 52) - 1);

    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn contains(&self, card: Card) -> bool {
        self.0 & u64::from(card) != 0
    }
    pub fn collides(&self, other: Hand) -> bool {
        self.0 & other.0 != 0
    }
    pub fn union(&self, other: Hand) -> Hand {
        Hand(self.0 | other.0)
    }
    pub fn remove(&self, other: Hand) -> Hand {
        Hand(self.0 & !other.0)
    }
    /// cards of the full deck not present in this hand
    pub fn complement(&self) -> Hand {
        Hand(!self.0 & Self::DECK.0)
    }
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        (0..52u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(Card::from)
    }
}

/// u64 isomorphism
impl From<u64> for Hand {
    fn from(n: u64) -> Self {
        Self(n)
    }
}
impl From<Hand> for u64 {
    fn from(hand: Hand) -> Self {
        hand.0
    }
}

/// we SUM/OR the cards to get the bitstring
impl From<Card> for Hand {
    fn from(card: Card) -> Self {
        Self(u64::from(card))
    }
}
impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self(iter.into_iter().map(u64::from).fold(0, |a, b| a | b))
    }
}
impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards().collect()
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in self.cards() {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

/// iterates every n-card hand that avoids a blocked mask, ascending by
/// bitstring. the equity engine deals runouts through this: blocked
/// cards are the board plus both players' holes.
pub struct HandIterator {
    hand: Hand,
    mask: Hand,
}

impl HandIterator {
    /// all size-n deals from the cards not in `mask`
    pub fn deals(n: usize, mask: Hand) -> Self {
        debug_assert!(n > 0 && n <= 52);
        Self {
            hand: Hand((1u64 << n) - 1),
            mask,
        }
    }
    fn blocks(&self, hand: Hand) -> bool {
        hand.collides(self.mask)
    }
    /// next bitstring with the same popcount
    fn permute(&self) -> Hand {
        let x = self.hand.0;
        let  a = /* 000_100 || 000_011 -> 000_111 */ x | (x - 1);
        let  b = /*            000_111 -> 001_000 */ a + 1;
        let  c = /* 111_000 && 001_000 -> 001_000 */ !a & b;
        let  d = /*            001_000 -> 000_111 */ c - 1;
        let  e = /*            000_100 >>     xxx */ 1 + x.trailing_zeros();
        Hand(b | (d >> e))
    }
}

impl Iterator for HandIterator {
    type Item = Hand;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.hand.0.leading_zeros() < 12 {
                return None;
            }
            let hand = self.hand;
            self.hand = self.permute();
            if self.blocks(hand) {
                continue;
            }
            return Some(hand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_removal() {
        let ah = "Ah".parse::<Card>().unwrap();
        let kd = "Kd".parse::<Card>().unwrap();
        let hand = Hand::from(ah).union(Hand::from(kd));
        assert_eq!(hand.size(), 2);
        assert!(hand.contains(ah));
        assert_eq!(hand.remove(Hand::from(ah)), Hand::from(kd));
    }

    #[test]
    fn iterator_counts_combinations() {
        assert_eq!(HandIterator::deals(1, Hand::default()).count(), 52);
        assert_eq!(HandIterator::deals(2, Hand::default()).count(), 52 * 51 / 2);
    }

    #[test]
    fn iterator_respects_blocked_cards() {
        let mask = ["Ah", "Kd", "7c"]
            .iter()
            .map(|s| s.parse::<Card>().unwrap())
            .collect::<Hand>();
        let singles: Vec<Hand> = HandIterator::deals(1, mask).collect();
        assert_eq!(singles.len(), 49);
        assert!(singles.iter().all(|h| h.size() == 1));
        assert!(singles.iter().all(|h| !h.collides(mask)));
        assert_eq!(HandIterator::deals(2, mask).count(), 49 * 48 / 2);
    }

    #[test]
    fn complement_partitions_deck() {
        let hand = ["2c", "7d", "As"]
            .iter()
            .map(|s| s.parse::<Card>().unwrap())
            .collect::<Hand>();
        let rest = hand.complement();
        assert_eq!(rest.size(), 49);
        assert!(!hand.collides(rest));
        assert_eq!(hand.union(rest), Hand::DECK);
    }
}
