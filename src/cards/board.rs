use super::card::Card;
use super::card::CardError;
use super::hand::Hand;
use super::street::Street;

/// community cards in dealt order. 0, 3, 4 or 5 cards.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
pub struct Board(Vec<Card>);

impl Board {
    pub fn cards(&self) -> &[Card] {
        &self.0
    }
    pub fn street(&self) -> Street {
        match self.0.len() {
            0 => Street::Pref,
            3 => Street::Flop,
            4 => Street::Turn,
            5 => Street::Rive,
            n => panic!("board of {} cards", n),
        }
    }
    /// the first three cards regardless of how many have been dealt
    pub fn flop(&self) -> &[Card] {
        &self.0[..self.0.len().min(3)]
    }
    /// the board as seen at an earlier (or equal) street
    pub fn at(&self, street: Street) -> Board {
        Board(self.0[..street.n_observed().min(self.0.len())].to_vec())
    }
    pub fn accept(&mut self, card: Card) {
        debug_assert!(self.0.len() < 5);
        self.0.push(card);
    }
}

impl From<Vec<Card>> for Board {
    fn from(cards: Vec<Card>) -> Self {
        debug_assert!(matches!(cards.len(), 0 | 3 | 4 | 5));
        Self(cards)
    }
}
impl From<&Board> for Hand {
    fn from(board: &Board) -> Self {
        board.0.iter().copied().collect()
    }
}

/// text form is concatenated cards, e.g. `AhKdQc` or `Ah Kd Qc`
impl std::str::FromStr for Board {
    type Err = CardError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact = s.replace(' ', "");
        if compact.len() % 2 != 0 {
            return Err(CardError::Board(s.to_string()));
        }
        let cards = (0..compact.len() / 2)
            .map(|i| compact[i * 2..i * 2 + 2].parse::<Card>())
            .collect::<Result<Vec<Card>, CardError>>()?;
        match cards.len() {
            0 | 3 | 4 | 5 => Ok(Self(cards)),
            _ => Err(CardError::Board(s.to_string())),
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in &self.0 {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl serde::Serialize for Board {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for card in &self.0 {
            seq.serialize_element(card)?;
        }
        seq.end()
    }
}
impl<'de> serde::Deserialize<'de> for Board {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::Deserialize;
        let cards = Vec::<Card>::deserialize(deserializer)?;
        match cards.len() {
            0 | 3 | 4 | 5 => Ok(Self(cards)),
            n => Err(serde::de::Error::custom(format!("board of {} cards", n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_street() {
        let board = "AhKdQc".parse::<Board>().unwrap();
        assert_eq!(board.street(), Street::Flop);
        let board = "AhKdQc2s".parse::<Board>().unwrap();
        assert_eq!(board.street(), Street::Turn);
    }

    #[test]
    fn truncation_by_street() {
        let board = "AhKdQc2s7d".parse::<Board>().unwrap();
        assert_eq!(board.at(Street::Flop).to_string(), "AhKdQc");
        assert_eq!(board.at(Street::Turn).to_string(), "AhKdQc2s");
        assert_eq!(board.at(Street::Rive), board);
    }

    #[test]
    fn rejects_two_card_board() {
        assert!("AhKd".parse::<Board>().is_err());
    }
}
