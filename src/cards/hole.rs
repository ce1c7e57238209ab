use super::card::Card;
use super::card::CardError;
use super::hand::Hand;

/// exactly two hole cards, stored high card first.
/// text form is four characters, e.g. `AhKh`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hole(Card, Card);

impl Hole {
    pub fn hi(&self) -> Card {
        self.0
    }
    pub fn lo(&self) -> Card {
        self.1
    }
    pub fn cards(&self) -> [Card; 2] {
        [self.0, self.1]
    }
    pub fn is_pocket_pair(&self) -> bool {
        self.0.rank() == self.1.rank()
    }
}

impl From<(Card, Card)> for Hole {
    fn from((a, b): (Card, Card)) -> Self {
        if a >= b { Self(a, b) } else { Self(b, a) }
    }
}

impl From<Hole> for Hand {
    fn from(hole: Hole) -> Self {
        Hand::from(hole.0).union(Hand::from(hole.1))
    }
}

impl std::str::FromStr for Hole {
    type Err = CardError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 {
            return Err(CardError::Hole(s.to_string()));
        }
        let a = s[0..2].parse::<Card>()?;
        let b = s[2..4].parse::<Card>()?;
        if a == b {
            return Err(CardError::Hole(s.to_string()));
        }
        Ok(Self::from((a, b)))
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

impl serde::Serialize for Hole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for Hole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::Deserialize;
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl crate::Arbitrary for Hole {
    fn random() -> Self {
        use rand::Rng;
        let a = rand::rng().random_range(0..52u8);
        let b = loop {
            let b = rand::rng().random_range(0..52u8);
            if b != a {
                break b;
            }
        };
        Self::from((Card::from(a), Card::from(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order() {
        let x = "KhAh".parse::<Hole>().unwrap();
        let y = "AhKh".parse::<Hole>().unwrap();
        assert_eq!(x, y);
        assert_eq!(x.to_string(), "AhKh");
    }

    #[test]
    fn rejects_duplicates_and_bad_lengths() {
        assert!("AhAh".parse::<Hole>().is_err());
        assert!("Ah".parse::<Hole>().is_err());
        assert!("AhKhQh".parse::<Hole>().is_err());
    }
}
