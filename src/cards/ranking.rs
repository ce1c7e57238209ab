use super::rank::Rank;

/// a showdown hand class, ordered by strength.
/// kickers are carried separately and break ties within a class.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),        // 4 kickers
    OnePair(Rank),         // 3 kickers
    TwoPair(Rank, Rank),   // 1 kicker
    ThreeOAK(Rank),        // 2 kickers
    Straight(Rank),        // 0 kickers
    Flush(Rank),           // 0 kickers
    FullHouse(Rank, Rank), // 0 kickers
    FourOAK(Rank),         // 1 kicker
    StraightFlush(Rank),   // 0 kickers
}

impl Ranking {
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "HighCard      {}", r),
            Ranking::OnePair(r) => write!(f, "OnePair       {}", r),
            Ranking::TwoPair(a, b) => write!(f, "TwoPair       {}{}", a, b),
            Ranking::ThreeOAK(r) => write!(f, "ThreeOfAKind  {}", r),
            Ranking::Straight(r) => write!(f, "Straight      {}", r),
            Ranking::Flush(r) => write!(f, "Flush         {}", r),
            Ranking::FullHouse(a, b) => write!(f, "FullHouse     {}{}", a, b),
            Ranking::FourOAK(r) => write!(f, "FourOfAKind   {}", r),
            Ranking::StraightFlush(r) => write!(f, "StraightFlush {}", r),
        }
    }
}
