#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Street {
    Pref = 0isize,
    Flop = 1isize,
    Turn = 2isize,
    Rive = 3isize,
}

impl Street {
    pub const fn all() -> &'static [Self] {
        &[Self::Pref, Self::Flop, Self::Turn, Self::Rive]
    }
    pub const fn next(&self) -> Self {
        match self {
            Self::Pref => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::Rive,
            Self::Rive => panic!("terminal"),
        }
    }
    pub const fn prev(&self) -> Self {
        match self {
            Self::Pref => Self::Pref,
            Self::Flop => Self::Pref,
            Self::Turn => Self::Flop,
            Self::Rive => Self::Turn,
        }
    }
    /// community cards on board at this street
    pub const fn n_observed(&self) -> usize {
        match self {
            Self::Pref => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::Rive => 5,
        }
    }
    /// wire form shared with the index and shard corpus
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pref => "PREFLOP",
            Self::Flop => "FLOP",
            Self::Turn => "TURN",
            Self::Rive => "RIVER",
        }
    }
    /// vector-index collection holding this street's nodes
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::Pref => panic!("preflop nodes are not indexed"),
            Self::Flop => "flop_nodes",
            Self::Turn => "turn_nodes",
            Self::Rive => "river_nodes",
        }
    }
}

impl TryFrom<&str> for Street {
    type Error = super::card::CardError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "PREFLOP" => Ok(Self::Pref),
            "FLOP" => Ok(Self::Flop),
            "TURN" => Ok(Self::Turn),
            "RIVER" => Ok(Self::Rive),
            _ => Err(super::card::CardError::Street(s.to_string())),
        }
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for Street {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
impl<'de> serde::Deserialize<'de> for Street {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::Deserialize;
        let s = String::deserialize(deserializer)?;
        Street::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}

impl crate::Arbitrary for Street {
    fn random() -> Self {
        use rand::Rng;
        match rand::rng().random_range(0..4) {
            0 => Self::Pref,
            1 => Self::Flop,
            2 => Self::Turn,
            _ => Self::Rive,
        }
    }
}
