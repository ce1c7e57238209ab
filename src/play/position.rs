/// six-max table positions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Position {
    EP,
    MP,
    CO,
    BTN,
    SB,
    BB,
}

/// coarse grouping shared with the vector index.
/// the exact table is fixed: EP,MP → EARLY; CO,BTN → LATE; SB,BB → BLIND.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionBucket {
    Early,
    Late,
    Blind,
}

/// which of the two players acts, postflop-relative.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Oop,
    Ip,
}

impl Position {
    pub const fn bucket(&self) -> PositionBucket {
        match self {
            Position::EP | Position::MP => PositionBucket::Early,
            Position::CO | Position::BTN => PositionBucket::Late,
            Position::SB | Position::BB => PositionBucket::Blind,
        }
    }
    /// postflop acting order; lower acts first and is therefore OOP
    pub const fn postflop_order(&self) -> u8 {
        match self {
            Position::SB => 0,
            Position::BB => 1,
            Position::EP => 2,
            Position::MP => 3,
            Position::CO => 4,
            Position::BTN => 5,
        }
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            Position::EP => "EP",
            Position::MP => "MP",
            Position::CO => "CO",
            Position::BTN => "BTN",
            Position::SB => "SB",
            Position::BB => "BB",
        }
    }
}

impl PositionBucket {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PositionBucket::Early => "EARLY",
            PositionBucket::Late => "LATE",
            PositionBucket::Blind => "BLIND",
        }
    }
}

impl Seat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Seat::Oop => "oop",
            Seat::Ip => "ip",
        }
    }
    pub const fn other(&self) -> Seat {
        match self {
            Seat::Oop => Seat::Ip,
            Seat::Ip => Seat::Oop,
        }
    }
}

/// the two seats of a heads-up pot by table position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Positions {
    pub oop: Position,
    pub ip: Position,
}

impl Positions {
    /// order two table positions into postflop seats
    pub fn from_pair(a: Position, b: Position) -> Self {
        if a.postflop_order() <= b.postflop_order() {
            Self { oop: a, ip: b }
        } else {
            Self { oop: b, ip: a }
        }
    }
    pub fn seat_of(&self, position: Position) -> Seat {
        if position == self.oop {
            Seat::Oop
        } else {
            Seat::Ip
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl std::fmt::Display for PositionBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
