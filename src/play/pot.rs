/// how the pot got built preflop, keyed by the number of raises.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PotType {
    #[serde(rename = "limped")]
    Limped,
    #[serde(rename = "srp")]
    Srp,
    #[serde(rename = "3bp")]
    ThreeBet,
    #[serde(rename = "4bp")]
    FourBet,
}

impl PotType {
    /// from the count of preflop raises (all-ins included)
    pub const fn from_raises(n: usize) -> Self {
        match n {
            0 => Self::Limped,
            1 => Self::Srp,
            2 => Self::ThreeBet,
            _ => Self::FourBet,
        }
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Limped => "limped",
            Self::Srp => "srp",
            Self::ThreeBet => "3bp",
            Self::FourBet => "4bp",
        }
    }
    /// coarse numeric code used by the feature vector
    pub const fn code(&self) -> u8 {
        match self {
            Self::Limped => 0,
            Self::Srp => 1,
            Self::ThreeBet => 2,
            Self::FourBet => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Cash,
    Mtt,
}

impl GameType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Mtt => "mtt",
        }
    }
}

impl std::fmt::Display for PotType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
