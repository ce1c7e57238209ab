use crate::BigBlinds;
use crate::Chips;

/// a betting action, parsed from free-form hand-history or solver tokens.
/// amounts are raw table currency; `amount_bb` is carried when the source
/// supplied blinds to normalize with.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Check,
    Bet {
        amount: Chips,
        amount_bb: Option<BigBlinds>,
    },
    Raise {
        amount: Chips,
        amount_bb: Option<BigBlinds>,
    },
    Call,
    Fold,
    AllIn,
    Unknown,
}

/// the shape of an action with amounts erased; the alphabet of
/// action sequences and the tag generator's shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Check,
    Bet,
    Raise,
    Call,
    Fold,
    AllIn,
    Unknown,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Check => ActionKind::Check,
            Action::Bet { .. } => ActionKind::Bet,
            Action::Raise { .. } => ActionKind::Raise,
            Action::Call => ActionKind::Call,
            Action::Fold => ActionKind::Fold,
            Action::AllIn => ActionKind::AllIn,
            Action::Unknown => ActionKind::Unknown,
        }
    }
    pub fn amount(&self) -> Option<Chips> {
        match self {
            Action::Bet { amount, .. } | Action::Raise { amount, .. } => Some(*amount),
            _ => None,
        }
    }
    pub fn is_aggressive(&self) -> bool {
        self.kind().is_aggressive()
    }

    /// parse a free-form action token: full words (`bet 7.5`, `raise 21`,
    /// `all-in`), shorthand letters (`x`, `b33`, `r`), or anything else
    /// as Unknown. never fails; garbage degrades to Unknown.
    pub fn parse_token(token: &str) -> Self {
        let lower = token.trim().to_ascii_lowercase();
        let amount = Self::scan_amount(&lower);
        let word = lower
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or("");
        match word {
            "check" | "checks" => Action::Check,
            "bet" | "bets" => Action::Bet {
                amount: amount.unwrap_or(0.0),
                amount_bb: None,
            },
            "raise" | "raises" | "reraise" => Action::Raise {
                amount: amount.unwrap_or(0.0),
                amount_bb: None,
            },
            "call" | "calls" => Action::Call,
            "fold" | "folds" => Action::Fold,
            "allin" | "all" | "shove" | "jam" => Action::AllIn,
            "x" => Action::Check,
            "b" => Action::Bet {
                amount: amount.unwrap_or(0.0),
                amount_bb: None,
            },
            "r" => Action::Raise {
                amount: amount.unwrap_or(0.0),
                amount_bb: None,
            },
            "c" => Action::Call,
            "f" => Action::Fold,
            "a" => Action::AllIn,
            _ => Action::Unknown,
        }
    }

    /// the first decimal number anywhere in the token
    fn scan_amount(token: &str) -> Option<Chips> {
        token
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .filter(|s| !s.is_empty())
            .find_map(|s| s.parse::<Chips>().ok())
    }

    /// attach a big-blind normalization to the carried amount
    pub fn normalized(self, bb: Chips) -> Self {
        match self {
            Action::Bet { amount, .. } => Action::Bet {
                amount,
                amount_bb: Some(amount / bb),
            },
            Action::Raise { amount, .. } => Action::Raise {
                amount,
                amount_bb: Some(amount / bb),
            },
            other => other,
        }
    }
}

impl ActionKind {
    pub const fn is_aggressive(&self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise | ActionKind::AllIn)
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Check => "check",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::Call => "call",
            ActionKind::Fold => "fold",
            ActionKind::AllIn => "allin",
            ActionKind::Unknown => "unknown",
        }
    }
    /// single-letter encoding used by action sequences
    pub const fn letter(&self) -> char {
        match self {
            ActionKind::Check => 'X',
            ActionKind::Bet => 'B',
            ActionKind::Raise => 'R',
            ActionKind::Call => 'C',
            ActionKind::Fold => 'F',
            ActionKind::AllIn => 'A',
            ActionKind::Unknown => 'U',
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Bet { amount, .. } => write!(f, "bet {}", amount),
            Action::Raise { amount, .. } => write!(f, "raise {}", amount),
            other => write!(f, "{}", other.kind().as_str()),
        }
    }
}
