/// tag families. priority modes and per-category caps act on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TagCategory {
    Action,
    HandType,
    RangeAdvantage,
    StratGoal,
    StratMixed,
    Position,
    Board,
    Blocker,
    Sizing,
    StackDepth,
    PotOdds,
    Meta,
}

/// how aggressively the generator trims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPriority {
    /// only ACTION, HAND:TYPE, RANGE:ADVANTAGE, STRAT:GOAL
    Concise,
    /// per-category caps
    #[default]
    Balanced,
    /// everything
    Verbose,
}

/// one strategic token for downstream coaching prose, e.g.
/// `[RANGE:ADVANTAGE:HERO]`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tag {
    pub category: TagCategory,
    pub text: String,
}

impl Tag {
    pub fn new(category: TagCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

impl TagCategory {
    /// categories the concise mode keeps
    pub const fn is_core(&self) -> bool {
        matches!(
            self,
            TagCategory::Action
                | TagCategory::HandType
                | TagCategory::RangeAdvantage
                | TagCategory::StratGoal
        )
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}]", self.text)
    }
}
