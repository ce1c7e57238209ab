use crate::Chips;
use crate::Probability;
use crate::node::ActionFreq;
use crate::play::Action;
use crate::play::ActionKind;
use crate::play::Sizing;
use crate::play::SizingBounds;

/// one solver action with its parsed type and classified size.
/// `sizing.pot_fraction` is the solver's own pot geometry; the category
/// is judged against the actual pot the hero faces.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyAction {
    pub action: String,
    pub frequency: Probability,
    pub ev: f32,
    pub action_type: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<Sizing>,
}

/// the solved strategy at the matched node: the highest-frequency
/// action plus the full mix.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalStrategy {
    pub recommended_action: StrategyAction,
    pub action_frequencies: Vec<StrategyAction>,
}

impl StrategyAction {
    /// the documented default when a node carries no actions
    pub fn check() -> Self {
        Self {
            action: "Check".to_string(),
            frequency: 1.0,
            ev: 0.0,
            action_type: ActionKind::Check,
            sizing: None,
        }
    }

    pub fn parse(
        freq: &ActionFreq,
        solver_pot: Chips,
        actual_pot: Chips,
        bounds: &SizingBounds,
    ) -> Self {
        let parsed = Action::parse_token(&freq.action);
        let sizing = parsed.amount().filter(|a| *a > 0.0).map(|amount| {
            let for_category = if actual_pot > 0.0 {
                amount / actual_pot
            } else {
                0.0
            };
            Sizing {
                category: crate::play::SizeCategory::from_pot_fraction(for_category, bounds),
                pot_fraction: if solver_pot > 0.0 {
                    amount / solver_pot
                } else {
                    for_category
                },
            }
        });
        Self {
            action: freq.action.clone(),
            frequency: freq.frequency,
            ev: freq.ev,
            action_type: parsed.kind(),
            sizing,
        }
    }
}

impl OptimalStrategy {
    /// parse a node's acting-side mix; the recommendation is the
    /// argmax-frequency action, or a pure check when the mix is empty
    pub fn from_actions(
        actions: &[ActionFreq],
        solver_pot: Chips,
        actual_pot: Chips,
        bounds: &SizingBounds,
    ) -> Self {
        let action_frequencies: Vec<StrategyAction> = actions
            .iter()
            .map(|freq| StrategyAction::parse(freq, solver_pot, actual_pot, bounds))
            .collect();
        let recommended_action = action_frequencies
            .iter()
            .max_by(|a, b| {
                a.frequency
                    .partial_cmp(&b.frequency)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
            .unwrap_or_else(StrategyAction::check);
        Self {
            recommended_action,
            action_frequencies,
        }
    }

    /// at least two meaningfully mixed actions
    pub fn is_mixed(&self, threshold: Probability) -> bool {
        self.action_frequencies
            .iter()
            .filter(|a| a.frequency > threshold)
            .count()
            >= 2
    }
}
