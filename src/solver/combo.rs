use super::strategy::StrategyAction;
use crate::Chips;
use crate::cards::Board;
use crate::cards::Hole;
use crate::equity::HandArchetype;
use crate::equity::classify;
use crate::node::ComboData;
use crate::play::SizingBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Med,
    High,
}

/// the solver's treatment of the hero's exact combo: archetype, the top
/// two actions of its mix, and how decisively the solver plays it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboStrategy {
    pub hero_hand: Hole,
    pub archetype: HandArchetype,
    pub top_actions: Vec<StrategyAction>,
    pub recommended_action: String,
    pub confidence: Confidence,
}

/// frequency of the top action decides confidence: a pure strategy is
/// high, a close mix is low
fn confidence(top_frequency: f32) -> Confidence {
    if top_frequency >= 0.7 {
        Confidence::High
    } else if top_frequency >= 0.4 {
        Confidence::Med
    } else {
        Confidence::Low
    }
}

/// look the hero's combo up in the node's per-combo data. `None` when
/// the solver never tracked this combo (e.g. it is outside the range).
pub fn build_combo_strategy(
    hero: Hole,
    board: &Board,
    combo_data: &ComboData,
    solver_pot: Chips,
    actual_pot: Chips,
    bounds: &SizingBounds,
) -> Option<ComboStrategy> {
    let mix = combo_data.get(&hero.to_string())?;
    if mix.is_empty() {
        return None;
    }
    let mut actions: Vec<StrategyAction> = mix
        .iter()
        .map(|freq| StrategyAction::parse(freq, solver_pot, actual_pot, bounds))
        .collect();
    actions.sort_by(|a, b| {
        b.frequency
            .partial_cmp(&a.frequency)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    actions.truncate(2);
    Some(ComboStrategy {
        hero_hand: hero,
        archetype: classify(hero, board),
        recommended_action: actions[0].action.clone(),
        confidence: confidence(actions[0].frequency),
        top_actions: actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ActionFreq;

    fn data(combo: &str, mix: Vec<(&str, f32)>) -> ComboData {
        let mut data = ComboData::new();
        data.insert(
            combo.to_string(),
            mix.into_iter()
                .map(|(action, frequency)| ActionFreq {
                    action: action.to_string(),
                    frequency,
                    ev: 1.0,
                })
                .collect(),
        );
        data
    }

    #[test]
    fn picks_top_two() {
        let hero: Hole = "AhKd".parse().unwrap();
        let board: Board = "Kh7c2s".parse().unwrap();
        let data = data("AhKd", vec![("bet 5", 0.75), ("check", 0.2), ("bet 15", 0.05)]);
        let strategy =
            build_combo_strategy(hero, &board, &data, 10.0, 10.0, &SizingBounds::default())
                .unwrap();
        assert_eq!(strategy.top_actions.len(), 2);
        assert_eq!(strategy.recommended_action, "bet 5");
        assert_eq!(strategy.confidence, Confidence::High);
        assert_eq!(strategy.archetype.display_name, "Top Pair Good Kicker");
    }

    #[test]
    fn unknown_combo_is_none() {
        let hero: Hole = "AhKd".parse().unwrap();
        let board: Board = "Kh7c2s".parse().unwrap();
        let data = data("QdQc", vec![("check", 1.0)]);
        assert!(
            build_combo_strategy(hero, &board, &data, 10.0, 10.0, &SizingBounds::default())
                .is_none()
        );
    }

    #[test]
    fn close_mix_is_low_confidence() {
        let hero: Hole = "AhKd".parse().unwrap();
        let board: Board = "Kh7c2s".parse().unwrap();
        let data = data("AhKd", vec![("bet 5", 0.35), ("check", 0.33), ("fold", 0.32)]);
        let strategy =
            build_combo_strategy(hero, &board, &data, 10.0, 10.0, &SizingBounds::default())
                .unwrap();
        assert_eq!(strategy.confidence, Confidence::Low);
    }
}
