use super::archetype::classify;
use super::engine::EngineError;
use super::engine::is_value_combo;
use crate::Probability;
use crate::cards::Board;
use crate::cards::Card;
use crate::cards::Hand;
use crate::cards::Hole;
use crate::ranges::Range;
use std::collections::BTreeMap;

/// how much of the villain's range one hero card removes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRemoval {
    pub card: Card,
    pub combos_removed: f32,
    pub pct_of_range: f32,
}

/// a villain archetype the hero's cards suppress.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedArchetype {
    pub archetype: String,
    pub combos_blocked: f32,
}

/// the hero's card-removal effect on the villain range.
/// percentages are in [0, 100].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockerImpact {
    pub combos_blocked_pct: f32,
    pub value_blocked_pct: f32,
    pub bluffs_unblocked_pct: f32,
    pub card_removal: Vec<CardRemoval>,
    pub top_blocked: Vec<BlockedArchetype>,
}

const TOP_BLOCKED: usize = 5;

/// what the hero's two cards do to the villain's range on this board:
/// overall removal, removal split into value and non-value, per-card
/// impact, and the most-suppressed archetypes.
pub fn calculate_blocker_impact(
    hero: Hole,
    villain: &Range,
    board: &Board,
) -> Result<BlockerImpact, EngineError> {
    let live = villain.without(Hand::from(board));
    let total = live.total_combos();
    if total <= 0.0 {
        return Err(EngineError::empty_range(
            "villain range empty after board removal",
        ));
    }
    let hero_hand = Hand::from(hero);
    let blocked: Vec<(Hole, Probability)> = live
        .combos()
        .filter(|(h, _)| Hand::from(*h).collides(hero_hand))
        .collect();
    let blocked_weight: Probability = blocked.iter().map(|(_, w)| w).sum();

    let value_total: Probability = live
        .combos()
        .filter(|(h, _)| is_value_combo(*h, board))
        .map(|(_, w)| w)
        .sum();
    let value_blocked: Probability = blocked
        .iter()
        .filter(|(h, _)| is_value_combo(*h, board))
        .map(|(_, w)| w)
        .sum();
    let bluff_total = total - value_total;
    let bluff_blocked = blocked_weight - value_blocked;

    let mut card_removal = hero
        .cards()
        .iter()
        .map(|card| {
            let removed: Probability = live
                .combos()
                .filter(|(h, _)| Hand::from(*h).contains(*card))
                .map(|(_, w)| w)
                .sum();
            CardRemoval {
                card: *card,
                combos_removed: removed,
                pct_of_range: removed / total * 100.0,
            }
        })
        .collect::<Vec<_>>();
    card_removal.sort_by(|a, b| {
        b.combos_removed
            .partial_cmp(&a.combos_removed)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut by_archetype: BTreeMap<String, f32> = BTreeMap::new();
    for (hole, weight) in &blocked {
        let name = classify(*hole, board).display_name;
        *by_archetype.entry(name).or_default() += weight;
    }
    let mut top_blocked: Vec<BlockedArchetype> = by_archetype
        .into_iter()
        .map(|(archetype, combos_blocked)| BlockedArchetype {
            archetype,
            combos_blocked,
        })
        .collect();
    top_blocked.sort_by(|a, b| {
        b.combos_blocked
            .partial_cmp(&a.combos_blocked)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top_blocked.truncate(TOP_BLOCKED);

    Ok(BlockerImpact {
        combos_blocked_pct: blocked_weight / total * 100.0,
        value_blocked_pct: if value_total > 0.0 {
            value_blocked / value_total * 100.0
        } else {
            0.0
        },
        bluffs_unblocked_pct: if bluff_total > 0.0 {
            (bluff_total - bluff_blocked) / bluff_total * 100.0
        } else {
            0.0
        },
        card_removal,
        top_blocked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_blocks_top_pair() {
        let hero: Hole = "AhQd".parse().unwrap();
        let villain: Range = "AsKs:1,AcKc:1,7h6h:1,JsTs:1".parse().unwrap();
        let board: Board = "Ad8c2s".parse().unwrap();
        let impact = calculate_blocker_impact(hero, &villain, &board).unwrap();
        // hero's ace removes nothing here: As/Ac combos are live, the
        // board holds Ad; no villain combo uses Ah or Qd
        assert_eq!(impact.combos_blocked_pct, 0.0);
    }

    #[test]
    fn direct_card_collision() {
        let hero: Hole = "AsQd".parse().unwrap();
        let villain: Range = "AsKs:1,AcKc:1,7h6h:1".parse().unwrap();
        let board: Board = "Ad8c2s".parse().unwrap();
        let impact = calculate_blocker_impact(hero, &villain, &board).unwrap();
        // one of three live combos collides with the As
        assert!((impact.combos_blocked_pct - 100.0 / 3.0).abs() < 1e-3);
        let removal = impact
            .card_removal
            .iter()
            .find(|r| r.card == "As".parse().unwrap())
            .unwrap();
        assert!((removal.combos_removed - 1.0).abs() < 1e-6);
        assert!(!impact.top_blocked.is_empty());
    }

    #[test]
    fn value_vs_bluff_split() {
        let hero: Hole = "KsQd".parse().unwrap();
        // villain: one top-pair combo hero blocks, one unblocked bluff
        let villain: Range = "KhJh:1,7h6h:1".parse().unwrap();
        let board: Board = "Kd8c2s".parse().unwrap();
        let impact = calculate_blocker_impact(hero, &villain, &board).unwrap();
        // KhJh is live; hero's Ks does not collide with it
        assert_eq!(impact.value_blocked_pct, 0.0);
        assert!((impact.bluffs_unblocked_pct - 100.0).abs() < 1e-3);
    }

    #[test]
    fn percentages_bounded() {
        use crate::Arbitrary;
        for _ in 0..50 {
            let hero = Hole::random();
            let villain = Range::random();
            let board: Board = "Jh7c2s".parse().unwrap();
            let hero_dead = Hand::from(hero).collides(Hand::from(&board));
            if hero_dead {
                continue;
            }
            match calculate_blocker_impact(hero, &villain, &board) {
                Err(_) => {}
                Ok(impact) => {
                    for pct in [
                        impact.combos_blocked_pct,
                        impact.value_blocked_pct,
                        impact.bluffs_unblocked_pct,
                    ] {
                        assert!((0.0..=100.0 + 1e-3).contains(&pct), "{}", pct);
                    }
                }
            }
        }
    }
}
