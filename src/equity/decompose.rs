use super::archetype::classify;
use super::engine::EngineError;
use crate::Probability;
use crate::cards::Board;
use crate::cards::Hand;
use crate::cards::Hole;
use crate::node::ActionFreq;
use crate::node::ComboData;
use crate::ranges::Range;
use std::collections::BTreeMap;

/// one archetype bucket of a decomposed range.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeCategory {
    pub archetype: String,
    pub combo_count: f32,
    pub percent_of_range: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_actions: Option<Vec<ActionFreq>>,
}

/// a range decomposed into archetype categories, strongest first.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBreakdown {
    pub total_combos: f32,
    pub categories: Vec<RangeCategory>,
}

/// both ranges decomposed by archetype. `combo_data`, when present,
/// contributes weighted per-category strategy mixes; without it the
/// categories carry counts only.
pub fn analyze_range_complete(
    hero: Hole,
    villain: &Range,
    board: &Board,
    hero_range: &Range,
    combo_data: Option<&ComboData>,
) -> Result<(RangeBreakdown, RangeBreakdown), EngineError> {
    let board_dead = Hand::from(board);
    let hero_breakdown = decompose(
        &hero_range.without(board_dead),
        board,
        combo_data,
    )?;
    let villain_breakdown = decompose(
        &villain.without(board_dead.union(Hand::from(hero))),
        board,
        combo_data,
    )?;
    Ok((hero_breakdown, villain_breakdown))
}

fn decompose(
    range: &Range,
    board: &Board,
    combo_data: Option<&ComboData>,
) -> Result<RangeBreakdown, EngineError> {
    let total = range.total_combos();
    if total <= 0.0 {
        return Err(EngineError::empty_range("nothing left to decompose"));
    }
    struct Bucket {
        weight: Probability,
        mixes: BTreeMap<String, (Probability, Probability, f32)>, // action -> (freq mass, weight, ev mass)
    }
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();
    for (hole, weight) in range.combos() {
        let name = classify(hole, board).display_name;
        let bucket = buckets.entry(name).or_insert_with(|| Bucket {
            weight: 0.0,
            mixes: BTreeMap::new(),
        });
        bucket.weight += weight;
        if let Some(per_combo) = combo_data.and_then(|data| data.get(&hole.to_string())) {
            for freq in per_combo {
                let slot = bucket.mixes.entry(freq.action.clone()).or_insert((
                    0.0, 0.0, 0.0,
                ));
                slot.0 += freq.frequency * weight;
                slot.1 += weight;
                slot.2 += freq.ev * weight;
            }
        }
    }
    let mut categories: Vec<RangeCategory> = buckets
        .into_iter()
        .map(|(archetype, bucket)| {
            let strategy_actions = if bucket.mixes.is_empty() {
                None
            } else {
                let mut actions: Vec<ActionFreq> = bucket
                    .mixes
                    .into_iter()
                    .map(|(action, (mass, weight, ev))| ActionFreq {
                        action,
                        frequency: mass / weight,
                        ev: ev / weight,
                    })
                    .collect();
                actions.sort_by(|a, b| {
                    b.frequency
                        .partial_cmp(&a.frequency)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                Some(actions)
            };
            RangeCategory {
                archetype,
                combo_count: bucket.weight,
                percent_of_range: bucket.weight / total * 100.0,
                strategy_actions,
            }
        })
        .collect();
    categories.sort_by(|a, b| {
        b.combo_count
            .partial_cmp(&a.combo_count)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(RangeBreakdown {
        total_combos: total,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_the_range() {
        let hero: Hole = "AhKd".parse().unwrap();
        let hero_range: Range = "AhKd:1,QdQc:1,7h6h:0.5".parse().unwrap();
        let villain: Range = "AsKs:1,JdTd:1".parse().unwrap();
        let board: Board = "Kh7c2s".parse().unwrap();
        let (hero_breakdown, villain_breakdown) =
            analyze_range_complete(hero, &villain, &board, &hero_range, None).unwrap();
        let pct: f32 = hero_breakdown
            .categories
            .iter()
            .map(|c| c.percent_of_range)
            .sum();
        assert!((pct - 100.0).abs() < 1e-3);
        assert!((hero_breakdown.total_combos - 2.5).abs() < 1e-6);
        assert!(villain_breakdown.categories.len() >= 2);
        assert!(
            hero_breakdown
                .categories
                .iter()
                .all(|c| c.strategy_actions.is_none())
        );
    }

    #[test]
    fn combo_data_attaches_strategies() {
        let hero: Hole = "AhKd".parse().unwrap();
        let hero_range: Range = "AhKd:1,QdQc:1".parse().unwrap();
        let villain: Range = "AsKs:1".parse().unwrap();
        let board: Board = "Kh7c2s".parse().unwrap();
        let mut data = ComboData::new();
        data.insert(
            "AhKd".to_string(),
            vec![
                ActionFreq {
                    action: "bet 5".to_string(),
                    frequency: 0.7,
                    ev: 2.0,
                },
                ActionFreq {
                    action: "check".to_string(),
                    frequency: 0.3,
                    ev: 1.5,
                },
            ],
        );
        let (hero_breakdown, _) =
            analyze_range_complete(hero, &villain, &board, &hero_range, Some(&data)).unwrap();
        let tpgk = hero_breakdown
            .categories
            .iter()
            .find(|c| c.archetype == "Top Pair Good Kicker")
            .unwrap();
        let actions = tpgk.strategy_actions.as_ref().unwrap();
        assert_eq!(actions[0].action, "bet 5");
        assert!((actions[0].frequency - 0.7).abs() < 1e-6);
    }
}
