use super::combo::ComboStrategy;
use super::combo::build_combo_strategy;
use super::strategy::OptimalStrategy;
use crate::BigBlinds;
use crate::SIM_APPROX_THRESHOLD;
use crate::Similarity;
use crate::cards::Board;
use crate::cards::Hole;
use crate::cards::Street;
use crate::equity::BlockerImpact;
use crate::equity::HandFeatures;
use crate::equity::RangeAdvantage;
use crate::equity::RangeBreakdown;
use crate::equity::analyze_hand_features;
use crate::node::NodeAnalysis;
use crate::play::Positions;
use crate::play::Seat;
use crate::play::SizingBounds;
use crate::play::Snapshot;
use crate::ranges::Range;

/// both stacks behind, big blinds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stacks {
    pub oop: BigBlinds,
    pub ip: BigBlinds,
}

/// the assembled solver annotation for one snapshot: matched-node
/// identity plus every derived strategic feature. built once, never
/// mutated, handed to the tag generator and the LLM orchestrator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverBlock {
    pub node_id: String,
    pub street: Street,
    pub board: Board,
    pub pot: BigBlinds,
    pub stacks: Stacks,
    pub positions: Positions,
    pub next_to_act: Seat,
    pub sim: Similarity,
    pub is_approximation: bool,
    /// set only by the turn single-action fallback: the strategy came
    /// from the index payload and the range data was judged unreliable
    pub unreliable: bool,
    pub board_analysis: crate::features::BoardAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_advantage: Option<RangeAdvantage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_range: Option<RangeBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub villain_range: Option<RangeBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocker_impact: Option<BlockerImpact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_features: Option<HandFeatures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo_strategy: Option<ComboStrategy>,
    pub optimal_strategy: OptimalStrategy,
}

/// everything the builder consumes. the block is a pure function of
/// this input.
#[derive(Debug, Clone)]
pub struct BlockInput<'a> {
    pub node: &'a NodeAnalysis,
    pub snapshot: &'a Snapshot,
    pub sim: Similarity,
    /// the match came through parent fallback
    pub approx: bool,
    /// strategy blob the index payload carried, for the turn fallback
    pub meta_strategy: Option<&'a OptimalStrategy>,
    pub hero: Option<Hole>,
}

pub fn build_solver_block(input: &BlockInput, bounds: &SizingBounds) -> SolverBlock {
    let node = input.node;
    let snapshot = input.snapshot;
    // the matched node may sit on a different concrete board of the same
    // archetype: the snapshot's actual board and pot always win
    let board = snapshot.board.clone();
    let actual_pot = snapshot.pot_bb;
    let next_to_act = snapshot.next_to_act;

    let board_analysis = if board.street() >= Street::Flop {
        crate::features::analyze_board_texture(&board)
    } else {
        crate::features::BoardAnalysis::unknown()
    };

    let oop_range = node.range_stats.oop.parse::<Range>();
    let ip_range = node.range_stats.ip.parse::<Range>();
    let mut range_advantage = Some(match (&oop_range, &ip_range) {
        (Ok(oop), Ok(ip)) => {
            crate::equity::calculate_range_equity(oop, ip, &board, next_to_act)
                .unwrap_or_else(|e| {
                    log::debug!("range equity fell back to even: {}", e);
                    RangeAdvantage::even()
                })
        }
        _ => RangeAdvantage::even(),
    });

    let mut optimal_strategy =
        OptimalStrategy::from_actions(node.acting_actions(), node.pot, actual_pot, bounds);

    let villain_range = match next_to_act {
        Seat::Oop => &ip_range,
        Seat::Ip => &oop_range,
    };
    let hero_range_str = match next_to_act {
        Seat::Oop => &oop_range,
        Seat::Ip => &ip_range,
    };

    let (blocker_impact, hand_features, hero_breakdown, villain_breakdown) = match (
        input.hero,
        villain_range,
        hero_range_str,
    ) {
        (Some(hero), Ok(villain), Ok(hero_range)) => {
            let blockers = crate::equity::calculate_blocker_impact(hero, villain, &board).ok();
            let features = analyze_hand_features(hero, &board, villain).ok();
            let breakdowns = crate::equity::analyze_range_complete(
                hero,
                villain,
                &board,
                hero_range,
                node.combo_data.as_ref(),
            )
            .ok();
            let (hero_breakdown, villain_breakdown) = match breakdowns {
                Some((h, v)) => (Some(h), Some(v)),
                None => (None, None),
            };
            (blockers, features, hero_breakdown, villain_breakdown)
        }
        _ => (None, None, None, None),
    };

    let combo_strategy = match (input.hero, &node.combo_data) {
        (Some(hero), Some(data)) => {
            build_combo_strategy(hero, &board, data, node.pot, actual_pot, bounds)
        }
        _ => None,
    };

    // a turn node that decoded with a degenerate mix falls back to the
    // strategy blob the index carried; its ranges are then unreliable
    let mut unreliable = false;
    if node.street == Street::Turn
        && optimal_strategy.action_frequencies.len() < 2
        && input.meta_strategy.is_some()
    {
        optimal_strategy = input.meta_strategy.cloned().expect("checked above");
        range_advantage = None;
        unreliable = true;
    }

    SolverBlock {
        node_id: node.node_id.clone(),
        street: node.street,
        board,
        pot: actual_pot,
        stacks: Stacks {
            oop: node.stack_oop,
            ip: node.stack_ip,
        },
        positions: snapshot.positions,
        next_to_act,
        sim: input.sim,
        is_approximation: input.approx || input.sim < SIM_APPROX_THRESHOLD,
        unreliable,
        board_analysis,
        range_advantage,
        hero_range: hero_breakdown,
        villain_range: villain_breakdown,
        blocker_impact,
        hand_features,
        combo_strategy,
        optimal_strategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::analysis::tests::fixture;

    fn snapshot_for(node: &NodeAnalysis) -> Snapshot {
        use crate::play::Action;
        use crate::play::Decision;
        use crate::play::GameType;
        use crate::play::PotType;
        Snapshot {
            street: node.street,
            board: node.board.clone(),
            pot_bb: node.pot,
            hero_stack_bb: node.stack_oop,
            effective_stack_bb: node.eff_stack,
            positions: node.positions,
            next_to_act: node.next_to_act,
            action_history: vec![],
            street_actions: Default::default(),
            hero_cards: "AhKh".parse().unwrap(),
            decision: Decision {
                hero_action: Action::Check,
            },
            game_type: GameType::Cash,
            pot_type: PotType::Srp,
        }
    }

    fn input<'a>(node: &'a NodeAnalysis, snapshot: &'a Snapshot) -> BlockInput<'a> {
        BlockInput {
            node,
            snapshot,
            sim: 0.95,
            approx: false,
            meta_strategy: None,
            hero: Some(snapshot.hero_cards),
        }
    }

    #[test]
    fn snapshot_board_and_pot_override_node() {
        let node = fixture("n1", Street::Flop, "AsKdQh");
        let mut snapshot = snapshot_for(&node);
        snapshot.board = "AcKcQd".parse().unwrap();
        snapshot.pot_bb = 9.0;
        let block = build_solver_block(&input(&node, &snapshot), &SizingBounds::default());
        assert_eq!(block.board, snapshot.board);
        assert_eq!(block.pot, 9.0);
        assert_eq!(block.node_id, "n1");
        assert!(!block.is_approximation);
        assert!(!block.unreliable);
    }

    #[test]
    fn hero_extras_present_with_hero() {
        let node = fixture("n1", Street::Flop, "KdQh7s");
        let snapshot = snapshot_for(&node);
        let block = build_solver_block(&input(&node, &snapshot), &SizingBounds::default());
        assert!(block.hand_features.is_some());
        assert!(block.blocker_impact.is_some());
        assert!(block.hero_range.is_some());
        assert!(block.villain_range.is_some());
        assert!(block.range_advantage.is_some());
    }

    #[test]
    fn no_hero_no_extras() {
        let node = fixture("n1", Street::Flop, "KdQh7s");
        let snapshot = snapshot_for(&node);
        let mut i = input(&node, &snapshot);
        i.hero = None;
        let block = build_solver_block(&i, &SizingBounds::default());
        assert!(block.hand_features.is_none());
        assert!(block.blocker_impact.is_none());
        assert!(block.combo_strategy.is_none());
    }

    #[test]
    fn low_similarity_marks_approximation() {
        let node = fixture("n1", Street::Flop, "KdQh7s");
        let snapshot = snapshot_for(&node);
        let mut i = input(&node, &snapshot);
        i.sim = 0.85;
        let block = build_solver_block(&i, &SizingBounds::default());
        assert!(block.is_approximation);
        // exactly the threshold is not an approximation
        i.sim = 0.9;
        let block = build_solver_block(&i, &SizingBounds::default());
        assert!(!block.is_approximation);
    }

    #[test]
    fn turn_fallback_swaps_strategy_and_drops_ranges() {
        let mut node = fixture("n1", Street::Turn, "KdQh7s2c");
        node.actions_oop.truncate(1);
        node.actions_oop[0].frequency = 1.0;
        let snapshot = snapshot_for(&node);
        let meta = OptimalStrategy::from_actions(
            &[
                crate::node::ActionFreq {
                    action: "check".to_string(),
                    frequency: 0.5,
                    ev: 0.2,
                },
                crate::node::ActionFreq {
                    action: "bet 4".to_string(),
                    frequency: 0.5,
                    ev: 0.4,
                },
            ],
            node.pot,
            snapshot.pot_bb,
            &SizingBounds::default(),
        );
        let mut i = input(&node, &snapshot);
        i.meta_strategy = Some(&meta);
        let block = build_solver_block(&i, &SizingBounds::default());
        assert!(block.unreliable);
        assert!(block.range_advantage.is_none());
        assert_eq!(block.optimal_strategy.action_frequencies.len(), 2);
    }

    #[test]
    fn bad_range_strings_default_even() {
        let mut node = fixture("n1", Street::Flop, "KdQh7s");
        node.range_stats.oop = "garbage".to_string();
        let snapshot = snapshot_for(&node);
        let block = build_solver_block(&input(&node, &snapshot), &SizingBounds::default());
        assert_eq!(block.range_advantage, Some(RangeAdvantage::even()));
        assert!(block.hand_features.is_none());
    }
}
