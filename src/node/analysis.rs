use crate::Chips;
use crate::Probability;
use crate::cards::Board;
use crate::cards::Street;
use crate::play::GameType;
use crate::play::Positions;
use crate::play::PotType;
use crate::play::Seat;
use crate::solver::OptimalStrategy;
use std::collections::BTreeMap;

/// one solved action at a node: the solver's action string, how often
/// the strategy takes it, and its expected value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionFreq {
    pub action: String,
    pub frequency: Probability,
    pub ev: f32,
}

/// solver range strings for both seats, `combo:weight,…` form.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeStats {
    pub oop: String,
    pub ip: String,
}

/// per-combo strategy frequencies, keyed by the 4-char combo text.
pub type ComboData = BTreeMap<String, Vec<ActionFreq>>;

/// a fully decoded GTO decision node as it lives in the shard corpus.
/// wire names are the corpus's mixed convention: camelCase fields with
/// snake_case identifiers for the node ids.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAnalysis {
    #[serde(rename = "node_id")]
    pub node_id: String,
    #[serde(rename = "node_identifier", default, skip_serializing_if = "Option::is_none")]
    pub node_identifier: Option<String>,
    pub street: Street,
    pub board: Board,
    pub game_type: GameType,
    pub pot_type: PotType,
    pub positions: Positions,
    pub eff_stack: Chips,
    pub pot: Chips,
    #[serde(rename = "stackOOP")]
    pub stack_oop: Chips,
    #[serde(rename = "stackIP")]
    pub stack_ip: Chips,
    pub next_to_act: Seat,
    #[serde(default)]
    pub action_history: Vec<String>,
    pub range_stats: RangeStats,
    #[serde(rename = "actionsOOP", default)]
    pub actions_oop: Vec<ActionFreq>,
    #[serde(rename = "actionsIP", default)]
    pub actions_ip: Vec<ActionFreq>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo_data: Option<ComboData>,
    #[serde(rename = "s3Bucket", default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,
    #[serde(rename = "s3Key", default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_strategy: Option<OptimalStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_terminal: Option<bool>,
}

impl NodeAnalysis {
    /// the action list of the seat to act
    pub fn acting_actions(&self) -> &[ActionFreq] {
        match self.next_to_act {
            Seat::Oop => &self.actions_oop,
            Seat::Ip => &self.actions_ip,
        }
    }
    /// frequencies of an acting side must sum to one
    pub fn frequencies_closed(&self) -> bool {
        [&self.actions_oop, &self.actions_ip]
            .into_iter()
            .filter(|actions| !actions.is_empty())
            .all(|actions| {
                let sum: Probability = actions.iter().map(|a| a.frequency).sum();
                (sum - 1.0).abs() < 1e-3
            })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn fixture(node_id: &str, street: Street, board: &str) -> NodeAnalysis {
        use crate::play::Position;
        NodeAnalysis {
            node_id: node_id.to_string(),
            node_identifier: Some(format!("{}#id", node_id)),
            street,
            board: board.parse().unwrap(),
            game_type: GameType::Cash,
            pot_type: PotType::Srp,
            positions: Positions {
                oop: Position::BB,
                ip: Position::BTN,
            },
            eff_stack: 97.5,
            pot: 5.5,
            stack_oop: 97.5,
            stack_ip: 97.5,
            next_to_act: Seat::Oop,
            action_history: vec![],
            range_stats: RangeStats {
                oop: "AhKh:1,QdQc:1".to_string(),
                ip: "AsKs:1,7h6h:0.5".to_string(),
            },
            actions_oop: vec![
                ActionFreq {
                    action: "check".to_string(),
                    frequency: 0.6,
                    ev: 1.1,
                },
                ActionFreq {
                    action: "bet 1.8".to_string(),
                    frequency: 0.4,
                    ev: 1.3,
                },
            ],
            actions_ip: vec![],
            combo_data: None,
            s3_bucket: None,
            s3_key: None,
            optimal_strategy: None,
            is_terminal: None,
        }
    }

    #[test]
    fn wire_round_trip() {
        let node = fixture("n1", Street::Flop, "AhKdQc");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"node_id\""));
        assert!(json.contains("\"actionsOOP\""));
        assert!(json.contains("\"rangeStats\""));
        let back: NodeAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn frequency_closure() {
        let mut node = fixture("n1", Street::Flop, "AhKdQc");
        assert!(node.frequencies_closed());
        node.actions_oop[0].frequency = 0.9;
        assert!(!node.frequencies_closed());
    }
}
