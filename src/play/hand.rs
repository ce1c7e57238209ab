use super::position::Position;
use super::pot::GameType;
use crate::Chips;
use crate::cards::Board;
use crate::cards::Hole;
use crate::cards::Street;
use std::collections::BTreeMap;

/// the posted blinds, in table currency.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Blinds {
    pub sb: Chips,
    pub bb: Chips,
}

/// one raw table action as the upstream hand parser hands it over:
/// who acted, and the free-form token of what they did.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawAction {
    pub position: Position,
    pub token: String,
}

/// a parsed played hand, heads-up to the flop. this is the pipeline's
/// input contract; the upstream text parser owns everything before it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HandRecord {
    pub game_type: GameType,
    pub blinds: Blinds,
    pub hero_position: Position,
    pub villain_position: Position,
    pub hero_cards: Hole,
    pub hero_stack: Chips,
    pub villain_stack: Chips,
    pub board: Board,
    /// per-street action lists in table order
    pub streets: BTreeMap<Street, Vec<RawAction>>,
}

impl HandRecord {
    pub fn actions_on(&self, street: Street) -> &[RawAction] {
        self.streets.get(&street).map(Vec::as_slice).unwrap_or(&[])
    }
}
