use super::action::Action;
use super::position::Positions;
use super::position::Seat;
use super::pot::GameType;
use super::pot::PotType;
use crate::BigBlinds;
use crate::cards::Board;
use crate::cards::Hole;
use crate::cards::Street;
use std::collections::BTreeMap;

/// the hero's chosen action, exactly as played.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub hero_action: Action,
}

/// one hero decision point, canonicalized. constructed by the replayer
/// and read-only thereafter.
///
/// `action_history` is the current street's prefix up to (but excluding)
/// the hero's decision; earlier streets are already reflected in the pot
/// and appear only in `street_actions`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub street: Street,
    pub board: Board,
    pub pot_bb: BigBlinds,
    pub hero_stack_bb: BigBlinds,
    pub effective_stack_bb: BigBlinds,
    pub positions: Positions,
    pub next_to_act: Seat,
    pub action_history: Vec<Action>,
    pub street_actions: BTreeMap<Street, Vec<Action>>,
    pub hero_cards: Hole,
    pub decision: Decision,
    pub game_type: GameType,
    pub pot_type: PotType,
}

impl Snapshot {
    /// the bet the hero is facing, if any
    pub fn facing_bet_bb(&self) -> Option<BigBlinds> {
        self.action_history
            .iter()
            .rev()
            .find(|a| a.is_aggressive())
            .and_then(|a| match a {
                Action::Bet { amount, amount_bb } | Action::Raise { amount, amount_bb } => {
                    Some(amount_bb.unwrap_or(*amount))
                }
                _ => None,
            })
    }
    /// pot odds offered to the hero when facing a bet, in [0, 1)
    pub fn pot_odds(&self) -> Option<f32> {
        self.facing_bet_bb()
            .map(|bet| bet / (self.pot_bb + bet))
            .filter(|odds| odds.is_finite())
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} pot {:.1}bb {} to act",
            self.street, self.board, self.pot_bb, self.next_to_act,
        )
    }
}
