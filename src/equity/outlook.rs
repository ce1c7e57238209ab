use super::archetype::DrawFlag;
use super::archetype::HandArchetype;
use super::archetype::MadeTier;
use super::archetype::PairSubtype;
use super::archetype::classify;
use super::engine::EngineError;
use super::engine::pair_equity;
use crate::Equity;
use crate::Probability;
use crate::cards::Board;
use crate::cards::Card;
use crate::cards::Hand;
use crate::cards::HandIterator;
use crate::cards::Hole;
use crate::cards::Street;
use crate::ranges::Range;
use rayon::prelude::*;

/// how the next community card changes the hero's equity:
/// distribution summary plus the best and worst arrivals.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStreetAnalysis {
    pub best_card: Card,
    pub worst_card: Card,
    pub mean: Equity,
    pub std_dev: Equity,
    pub gains: usize,
    pub neutral: usize,
    pub losses: usize,
}

/// the hero hand's standing against the villain range.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandFeatures {
    pub made_tier: MadeTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_subtype: Option<PairSubtype>,
    pub draw_flags: Vec<DrawFlag>,
    pub equity_vs_range: Equity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_street_analysis: Option<NextStreetAnalysis>,
}

/// a gain or loss of under two equity points counts as neutral
const NEUTRAL_BAND: Equity = 2.0;

/// classify the hero hand and measure it against the villain range;
/// before the river, also enumerate every possible next card.
pub fn analyze_hand_features(
    hero: Hole,
    board: &Board,
    villain: &Range,
) -> Result<HandFeatures, EngineError> {
    let archetype: HandArchetype = classify(hero, board);
    let equity_vs_range = hand_vs_range(hero, villain, board)?;
    let next_street_analysis = match board.street() {
        Street::Rive => None,
        _ => Some(next_street(hero, villain, board, equity_vs_range)?),
    };
    Ok(HandFeatures {
        made_tier: archetype.made_tier,
        pair_subtype: archetype.pair_subtype,
        draw_flags: archetype.draw_flags,
        equity_vs_range,
        next_street_analysis,
    })
}

/// weighted equity of one hand against every live villain combo
pub fn hand_vs_range(hero: Hole, villain: &Range, board: &Board) -> Result<Equity, EngineError> {
    let dead = Hand::from(board).union(Hand::from(hero));
    let live = villain.without(dead);
    if live.is_empty() {
        return Err(EngineError::empty_range(
            "villain range empty against hero hand",
        ));
    }
    let combos: Vec<(Hole, Probability)> = live.combos().collect();
    let (weighted, weight) = combos
        .par_iter()
        .map(|(combo, w)| (pair_equity(hero, *combo, board) * w, *w))
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));
    if weight <= 0.0 {
        return Err(EngineError::numeric("zero villain weight"));
    }
    Ok(weighted / weight * 100.0)
}

fn next_street(
    hero: Hole,
    villain: &Range,
    board: &Board,
    current: Equity,
) -> Result<NextStreetAnalysis, EngineError> {
    let dead = Hand::from(board).union(Hand::from(hero));
    let candidates: Vec<Card> = HandIterator::deals(1, dead)
        .map(|deal| Card::from(u64::from(deal)))
        .collect();
    let equities: Vec<(Card, Equity)> = candidates
        .par_iter()
        .map(|card| {
            let mut next = board.clone();
            next.accept(*card);
            let equity = hand_vs_range(hero, villain, &next).unwrap_or(current);
            (*card, equity)
        })
        .collect();
    let n = equities.len() as f32;
    let mean = equities.iter().map(|(_, e)| e).sum::<f32>() / n;
    let variance = equities.iter().map(|(_, e)| (e - mean).powi(2)).sum::<f32>() / n;
    let best = equities
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| EngineError::numeric("no next cards"))?;
    let worst = equities
        .iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| EngineError::numeric("no next cards"))?;
    let gains = equities
        .iter()
        .filter(|(_, e)| *e > current + NEUTRAL_BAND)
        .count();
    let losses = equities
        .iter()
        .filter(|(_, e)| *e < current - NEUTRAL_BAND)
        .count();
    Ok(NextStreetAnalysis {
        best_card: best.0,
        worst_card: worst.0,
        mean,
        std_dev: variance.sqrt(),
        gains,
        neutral: equities.len() - gains - losses,
        losses,
    })
}
