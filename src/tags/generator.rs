use super::tag::Tag;
use super::tag::TagCategory;
use super::tag::TagPriority;
use crate::BigBlinds;
use crate::cards::Street;
use crate::equity::MadeTier;
use crate::equity::PairSubtype;
use crate::play::ActionKind;
use crate::play::SizeCategory;
use crate::solver::SolverBlock;
use std::collections::HashMap;
use std::collections::HashSet;

/// snapshot-side context the rules need beyond the block itself.
#[derive(Debug, Clone, Copy)]
pub struct TagContext {
    pub street: Street,
    pub pot_bb: BigBlinds,
    pub effective_stack_bb: BigBlinds,
    /// offered odds when the hero faces a bet
    pub pot_odds: Option<f32>,
}

/// node-strategy mixes count above 20% frequency,
/// per-combo mixes above 10%
const MIX_NODE_THRESHOLD: f32 = 0.2;
const MIX_COMBO_THRESHOLD: f32 = 0.1;

/// a villain range at or above this much value is "value-heavy"
const VALUE_HEAVY_PCT: f32 = 40.0;

/// stateless rule emitter: SolverBlock + context in, prioritized and
/// deduplicated tags out. insertion order is meaningful and preserved.
pub fn generate_tags(
    block: &SolverBlock,
    ctx: &TagContext,
    priority: TagPriority,
    max_per_category: usize,
) -> Vec<Tag> {
    let mut tags = Vec::new();
    action_tags(block, &mut tags);
    hand_tags(block, &mut tags);
    range_tags(block, &mut tags);
    goal_tags(block, &mut tags);
    mixed_tags(block, &mut tags);
    position_tags(block, &mut tags);
    board_tags(block, &mut tags);
    blocker_tags(block, &mut tags);
    sizing_tags(block, &mut tags);
    stack_tags(ctx, &mut tags);
    odds_tags(ctx, &mut tags);
    meta_tags(block, &mut tags);
    prioritize(tags, priority, max_per_category)
}

/// dedupe preserving first occurrence, then apply the priority mode
fn prioritize(tags: Vec<Tag>, priority: TagPriority, cap: usize) -> Vec<Tag> {
    let mut seen = HashSet::new();
    let mut counts: HashMap<TagCategory, usize> = HashMap::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.text.clone()))
        .filter(|tag| match priority {
            TagPriority::Concise => tag.category.is_core(),
            _ => true,
        })
        .filter(|tag| match priority {
            TagPriority::Verbose => true,
            _ => {
                let count = counts.entry(tag.category).or_insert(0);
                *count += 1;
                *count <= cap
            }
        })
        .collect()
}

fn slug(text: &str) -> String {
    text.to_ascii_uppercase().replace(' ', "-")
}

fn action_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    let ref recommended = block.optimal_strategy.recommended_action;
    let text = match (recommended.action_type, recommended.sizing) {
        (ActionKind::Bet | ActionKind::Raise, Some(sizing)) => format!(
            "ACTION:{}-{}",
            slug(recommended.action_type.as_str()),
            slug(sizing.category.as_str())
        ),
        _ => format!("ACTION:{}", slug(recommended.action_type.as_str())),
    };
    tags.push(Tag::new(TagCategory::Action, text));
}

fn hand_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    let Some(ref features) = block.hand_features else {
        return;
    };
    let name = match features.pair_subtype {
        Some(subtype) => subtype.name(),
        None => features.made_tier.name(),
    };
    tags.push(Tag::new(
        TagCategory::HandType,
        format!("HAND:TYPE:{}", slug(name)),
    ));
    for draw in &features.draw_flags {
        tags.push(Tag::new(
            TagCategory::HandType,
            format!("HAND:DRAW:{}", slug(draw.name())),
        ));
    }
    let equity = features.equity_vs_range;
    let strength = if equity >= 65.0 {
        "STRONG"
    } else if equity >= 45.0 {
        "MARGINAL"
    } else {
        "WEAK"
    };
    tags.push(Tag::new(
        TagCategory::HandType,
        format!("HAND:EQUITY:{}", strength),
    ));
}

fn range_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    // absent range data (turn fallback) emits no range tags at all
    let Some(ref advantage) = block.range_advantage else {
        return;
    };
    let text = match advantage.equity_delta {
        d if d >= 10.0 => "RANGE:ADVANTAGE:HERO-STRONG",
        d if d >= 3.0 => "RANGE:ADVANTAGE:HERO",
        d if d <= -10.0 => "RANGE:ADVANTAGE:VILLAIN-STRONG",
        d if d <= -3.0 => "RANGE:ADVANTAGE:VILLAIN",
        _ => "RANGE:ADVANTAGE:NEUTRAL",
    };
    tags.push(Tag::new(TagCategory::RangeAdvantage, text));
    if advantage.value_delta >= 10.0 {
        tags.push(Tag::new(TagCategory::RangeAdvantage, "RANGE:VALUE-EDGE:HERO"));
    } else if advantage.value_delta <= -10.0 {
        tags.push(Tag::new(
            TagCategory::RangeAdvantage,
            "RANGE:VALUE-EDGE:VILLAIN",
        ));
    }
}

fn is_value_hand(block: &SolverBlock) -> bool {
    block.hand_features.as_ref().is_some_and(|f| {
        f.made_tier >= MadeTier::TwoPair
            || matches!(
                f.pair_subtype,
                Some(PairSubtype::OverPair)
                    | Some(PairSubtype::TopPair)
                    | Some(PairSubtype::TopPairGoodKicker)
            )
    })
}

fn is_weak_hand(block: &SolverBlock) -> bool {
    block
        .hand_features
        .as_ref()
        .is_some_and(|f| f.made_tier <= MadeTier::Pair && !is_value_hand(block))
}

fn has_draw(block: &SolverBlock) -> bool {
    block
        .hand_features
        .as_ref()
        .is_some_and(|f| !f.draw_flags.is_empty())
}

fn goal_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    let ref recommended = block.optimal_strategy.recommended_action;
    let goal = match recommended.action_type {
        ActionKind::Bet | ActionKind::Raise | ActionKind::AllIn => {
            if is_value_hand(block) {
                Some("STRAT:GOAL:VALUE")
            } else if has_draw(block) {
                Some("STRAT:GOAL:SEMI-BLUFF")
            } else if block.hand_features.is_some() {
                Some("STRAT:GOAL:BLUFF")
            } else {
                Some("STRAT:GOAL:PRESSURE")
            }
        }
        ActionKind::Check => {
            if is_value_hand(block) {
                Some("STRAT:GOAL:TRAP")
            } else {
                Some("STRAT:GOAL:POT-CONTROL")
            }
        }
        ActionKind::Call => Some("STRAT:GOAL:BLUFF-CATCH"),
        ActionKind::Fold => Some("STRAT:GOAL:GIVE-UP"),
        _ => None,
    };
    if let Some(goal) = goal {
        tags.push(Tag::new(TagCategory::StratGoal, goal));
    }
    turned_bluff_tag(block, tags);
}

/// a marginal or weak hand pushed in with a large-or-bigger sizing,
/// while the ranges argue against it, is a turned bluff
fn turned_bluff_tag(block: &SolverBlock, tags: &mut Vec<Tag>) {
    let ref recommended = block.optimal_strategy.recommended_action;
    if !recommended.action_type.is_aggressive() {
        return;
    }
    let Some(sizing) = recommended.sizing else {
        return;
    };
    if sizing.category < SizeCategory::Large {
        return;
    }
    if !is_weak_hand(block) {
        return;
    }
    let range_disadvantage = block
        .range_advantage
        .as_ref()
        .is_some_and(|a| a.equity_delta <= -5.0);
    let villain_value_heavy = block
        .range_advantage
        .as_ref()
        .is_some_and(|a| a.villain_value_pct >= VALUE_HEAVY_PCT);
    let mixes_fold = block.combo_strategy.as_ref().is_some_and(|s| {
        s.top_actions
            .iter()
            .any(|a| a.action_type == ActionKind::Fold && a.frequency > MIX_COMBO_THRESHOLD)
    });
    if range_disadvantage || villain_value_heavy || mixes_fold {
        tags.push(Tag::new(
            TagCategory::StratGoal,
            "STRAT:GOAL:TURN-HAND-INTO-BLUFF",
        ));
    }
}

fn mixed_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    if block.optimal_strategy.is_mixed(MIX_NODE_THRESHOLD) {
        tags.push(Tag::new(TagCategory::StratMixed, "STRAT:MIXED:NODE"));
    }
    if let Some(ref combo) = block.combo_strategy {
        let mixed = combo
            .top_actions
            .iter()
            .filter(|a| a.frequency > MIX_COMBO_THRESHOLD)
            .count()
            >= 2;
        if mixed {
            tags.push(Tag::new(TagCategory::StratMixed, "STRAT:MIXED:COMBO"));
        }
    }
}

fn position_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    tags.push(Tag::new(
        TagCategory::Position,
        format!("POSITION:{}", slug(block.next_to_act.as_str())),
    ));
}

fn board_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    tags.push(Tag::new(
        TagCategory::Board,
        format!("BOARD:{}", slug(&block.board_analysis.texture)),
    ));
    for texture_tag in &block.board_analysis.texture_tags {
        tags.push(Tag::new(
            TagCategory::Board,
            format!("BOARD:{}", slug(texture_tag)),
        ));
    }
}

fn blocker_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    let Some(ref impact) = block.blocker_impact else {
        return;
    };
    if impact.combos_blocked_pct >= 15.0 {
        tags.push(Tag::new(TagCategory::Blocker, "BLOCKER:HEAVY"));
    }
    if impact.value_blocked_pct >= 25.0 {
        tags.push(Tag::new(TagCategory::Blocker, "BLOCKER:VALUE"));
    }
    if impact.bluffs_unblocked_pct >= 75.0 {
        tags.push(Tag::new(TagCategory::Blocker, "BLOCKER:BLUFFS-LIVE"));
    }
    if let Some(top) = impact.top_blocked.first() {
        tags.push(Tag::new(
            TagCategory::Blocker,
            format!("BLOCKER:TOP:{}", slug(&top.archetype)),
        ));
    }
}

fn sizing_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    if let Some(sizing) = block.optimal_strategy.recommended_action.sizing {
        tags.push(Tag::new(
            TagCategory::Sizing,
            format!("SIZING:{}", slug(sizing.category.as_str())),
        ));
    }
}

fn stack_tags(ctx: &TagContext, tags: &mut Vec<Tag>) {
    if ctx.pot_bb <= 0.0 {
        return;
    }
    let spr = ctx.effective_stack_bb / ctx.pot_bb;
    let depth = match spr {
        s if s < 1.0 => "SPR:COMMITTED",
        s if s < 3.0 => "SPR:LOW",
        s if s < 6.0 => "SPR:MEDIUM",
        _ => "SPR:DEEP",
    };
    tags.push(Tag::new(TagCategory::StackDepth, depth));
}

fn odds_tags(ctx: &TagContext, tags: &mut Vec<Tag>) {
    if let Some(odds) = ctx.pot_odds {
        tags.push(Tag::new(
            TagCategory::PotOdds,
            format!("POT-ODDS:{:.0}PCT", odds * 100.0),
        ));
    }
}

fn meta_tags(block: &SolverBlock, tags: &mut Vec<Tag>) {
    if block.is_approximation {
        tags.push(Tag::new(TagCategory::Meta, "META:APPROXIMATE"));
    }
    if block.unreliable {
        tags.push(Tag::new(TagCategory::Meta, "META:STRATEGY-FALLBACK"));
    }
}
