use crate::cards::Board;
use crate::cards::Rank;
use crate::cards::Suit;

/// the 8-bit board-texture field of the feature vector.
/// bit assignments are shared with the indexing side and frozen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Texture(u8);

impl Texture {
    pub const PAIRED: u8 = 1 << 0;
    pub const TRIPS: u8 = 1 << 1;
    pub const MONOTONE: u8 = 1 << 2;
    pub const TWO_TONE: u8 = 1 << 3;
    pub const CONNECTED: u8 = 1 << 4;
    pub const ONE_GAPPER: u8 = 1 << 5;
    pub const BROADWAY_HEAVY: u8 = 1 << 6;
    pub const LOW_HEAVY: u8 = 1 << 7;

    pub fn bits(&self) -> u8 {
        self.0
    }
    pub fn has(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

impl From<&Board> for Texture {
    fn from(board: &Board) -> Self {
        let cards = board.cards();
        let mut rank_counts = [0u8; 13];
        let mut suit_counts = [0u8; 4];
        for card in cards {
            rank_counts[card.rank() as usize] += 1;
            suit_counts[card.suit() as usize] += 1;
        }
        let max_rank = rank_counts.iter().copied().max().unwrap_or(0);
        let max_suit = suit_counts.iter().copied().max().unwrap_or(0);
        // ace plays low for connectivity: mirror it below the deuce
        let lows = rank_counts[Rank::Ace as usize] > 0;
        let adjacent = (0..12).any(|r| rank_counts[r] > 0 && rank_counts[r + 1] > 0)
            || (lows && rank_counts[Rank::Two as usize] > 0);
        let gapped = (0..11).any(|r| rank_counts[r] > 0 && rank_counts[r + 2] > 0)
            || (lows && rank_counts[Rank::Three as usize] > 0);
        let broadway = cards.iter().filter(|c| c.rank() >= Rank::Ten).count();
        let low = cards.iter().filter(|c| c.rank() <= Rank::Five).count();
        let mut bits = 0u8;
        if max_rank >= 2 {
            bits |= Self::PAIRED;
        }
        if max_rank >= 3 {
            bits |= Self::TRIPS;
        }
        if !cards.is_empty() && max_suit as usize == cards.len() {
            bits |= Self::MONOTONE;
        } else if max_suit == 2 {
            bits |= Self::TWO_TONE;
        }
        if adjacent {
            bits |= Self::CONNECTED;
        }
        if gapped {
            bits |= Self::ONE_GAPPER;
        }
        if broadway >= 2 {
            bits |= Self::BROADWAY_HEAVY;
        }
        if low >= 2 {
            bits |= Self::LOW_HEAVY;
        }
        Self(bits)
    }
}

/// board texture as the solver block carries it downstream.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardAnalysis {
    pub texture: String,
    pub is_paired: bool,
    pub texture_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flush_possible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flush_suit: Option<Suit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub straight_possible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadway_potential: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheel_potential: Option<bool>,
}

impl BoardAnalysis {
    /// the documented fallback when texture analysis fails
    pub fn unknown() -> Self {
        Self {
            texture: "Unknown".to_string(),
            is_paired: false,
            texture_tags: Vec::new(),
            flush_possible: None,
            flush_suit: None,
            straight_possible: None,
            broadway_potential: None,
            wheel_potential: None,
        }
    }
}

/// classify a board's texture for strategic commentary.
/// wetness weighs flush and straight coordination; the tag list
/// mirrors the texture bitfield plus `rainbow` for unsuited flops.
pub fn analyze_board_texture(board: &Board) -> BoardAnalysis {
    let texture = Texture::from(board);
    let cards = board.cards();
    let mut suit_counts = [0u8; 4];
    for card in cards {
        suit_counts[card.suit() as usize] += 1;
    }
    let max_suit = suit_counts.iter().copied().max().unwrap_or(0);
    let rainbow = max_suit <= 1;
    let flush_suit = suit_counts
        .iter()
        .position(|&n| n >= 3)
        .map(|i| Suit::from(i as u8));
    let flush_possible = flush_suit.is_some();
    let straight_possible = straight_window(board);
    let broadway_ranks = distinct_ranks(board, |r| r >= Rank::Ten);
    let wheel_ranks = distinct_ranks(board, |r| r <= Rank::Five || r == Rank::Ace);

    let mut tags = Vec::new();
    if texture.has(Texture::PAIRED) {
        tags.push("paired");
    }
    if texture.has(Texture::TRIPS) {
        tags.push("trips");
    }
    if texture.has(Texture::MONOTONE) {
        tags.push("monotone");
    }
    if texture.has(Texture::TWO_TONE) {
        tags.push("two-tone");
    }
    if rainbow {
        tags.push("rainbow");
    }
    if texture.has(Texture::CONNECTED) {
        tags.push("connected");
    }
    if texture.has(Texture::ONE_GAPPER) {
        tags.push("one-gapper");
    }
    if texture.has(Texture::BROADWAY_HEAVY) {
        tags.push("broadway-heavy");
    }
    if texture.has(Texture::LOW_HEAVY) {
        tags.push("low-heavy");
    }

    let suited = texture.has(Texture::MONOTONE) || texture.has(Texture::TWO_TONE);
    let coordinated = texture.has(Texture::CONNECTED) || texture.has(Texture::ONE_GAPPER);
    let wetness = suited as usize + coordinated as usize + straight_possible as usize;
    let name = match wetness {
        0 => "dry",
        1 => "semi-wet",
        _ => "wet",
    };

    BoardAnalysis {
        texture: name.to_string(),
        is_paired: texture.has(Texture::PAIRED),
        texture_tags: tags.into_iter().map(str::to_string).collect(),
        flush_possible: Some(flush_possible),
        flush_suit,
        straight_possible: Some(straight_possible),
        broadway_potential: Some(broadway_ranks >= 2),
        wheel_potential: Some(wheel_ranks >= 2),
    }
}

fn distinct_ranks(board: &Board, keep: impl Fn(Rank) -> bool) -> usize {
    let mut seen = [false; 13];
    for card in board.cards() {
        if keep(card.rank()) {
            seen[card.rank() as usize] = true;
        }
    }
    seen.iter().filter(|&&b| b).count()
}

/// three distinct board ranks inside one five-rank window
/// leave a straight completable by two more cards
fn straight_window(board: &Board) -> bool {
    let mut values: Vec<i8> = board
        .cards()
        .iter()
        .map(|c| c.rank() as i8)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    if board.cards().iter().any(|c| c.rank() == Rank::Ace) {
        values.insert(0, -1); // wheel ace
    }
    values
        .windows(3)
        .any(|w| w[2] - w[0] <= 4)
}
