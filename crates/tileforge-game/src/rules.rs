//! Pluggable rule tables.
//!
//! The engine never does tile arithmetic itself. Deck size, deal size, the
//! starting tile, penalties and which hands are legal all come from a
//! [`TileRules`] implementation. [`ClassicRules`] is the default table.

use serde::{Deserialize, Serialize};
use tileforge_protocol::{Tile, TileColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandKind {
    Single,
    Pair,
    Triple,
    /// Three or more consecutive numbers, any colors.
    Straight,
}

/// A validated combination of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub kind: HandKind,
    /// Sorted ascending.
    pub tiles: Vec<Tile>,
}

impl Hand {
    /// The tile that decides comparisons between hands of the same shape.
    pub fn high(&self) -> Option<Tile> {
        self.tiles.last().copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// The rule table a game room plays by.
pub trait TileRules: Send + Sync + 'static {
    /// Highest tile number in play for `player_count` players.
    fn top_number(&self, player_count: usize) -> u8;

    /// Tiles dealt to each player.
    fn tiles_per_player(&self, player_count: usize) -> usize;

    /// The full deck, one tile per (number, color) pair up to `top`.
    fn generate_all_tiles(&self, top: u8) -> Vec<Tile>;

    /// Whether holding `tile` makes a player open the round.
    fn is_starting_tile(&self, tile: &Tile) -> bool;

    /// Penalty for the tiles left in a hand when the round ends.
    fn penalty(&self, tiles: &[Tile]) -> i64;

    /// Classifies `tiles`, or `None` if they do not form a legal hand.
    fn resolve_hand(&self, tiles: &[Tile], top: u8) -> Option<Hand>;

    /// Whether `candidate` may be played on top of `current`.
    fn beats(&self, candidate: &Hand, current: &Hand) -> bool;
}

/// The default rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicRules;

impl ClassicRules {
    pub const STARTING_TILE: Tile = Tile::new(1, TileColor::Red);
}

impl TileRules for ClassicRules {
    fn top_number(&self, player_count: usize) -> u8 {
        u8::try_from(2 * player_count + 5).unwrap_or(u8::MAX)
    }

    fn tiles_per_player(&self, player_count: usize) -> usize {
        if player_count == 0 {
            return 0;
        }
        let deck = TileColor::ALL.len() * usize::from(self.top_number(player_count));
        deck / player_count
    }

    fn generate_all_tiles(&self, top: u8) -> Vec<Tile> {
        (1..=top)
            .flat_map(|number| TileColor::ALL.map(|color| Tile::new(number, color)))
            .collect()
    }

    fn is_starting_tile(&self, tile: &Tile) -> bool {
        *tile == Self::STARTING_TILE
    }

    fn penalty(&self, tiles: &[Tile]) -> i64 {
        tiles.len() as i64
    }

    fn resolve_hand(&self, tiles: &[Tile], top: u8) -> Option<Hand> {
        if tiles.iter().any(|tile| tile.number == 0 || tile.number > top) {
            return None;
        }
        let mut sorted = tiles.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != tiles.len() {
            return None;
        }

        let same_number = sorted.windows(2).all(|w| w[0].number == w[1].number);
        let consecutive = sorted
            .windows(2)
            .all(|w| w[0].number.checked_add(1) == Some(w[1].number));
        let kind = match sorted.len() {
            0 => return None,
            1 => HandKind::Single,
            2 if same_number => HandKind::Pair,
            3 if same_number => HandKind::Triple,
            n if n >= 3 && consecutive => HandKind::Straight,
            _ => return None,
        };

        Some(Hand {
            kind,
            tiles: sorted,
        })
    }

    fn beats(&self, candidate: &Hand, current: &Hand) -> bool {
        candidate.kind == current.kind
            && candidate.len() == current.len()
            && candidate.high() > current.high()
    }
}
