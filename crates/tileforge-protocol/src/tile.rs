//! Tile values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of tile colors.
///
/// The declaration order doubles as the tie-break order when two tiles carry
/// the same number (`Red < Blue < Green < Yellow`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl TileColor {
    /// Every color, in tie-break order.
    pub const ALL: [TileColor; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];
}

/// A single tile: a number and a color.
///
/// Tiles have no identity beyond their value, so they are `Copy` and compare
/// by value. The derived ordering compares `number` first, then `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub number: u8,
    pub color: TileColor,
}

impl Tile {
    pub const fn new(number: u8, color: TileColor) -> Self {
        Self { number, color }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{}", self.color, self.number)
    }
}
