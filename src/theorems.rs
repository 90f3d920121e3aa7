//! Hard-coded 3x3 shape theorems used as search shortcuts.
//!
//! Each theorem recognizes a known-safe or known-dead stone configuration by
//! exact bitmask comparison against one color's stones and the remaining
//! empty points, and carries a fixed value. They are sound only on 3x3
//! boards and must not be consulted for other sizes.

use crate::board::{Board, Color};

/// Full 3x3 board mask.
const FULL_3X3: u64 = 511;

/// A static shape matcher with a fixed heuristic value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Theorem {
    /// A corner-enclosing triangle with its corner liberty and one outside
    /// liberty: alive, worth the whole board.
    Corner,
    /// A full middle row or column with liberties on both sides: alive,
    /// worth the whole board.
    Middle,
    /// Stones confined to one side pattern with the rest of the board
    /// empty: a losing shape.
    SideOnly,
}

/// The theorems consulted at every 3x3 search node.
pub const THEOREMS_3X3: [Theorem; 3] = [Theorem::Middle, Theorem::Corner, Theorem::SideOnly];

impl Theorem {
    /// Fixed value of the shape for the matched color.
    pub fn value(self) -> f32 {
        match self {
            Theorem::Corner => 9.0,
            Theorem::Middle => 9.0,
            Theorem::SideOnly => -9.0,
        }
    }

    /// Whether the shape (and its required liberty pattern) matches the
    /// stones of `color` on `board` exactly.
    pub fn applies(self, board: &Board, color: Color) -> bool {
        let stones = board.stones(color);
        let empty = board.empty_points();
        match self {
            Theorem::Corner => {
                // xx.
                // .x.      (and the three rotations)
                let positions: [u64; 4] = [26, 50, 152, 176];
                let liberties: [u64; 4] = [1, 4, 64, 256];
                for (&position, &liberty) in positions.iter().zip(&liberties) {
                    if stones & position == position && empty & liberty == liberty {
                        // The enclosed corner is an eye; one more outside
                        // liberty makes the group safe.
                        let other = !(liberty | position);
                        if other & empty != 0 {
                            return true;
                        }
                    }
                }
                false
            }
            Theorem::Middle => {
                // Middle column (bits 1, 4, 7) with a liberty on each side.
                if stones & 146 == 146 && (146 << 1) & empty != 0 && (146 >> 1) & empty != 0 {
                    return true;
                }
                // Middle row (bits 3, 4, 5) with a liberty above and below.
                stones & 56 == 56 && (56 << 3) & empty != 0 && (56 >> 3) & empty != 0
            }
            Theorem::SideOnly => {
                let sides: [u64; 4] = [5, 73, 292, 448];
                sides
                    .iter()
                    .any(|&side| stones == side && side | empty == FULL_3X3)
            }
        }
    }
}
