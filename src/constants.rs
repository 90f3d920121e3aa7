//! Constants for board limits, move sentinels, and search parameters.
//!
//! The board side length is chosen at runtime, but is capped so that one
//! `u64` word holds the whole occupancy bit-set of a single color.

// =============================================================================
// Board Geometry
// =============================================================================

/// Largest supported board side length. `MAX_N * MAX_N` cells must fit in
/// one 64-bit occupancy word.
pub const MAX_N: usize = 8;

/// Upper bound on cells of any supported board.
pub const MAX_CELLS: usize = MAX_N * MAX_N;

/// Number of symmetries of a square board (4 rotations x optional reflection).
pub const NUM_SYMMETRIES: usize = 8;

/// Upper bound on game length, sizing the path-hash key table (3 times the
/// board area, leaving room for captures and replays). Plies beyond it are
/// rejected outright rather than reusing keys.
pub const MAX_PLIES: usize = MAX_CELLS * 3;

// =============================================================================
// Special Move Values
// =============================================================================

/// Pass move marker. Cell indices are `0..n*n`, so this never collides.
pub const PASS_MOVE: usize = usize::MAX;

// =============================================================================
// Search Parameters
// =============================================================================

/// Sentinel magnitude strictly larger than any reachable score.
pub const MAX_VAL: f32 = 100_000.0;

/// Default node budget for the solver. Zero means unlimited.
pub const DEFAULT_NODE_BUDGET: u64 = 0;

/// Positional rank of each 3x3 cell for move-ordering tiebreaks:
/// center (2) over edges (1) over corners (0).
pub const SIDE_RANK_3X3: [u8; 9] = [0, 1, 0, 1, 2, 1, 0, 1, 0];

/// Fixed seed for the Zobrist key tables so hashes are reproducible
/// across runs.
pub const ZOBRIST_SEED: u64 = 0x60_b04d_5eed;
