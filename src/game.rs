//! Game-state manager: move history, positional superko, and the eight
//! symmetry-equivalent copies of the position.
//!
//! One authoritative board is kept alongside seven symmetry-transformed
//! mirrors (three further rotations, and a reflection composed with each
//! rotation). Every confirmed move is replayed on the mirrors through the
//! corresponding cell permutation, so the solver can record one search
//! result under all eight equivalent transposition keys at once.
//!
//! All per-move state lives in a single [`Frame`] pushed and popped as a
//! unit, which keeps the variant stacks in lockstep by construction.

use std::collections::HashSet;
use std::fmt;

use crate::board::{Board, Color, path_key, symmetry_maps};
use crate::constants::{NUM_SYMMETRIES, PASS_MOVE};

/// A move: a row-major cell index, or [`PASS_MOVE`].
pub type Move = usize;

/// One history entry: the position under every symmetry, the matching path
/// hashes, and the pass bookkeeping needed to undo exactly.
#[derive(Copy, Clone)]
struct Frame {
    boards: [Board; NUM_SYMMETRIES],
    /// Incremental XOR hash over (move, ply) pairs per variant; the
    /// transposition-table key. Passes leave it unchanged.
    paths: [u64; NUM_SYMMETRIES],
    /// Consecutive passes ending at this frame. Zero for a stone move.
    passes: u32,
    /// Whether reaching this frame flipped the side to move.
    flipped: bool,
}

/// A game of Go on an `n x n` board.
pub struct Game {
    n: usize,
    /// Cell permutation per symmetry variant; `maps[0]` is the identity.
    maps: [Vec<usize>; NUM_SYMMETRIES],
    frames: Vec<Frame>,
    /// Content hashes of every position reached by a stone move, plus the
    /// starting position.
    superko: HashSet<u64>,
    to_move: Color,
}

impl Game {
    /// Start a fresh game on an `n x n` board. Black moves first.
    ///
    /// # Panics
    /// Panics if `n * n` exceeds 64 cells.
    pub fn new(n: usize) -> Self {
        let board = Board::new(n);
        let mut superko = HashSet::new();
        superko.insert(board.hash());
        Game {
            n,
            maps: symmetry_maps(n),
            frames: vec![Frame {
                boards: [board; NUM_SYMMETRIES],
                paths: [0; NUM_SYMMETRIES],
                passes: 0,
                flipped: false,
            }],
            superko,
            to_move: Color::Black,
        }
    }

    fn top(&self) -> &Frame {
        self.frames.last().expect("history holds the initial frame")
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// The side expected to move next.
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// The authoritative (untransformed) board.
    pub fn board(&self) -> &Board {
        &self.top().boards[0]
    }

    /// True once two consecutive passes have been played.
    pub fn game_over(&self) -> bool {
        self.top().passes > 1
    }

    /// True if the most recent frame was a pass.
    pub fn last_move_was_pass(&self) -> bool {
        self.top().passes > 0
    }

    /// Play `ind` (or [`PASS_MOVE`]) for `color`.
    ///
    /// Fails on occupied cells, suicide, and superko repetition, leaving all
    /// state unchanged. Moves after the game has ended are rejected. The
    /// side to move flips only when `color` matches the side expected to
    /// move, as when a caller places setup stones out of turn.
    pub fn make_move(&mut self, ind: Move, color: Color) -> bool {
        if self.game_over() {
            return false;
        }
        let flips = color == self.to_move;

        if ind == PASS_MOVE {
            let mut frame = *self.top();
            frame.passes += 1;
            frame.flipped = flips;
            self.frames.push(frame);
            if flips {
                self.to_move = self.to_move.opponent();
            }
            return true;
        }

        // Speculative frame; dropped without trace on failure.
        let ply = self.frames.len() - 1;
        let mut frame = *self.top();
        if !frame.boards[0].play(ind, color) {
            return false;
        }
        let hash = frame.boards[0].hash();
        if self.superko.contains(&hash) {
            return false;
        }
        self.superko.insert(hash);

        frame.passes = 0;
        frame.flipped = flips;
        frame.paths[0] ^= path_key(ind, ply);
        for v in 1..NUM_SYMMETRIES {
            let iso = self.maps[v][ind];
            let legal = frame.boards[v].play(iso, color);
            debug_assert!(legal, "symmetric replay of a legal move is legal");
            frame.paths[v] ^= path_key(iso, ply);
        }

        self.frames.push(frame);
        if flips {
            self.to_move = self.to_move.opponent();
        }
        true
    }

    /// Revert the most recent move or pass. Fails when only the initial
    /// frame remains.
    pub fn undo_move(&mut self) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        let Some(popped) = self.frames.pop() else {
            return false;
        };
        // A pass duplicated the board without claiming a superko slot, so
        // undoing one must not erase the hash a stone move registered.
        if popped.passes == 0 {
            self.superko.remove(&popped.boards[0].hash());
        }
        if popped.flipped {
            self.to_move = self.to_move.opponent();
        }
        true
    }

    /// Candidate moves: every empty cell plus the pass move. Emptiness is
    /// the only pre-filter; suicide and superko are discovered by attempting
    /// the move.
    pub fn get_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.n * self.n + 1);
        let mut empty = self.board().empty_points();
        while empty != 0 {
            moves.push(empty.trailing_zeros() as usize);
            empty &= empty - 1;
        }
        moves.push(PASS_MOVE);
        moves
    }

    /// Bit-set of cells where `color` can legally play right now, found by
    /// probing each candidate with a make/undo pair.
    pub fn legal_moves(&mut self, color: Color) -> u64 {
        let mut legal = 0u64;
        let mut empty = self.board().empty_points();
        while empty != 0 {
            let ind = empty.trailing_zeros() as usize;
            empty &= empty - 1;
            if self.make_move(ind, color) {
                self.undo_move();
                legal |= 1u64 << ind;
            }
        }
        legal
    }

    /// Area score of the current position for `color`.
    pub fn score(&self, color: Color) -> f32 {
        self.board().score(color)
    }

    /// Path hash of the authoritative variant; the transposition key for
    /// the current node.
    pub fn get_current_path(&self) -> u64 {
        self.top().paths[0]
    }

    /// Path hashes of all eight symmetry variants.
    pub fn get_isomorphic_paths(&self) -> [u64; NUM_SYMMETRIES] {
        self.top().paths
    }

    /// The image of `mv` under each of the eight symmetries. Pass maps to
    /// pass.
    pub fn get_isomorphic_moves(&self, mv: Move) -> [Move; NUM_SYMMETRIES] {
        std::array::from_fn(|v| {
            if mv == PASS_MOVE {
                PASS_MOVE
            } else {
                self.maps[v][mv]
            }
        })
    }

    /// Render the current position.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board())
    }
}
