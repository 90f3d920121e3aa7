//! Smallgo: play and exhaustively solve small-board Go.
//!
//! The crate keeps exact board state under Go's capture, suicide, and
//! positional-superko rules, and determines the game-theoretic value and
//! best move of positions up to 8x8 by iterative-deepening negamax search
//! with a symmetry-aware transposition table.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, move sentinels, search parameters
//! - [`board`] - Bitboard rules engine (captures, scoring, Zobrist hashing)
//! - [`game`] - Game state: history, superko, symmetry-equivalent variants
//! - [`theorems`] - 3x3 shape shortcuts
//! - [`solver`] - Negamax alpha-beta search with transposition caching
//! - [`gtp`] - Text command adapter
//!
//! ## Example
//!
//! ```
//! use smallgo::board::Color;
//! use smallgo::game::Game;
//! use smallgo::solver::Solver;
//!
//! // Solve a 2x2 game from the empty board.
//! let mut game = Game::new(2);
//! let mut solver = Solver::new();
//! solver.set_verbose(false);
//!
//! let best = solver.solve(&mut game, Color::Black);
//! assert!(game.make_move(best, Color::Black));
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod gtp;
pub mod solver;
pub mod theorems;
