//! Iterative-deepening negamax search with a symmetry-aware transposition
//! table.
//!
//! The solver deepens one ply at a time until a search pass resolves the
//! root, probing the table by the game's path hash and recording every
//! resolved node under all eight symmetry-equivalent keys so a position
//! reached by rotation or reflection is never searched twice. On 3x3 boards
//! the shape theorems cut whole subtrees to a fixed value.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

use crate::board::{Board, Color};
use crate::constants::{DEFAULT_NODE_BUDGET, MAX_VAL, NUM_SYMMETRIES, PASS_MOVE, SIDE_RANK_3X3};
use crate::game::{Game, Move};
use crate::theorems::THEOREMS_3X3;

/// Outcome of a resolved search node.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Value in `[-max_score, max_score]` from the mover's perspective.
    pub value: f32,
    /// Best move found at this node, if any child was expanded.
    pub best_move: Option<Move>,
    /// Principal variation, starting with `best_move`'s reply chain.
    pub pv: Vec<Move>,
    /// Value comes from a finished game (or the node budget cutoff).
    pub terminal: bool,
    /// Value comes from a shape theorem shortcut.
    pub benson: bool,
}

impl SearchResult {
    /// Running-best seed, below every real value.
    fn sentinel() -> Self {
        SearchResult {
            value: -MAX_VAL,
            best_move: None,
            pv: Vec::new(),
            terminal: false,
            benson: false,
        }
    }

    fn leaf(value: f32, benson: bool) -> Self {
        SearchResult {
            value,
            best_move: None,
            pv: Vec::new(),
            terminal: true,
            benson,
        }
    }
}

// Results order by value alone; the PV never takes part in comparisons.
impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

/// A cached search outcome, keyed externally by path hash.
struct TtEntry {
    result: SearchResult,
    /// Side to move when the entry was computed; reuse requires a match.
    to_move: Color,
    /// Depth limit the entry was computed under. A deeper or terminal
    /// entry satisfies any shallower request.
    max_depth: u32,
}

/// Exhaustive small-board solver.
pub struct Solver {
    nodes: u64,
    /// Node ceiling; zero means unlimited. Exceeding it evaluates nodes as
    /// if terminal rather than aborting.
    node_budget: u64,
    verbose: bool,
    tt: HashMap<u64, TtEntry>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            nodes: 0,
            node_budget: DEFAULT_NODE_BUDGET,
            verbose: true,
            tt: HashMap::new(),
        }
    }

    /// A solver that evaluates at most `budget` interior nodes per search.
    pub fn with_node_budget(budget: u64) -> Self {
        let mut s = Self::new();
        s.node_budget = budget;
        s
    }

    /// Enable or disable per-depth diagnostic output.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Interior nodes expanded by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Solve the position for `color` over the full score window and return
    /// the best move (or [`PASS_MOVE`]).
    pub fn solve(&mut self, game: &mut Game, color: Color) -> Move {
        let max_score = (game.size() * game.size()) as f32;
        self.solve_scored(game, color, max_score)
    }

    /// Solve with an explicit score window, e.g. `1.0` for a bare
    /// win/loss verdict.
    pub fn solve_scored(&mut self, game: &mut Game, color: Color, max_score: f32) -> Move {
        self.solve_result(game, color, max_score)
            .best_move
            .unwrap_or(PASS_MOVE)
    }

    /// Iterative-deepening driver: re-run the full alpha-beta pass at
    /// increasing depth until one resolves, then return its result.
    pub fn solve_result(&mut self, game: &mut Game, color: Color, max_score: f32) -> SearchResult {
        self.nodes = 0;
        let start = Instant::now();
        let mut max_depth = 0;
        loop {
            max_depth += 1;
            let mut res = self.alpha_beta(game, color, -max_score, max_score, 0, max_depth);
            if let Some(r) = res.as_mut() {
                if let Some(mv) = r.best_move {
                    r.pv.insert(0, mv);
                }
            }
            if self.verbose {
                self.report(max_depth, res.as_ref(), start);
            }
            if let Some(r) = res {
                return r;
            }
        }
    }

    /// Negamax alpha-beta. `None` means the search horizon was reached
    /// without resolving the node; the deepening loop reacts by searching
    /// one ply deeper.
    fn alpha_beta(
        &mut self,
        game: &mut Game,
        color: Color,
        mut alpha: f32,
        beta: f32,
        ply: u32,
        max_depth: u32,
    ) -> Option<SearchResult> {
        if ply > max_depth {
            return None;
        }

        if game.game_over() || (self.node_budget > 0 && self.nodes > self.node_budget) {
            return Some(SearchResult::leaf(game.score(color), false));
        }

        // Shape shortcuts: a matching opponent shape decides the node
        // without expanding any child.
        if game.size() == 3 {
            for t in THEOREMS_3X3 {
                if t.applies(game.board(), color.opponent()) {
                    return Some(SearchResult::leaf(-t.value(), true));
                }
            }
        }

        let path = game.get_current_path();
        if let Some(entry) = self.tt.get(&path) {
            if entry.to_move == color && (entry.max_depth >= max_depth || entry.result.terminal) {
                return Some(entry.result.clone());
            }
        }

        self.nodes += 1;

        let mut moves = game.get_moves();
        match game.size() {
            3 => order_moves_3x3(game.board(), color, &mut moves),
            2 => order_moves_2x2(&mut moves),
            // Larger boards search in enumeration order.
            _ => {}
        }

        let mut best = SearchResult::sentinel();
        let mut undefined = false;

        for mv in moves {
            if !game.make_move(mv, color) {
                continue;
            }
            let child = self.alpha_beta(game, color.opponent(), -beta, -alpha, ply + 1, max_depth);
            game.undo_move();

            let Some(mut r) = child else {
                undefined = true;
                continue;
            };
            r.value = -r.value;
            if let Some(reply) = r.best_move {
                r.pv.insert(0, reply);
            }
            r.best_move = Some(mv);

            if r > best {
                best = r;
            }
            if best.value > alpha {
                alpha = best.value;
            }
            if alpha >= beta || best.benson {
                break;
            }
        }

        // An unresolved sibling leaves the node unproven unless a theorem
        // child already decided it.
        if undefined && !best.benson {
            return None;
        }

        // Only fully proven nodes enter the table: a value found by a
        // theorem break over an unresolved sibling holds at this horizon
        // but is not exact.
        if !undefined && !game.last_move_was_pass() {
            self.store_isomorphic(game, &best, color, max_depth);
        }

        best.benson = false;
        Some(best)
    }

    /// Record a resolved node under all eight symmetry-equivalent path
    /// hashes, each with its correspondingly transformed best move.
    fn store_isomorphic(&mut self, game: &Game, best: &SearchResult, to_move: Color, max_depth: u32) {
        let paths = game.get_isomorphic_paths();
        if paths[0] == 0 {
            return;
        }
        let Some(mv) = best.best_move else {
            return;
        };
        let iso_moves = game.get_isomorphic_moves(mv);
        for v in 0..NUM_SYMMETRIES {
            // A terminal entry is exact forever; never downgrade it.
            if self
                .tt
                .get(&paths[v])
                .is_some_and(|e| e.result.terminal)
            {
                continue;
            }
            self.tt.insert(
                paths[v],
                TtEntry {
                    result: SearchResult {
                        value: best.value,
                        best_move: Some(iso_moves[v]),
                        pv: Vec::new(),
                        terminal: best.terminal,
                        benson: false,
                    },
                    to_move,
                    max_depth,
                },
            );
        }
    }

    fn report(&self, max_depth: u32, res: Option<&SearchResult>, start: Instant) {
        let secs = start.elapsed().as_secs_f64();
        let nps = if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        };
        match res {
            Some(r) => {
                println!(
                    "d: {max_depth} value: {} move: {} nodes: {} nodes/sec: {nps:.0}",
                    r.value,
                    move_label(r.best_move.unwrap_or(PASS_MOVE)),
                    self.nodes,
                );
                let pv: Vec<String> = r.pv.iter().map(|&m| move_label(m)).collect();
                println!("pv: {}", pv.join(" "));
            }
            None => {
                println!("d: {max_depth} undefined nodes: {} nodes/sec: {nps:.0}", self.nodes);
            }
        }
    }
}

fn move_label(mv: Move) -> String {
    if mv == PASS_MOVE {
        "pass".into()
    } else {
        mv.to_string()
    }
}

/// Order 2x2 candidates: the pass move first, stone moves in enumeration
/// order. Trying the pass first reaches the two-pass terminal (an exact
/// value) in every line before any deep stone continuation, so cutoffs fire
/// inside the search horizon and the deepening loop can resolve the root.
fn order_moves_2x2(moves: &mut [Move]) {
    moves.sort_by_key(|&mv| mv != PASS_MOVE);
}

/// Order 3x3 candidates: playable non-self-atari moves first, then by the
/// area score the move yields (descending), then center over edge over
/// corner; illegal and self-atari moves follow, the pass last.
fn order_moves_3x3(board: &Board, color: Color, moves: &mut [Move]) {
    let key = |mv: Move| -> (u8, f32, u8) {
        if mv == PASS_MOVE {
            return (0, -MAX_VAL, 0);
        }
        let mut probe = *board;
        if !probe.play(mv, color) || probe.atari(mv) {
            return (1, -MAX_VAL, SIDE_RANK_3X3[mv]);
        }
        (2, probe.score(color), SIDE_RANK_3X3[mv])
    };

    let mut keyed: Vec<((u8, f32, u8), Move)> = moves.iter().map(|&m| (key(m), m)).collect();
    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    for (slot, (_, mv)) in moves.iter_mut().zip(keyed) {
        *slot = mv;
    }
}
