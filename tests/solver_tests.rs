//! Integration tests for the search engine, exercised through the public
//! API only.

use smallgo::board::Color;
use smallgo::constants::PASS_MOVE;
use smallgo::game::Game;
use smallgo::solver::Solver;

use Color::{Black, White};

fn quiet_solver() -> Solver {
    let mut s = Solver::new();
    s.set_verbose(false);
    s
}

/// Middle cross: the middle column held by Black, both neighbor columns
/// empty.
fn cross_game() -> Game {
    let mut g = Game::new(3);
    for mv in [1, 4, 7] {
        assert!(g.make_move(mv, Black));
    }
    g
}

#[test]
fn test_solve_2x2_is_deterministic_for_both_colors() {
    for color in [Black, White] {
        let mut first = Game::new(2);
        let r1 = quiet_solver().solve_result(&mut first, color, 4.0);
        let mut second = Game::new(2);
        let r2 = quiet_solver().solve_result(&mut second, color, 4.0);
        assert_eq!(r1.value, r2.value);
        assert_eq!(r1.best_move, r2.best_move);
    }
}

#[test]
fn test_solve_2x2_returns_playable_move() {
    let mut game = Game::new(2);
    let mut solver = quiet_solver();
    let best = solver.solve(&mut game, Black);
    assert!(game.make_move(best, Black), "solver move must be legal");
}

#[test]
fn test_middle_cross_shortcuts_search() {
    let mut game = cross_game();
    let mut solver = quiet_solver();
    let result = solver.solve_result(&mut game, White, 9.0);
    assert_eq!(result.value, -9.0, "theorem value, negated for the opponent");
    assert!(result.terminal);
    assert_eq!(solver.nodes(), 0, "no node was expanded");
}

#[test]
fn test_negamax_values_negate_across_colors() {
    // The cross is decided for both sides: +9 with Black to move, -9 with
    // White to move.
    let mut game = cross_game();
    let for_white = quiet_solver().solve_result(&mut game, White, 9.0).value;
    let for_black = quiet_solver().solve_result(&mut game, Black, 9.0).value;
    assert_eq!(for_black, -for_white);
}

#[test]
fn test_symmetric_positions_share_one_search() {
    // Solve a corner opening, then present the same position rotated: the
    // transposition table answers the rotated game without expanding a
    // single node, and its move is the rotation of the original one.
    let mut solver = quiet_solver();

    let mut game = Game::new(3);
    assert!(game.make_move(1, Black));
    assert!(game.make_move(4, Black));
    let result = solver.solve_result(&mut game, Black, 9.0);
    let best = result.best_move.expect("completing the cross wins");
    assert!(solver.nodes() > 0);

    // The same shape rotated a quarter turn: middle row instead of column.
    let mut rotated = Game::new(3);
    assert!(rotated.make_move(rotated.get_isomorphic_moves(1)[1], Black));
    assert!(rotated.make_move(rotated.get_isomorphic_moves(4)[1], Black));
    let rotated_result = solver.solve_result(&mut rotated, Black, 9.0);

    assert_eq!(solver.nodes(), 0, "rotated position must be a cache hit");
    assert_eq!(rotated_result.value, result.value);
    assert_eq!(
        rotated_result.best_move,
        Some(game.get_isomorphic_moves(best)[1]),
        "cached best move is the transformed original"
    );
}

#[test]
fn test_node_budget_cuts_off() {
    let mut game = Game::new(4);
    let mut solver = Solver::with_node_budget(50);
    solver.set_verbose(false);
    let result = solver.solve_result(&mut game, Black, 16.0);
    assert!(result.terminal, "budget exhaustion evaluates as terminal");
}

#[test]
fn test_solve_restores_game_state() {
    let mut game = Game::new(2);
    let paths = game.get_isomorphic_paths();
    let hash = game.board().hash();
    quiet_solver().solve(&mut game, Black);
    assert_eq!(game.get_isomorphic_paths(), paths);
    assert_eq!(game.board().hash(), hash);
    assert!(!game.game_over());
}

#[test]
fn test_finished_game_solves_to_pass() {
    let mut game = Game::new(2);
    game.make_move(PASS_MOVE, Black);
    game.make_move(PASS_MOVE, White);
    assert!(game.game_over());
    assert_eq!(quiet_solver().solve(&mut game, Black), PASS_MOVE);
}
