//! Text command interface (GTP-style).
//!
//! A thin adapter over the core operations, spoken over stdin/stdout so the
//! solver can sit behind a controller or be driven by hand. Responses use
//! the GTP framing: `=` for success, `?` for failure, echoing an optional
//! numeric command id.
//!
//! ## Supported commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command`
//! - `boardsize <n>` - start a fresh game of side `n` (2..=8)
//! - `clear_board` - reset the current board size
//! - `showboard` - render the position
//! - `play <b|w> <vertex>` - play a move (`pass` allowed)
//! - `genmove <b|w> [window]` - solve and play; an optional score window
//!   narrows the search to a win/loss verdict
//! - `undo`, `score`, `legal <b|w>`, `quit`

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::board::Color;
use crate::constants::{MAX_N, PASS_MOVE};
use crate::game::{Game, Move};
use crate::solver::Solver;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "legal",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "score",
    "showboard",
    "undo",
    "version",
];

/// Command loop state: one game and the solver session attached to it.
pub struct GtpEngine {
    game: Game,
    solver: Solver,
}

impl GtpEngine {
    /// Create an engine for an `n x n` game.
    pub fn new(size: usize) -> Self {
        Self {
            game: Game::new(size),
            solver: Solver::new(),
        }
    }

    /// Replace the game (and the transposition state tied to it).
    fn reset(&mut self, size: usize) {
        self.game = Game::new(size);
        self.solver = Solver::new();
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "smallgo".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => match args.first().map(|a| a.parse::<usize>()) {
                Some(Ok(size)) if (2..=MAX_N).contains(&size) => {
                    self.reset(size);
                    (true, String::new())
                }
                Some(Ok(size)) => (false, format!("unacceptable size {size}, want 2..={MAX_N}")),
                _ => (false, "invalid size".to_string()),
            },

            "clear_board" => {
                self.reset(self.game.size());
                (true, String::new())
            }

            "showboard" => (true, format!("\n{}", self.game)),

            "play" => {
                let (Some(color), Some(vertex)) = (args.first(), args.get(1)) else {
                    return (false, "missing arguments".to_string());
                };
                let Some(color) = parse_color(color) else {
                    return (false, "invalid color".to_string());
                };
                let Some(mv) = parse_vertex(vertex, self.game.size()) else {
                    return (false, "invalid vertex".to_string());
                };
                if self.game.make_move(mv, color) {
                    (true, String::new())
                } else {
                    (false, "illegal move".to_string())
                }
            }

            "genmove" => {
                let Some(color) = args.first().and_then(|c| parse_color(c)) else {
                    return (false, "invalid color".to_string());
                };
                let mv = match args.get(1).map(|w| w.parse::<f32>()) {
                    Some(Ok(window)) => self.solver.solve_scored(&mut self.game, color, window),
                    Some(Err(_)) => return (false, "invalid window".to_string()),
                    None => self.solver.solve(&mut self.game, color),
                };
                if self.game.make_move(mv, color) {
                    (true, str_vertex(mv, self.game.size()))
                } else {
                    (false, "solver produced an illegal move".to_string())
                }
            }

            "undo" => {
                if self.game.undo_move() {
                    (true, String::new())
                } else {
                    (false, "nothing to undo".to_string())
                }
            }

            "score" => (true, format!("{}", self.game.score(Color::Black))),

            "legal" => {
                let Some(color) = args.first().and_then(|c| parse_color(c)) else {
                    return (false, "invalid color".to_string());
                };
                let n = self.game.size();
                let mut legal = self.game.legal_moves(color);
                let mut vertices = Vec::new();
                while legal != 0 {
                    let ind = legal.trailing_zeros() as usize;
                    legal &= legal - 1;
                    vertices.push(str_vertex(ind, n));
                }
                (true, vertices.join(" "))
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

fn parse_color(s: &str) -> Option<Color> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

/// Parse a vertex like `b2` (row letter, column number) or `pass` into a
/// row-major cell index.
fn parse_vertex(s: &str, n: usize) -> Option<Move> {
    let s = s.to_lowercase();
    if s == "pass" {
        return Some(PASS_MOVE);
    }
    let mut chars = s.chars();
    let row = chars.next()? as isize - 'a' as isize;
    let col: usize = chars.as_str().parse().ok()?;
    if row < 0 || row as usize >= n || col < 1 || col > n {
        return None;
    }
    Some(row as usize * n + (col - 1))
}

/// Render a cell index (or pass) as a vertex string.
fn str_vertex(mv: Move, n: usize) -> String {
    if mv == PASS_MOVE {
        return "pass".into();
    }
    let row = (b'a' + (mv / n) as u8) as char;
    format!("{row}{}", mv % n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_vertex_roundtrip() {
        for n in [2, 3, 5] {
            for ind in 0..n * n {
                let s = str_vertex(ind, n);
                assert_eq!(parse_vertex(&s, n), Some(ind), "roundtrip {s}");
            }
        }
        assert_eq!(parse_vertex("pass", 3), Some(PASS_MOVE));
        assert_eq!(parse_vertex("z9", 3), None);
        assert_eq!(parse_vertex("a0", 3), None);
    }

    #[test]
    fn test_name_and_protocol() {
        let mut engine = GtpEngine::new(3);
        assert_eq!(engine.execute("name", &[]), (true, "smallgo".to_string()));
        assert_eq!(engine.execute("protocol_version", &[]), (true, "2".to_string()));
    }

    #[test]
    fn test_play_and_score() {
        let mut engine = GtpEngine::new(3);
        let (ok, _) = engine.execute("play", &["b", "a1"]);
        assert!(ok);
        let (ok, msg) = engine.execute("score", &[]);
        assert!(ok);
        assert_eq!(msg, "9");
    }

    #[test]
    fn test_play_rejects_occupied() {
        let mut engine = GtpEngine::new(3);
        assert!(engine.execute("play", &["b", "b2"]).0);
        assert!(!engine.execute("play", &["w", "b2"]).0);
    }

    #[test]
    fn test_boardsize_limits() {
        let mut engine = GtpEngine::new(3);
        assert!(engine.execute("boardsize", &["5"]).0);
        assert!(!engine.execute("boardsize", &["9"]).0);
        assert!(!engine.execute("boardsize", &["x"]).0);
    }

    #[test]
    fn test_undo_command() {
        let mut engine = GtpEngine::new(3);
        assert!(!engine.execute("undo", &[]).0);
        assert!(engine.execute("play", &["b", "a1"]).0);
        assert!(engine.execute("undo", &[]).0);
    }

    #[test]
    fn test_known_command() {
        let mut engine = GtpEngine::new(3);
        assert_eq!(engine.execute("known_command", &["play"]).1, "true");
        assert_eq!(engine.execute("known_command", &["nope"]).1, "false");
    }
}
