//! Smallgo: an exhaustive solver for small Go boards.
//!
//! ## Usage
//!
//! - `smallgo gtp` - start the text command server
//! - `smallgo solve --size 3 --color black` - solve a position from scratch

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use smallgo::board::Color;
use smallgo::constants::{MAX_N, PASS_MOVE};
use smallgo::game::Game;
use smallgo::gtp::GtpEngine;
use smallgo::solver::Solver;

/// Smallgo: play and exhaustively solve small-board Go
#[derive(Parser)]
#[command(name = "smallgo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text command server (GTP-style)
    Gtp {
        /// Board side length
        #[arg(long, default_value_t = 3)]
        size: usize,
    },
    /// Solve the empty board and report the best first move
    Solve {
        /// Board side length
        #[arg(long, default_value_t = 3)]
        size: usize,
        /// Side to move first ("black" or "white")
        #[arg(long, default_value = "black")]
        color: String,
        /// Node budget; 0 searches without a ceiling
        #[arg(long, default_value_t = 0)]
        nodes: u64,
        /// Suppress per-depth search diagnostics
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp { size }) => {
            check_size(size)?;
            GtpEngine::new(size).run()
        }
        Some(Commands::Solve {
            size,
            color,
            nodes,
            quiet,
        }) => {
            check_size(size)?;
            let color = parse_color(&color)?;
            run_solve(size, color, nodes, quiet)
        }
        None => run_solve(3, Color::Black, 0, false),
    }
}

fn check_size(size: usize) -> Result<()> {
    if !(2..=MAX_N).contains(&size) {
        bail!("board size must be 2..={MAX_N}, got {size}");
    }
    Ok(())
}

fn parse_color(s: &str) -> Result<Color> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Ok(Color::Black),
        "w" | "white" => Ok(Color::White),
        other => bail!("unknown color: {other}"),
    }
}

fn run_solve(size: usize, color: Color, nodes: u64, quiet: bool) -> Result<()> {
    let mut game = Game::new(size);
    let mut solver = if nodes > 0 {
        Solver::with_node_budget(nodes)
    } else {
        Solver::new()
    };
    solver.set_verbose(!quiet);

    let best = solver.solve(&mut game, color);
    if best == PASS_MOVE {
        println!("best move: pass");
    } else {
        println!("best move: {best}");
    }

    game.make_move(best, color);
    game.print();
    Ok(())
}
