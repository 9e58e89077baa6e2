//! Sliding Brick Puzzle Solver
//!
//! Loads boards from text files, plays random walks on them and solves them
//! with breadth-first, depth-first or iterative-deepening search. Moves,
//! boards and search statistics are printed to standard output.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sliding_brick::grid::format_board;
use sliding_brick::{
    loader, walk, Grid, Outcome, SearchLimits, SearchReport, Solution, Strategy,
};

/// Board used by the demo random walk.
const DEMO_WALK_BOARD: &str = include_str!("../levels/SBP-level0.txt");
/// Board solved by every strategy in the demo.
const DEMO_SOLVE_BOARD: &str = include_str!("../levels/SBP-level1.txt");

/// Solves sliding brick puzzles with uninformed graph search.
#[derive(Parser)]
#[command(name = "sliding-brick")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Deepest state a search may reach.
    #[arg(long, global = true)]
    max_depth: Option<usize>,
    /// Maximum number of states a search may expand.
    #[arg(long, global = true)]
    max_states: Option<usize>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play random moves on a board, printing every intermediate board.
    Walk {
        file: PathBuf,
        /// Number of moves to play.
        #[arg(long, default_value_t = 3)]
        turns: usize,
        /// Seed for reproducible walks.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Solve a board with one or more strategies.
    Solve {
        file: PathBuf,
        /// Strategies to run, in order. Defaults to all of them.
        #[arg(long = "strategy", value_enum)]
        strategies: Vec<StrategyArg>,
    },
    /// Walk the bundled level 0, then solve level 1 with every strategy.
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Bfs,
    Dfs,
    Ids,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Bfs => Strategy::BreadthFirst,
            StrategyArg::Dfs => Strategy::DepthFirst,
            StrategyArg::Ids => Strategy::IterativeDeepening,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let limits = SearchLimits {
        max_depth: cli.max_depth,
        max_states: cli.max_states,
    };

    let result = match cli.command {
        Some(Command::Walk { file, turns, seed }) => {
            load_board(&file).and_then(|board| run_walk(&board, turns, seed))
        }
        Some(Command::Solve { file, strategies }) => {
            let strategies: Vec<Strategy> = if strategies.is_empty() {
                Strategy::ALL.to_vec()
            } else {
                strategies.into_iter().map(Strategy::from).collect()
            };
            load_board(&file).map(|board| run_solve(&board, &strategies, &limits))
        }
        // default: reproduce the classic demo
        Some(Command::Demo) | None => run_demo(&limits),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn load_board(file: &Path) -> Result<Grid, String> {
    loader::load(file).map_err(|e| format!("Failed to load board: {e}"))
}

/// Parses a board bundled into the binary.
fn bundled_board(text: &str) -> Result<Grid, String> {
    loader::parse(text).map_err(|e| format!("Failed to parse bundled board: {e}"))
}

/// Walks the bundled level 0, then solves level 1 with every strategy.
fn run_demo(limits: &SearchLimits) -> Result<(), String> {
    run_walk(&bundled_board(DEMO_WALK_BOARD)?, 3, None)?;
    run_solve(&bundled_board(DEMO_SOLVE_BOARD)?, &Strategy::ALL, limits);
    Ok(())
}

/// Plays a random walk and prints each move followed by the board after it.
fn run_walk(board: &Grid, turns: usize, seed: Option<u64>) -> Result<(), String> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("{board}");
    let walk = walk::random_walk(board, turns, &mut rng).map_err(|e| e.to_string())?;
    for step in &walk.steps {
        println!("{}\n", step.mv);
        println!("{}", step.grid);
    }
    if walk.solved {
        println!("Goal reached after {} moves", walk.steps.len());
    }

    Ok(())
}

/// Runs every strategy on one board and prints its report.
fn run_solve(board: &Grid, strategies: &[Strategy], limits: &SearchLimits) {
    for &strategy in strategies {
        println!("== {strategy}");
        let report = strategy.search(board, limits);
        print!("{}", format_report(&report));
    }
}

/// Formats the move list followed by the solved board.
fn format_solution(solution: &Solution) -> String {
    let mut output = String::new();
    for mv in &solution.moves {
        output.push_str(&format!("{mv}\n"));
    }
    output.push_str(&format_board(&solution.grid));
    output
}

/// Formats a report, ending with `<expanded> <seconds> <moves>`.
fn format_report(report: &SearchReport) -> String {
    match &report.outcome {
        Outcome::Solved(solution) => format!(
            "{}\n{} {:.2} {}\n\n",
            format_solution(solution),
            report.stats.expanded,
            report.stats.elapsed.as_secs_f64(),
            solution.len()
        ),
        Outcome::Exhausted(why) => format!(
            "no solution ({why})\n{} {:.2}\n\n",
            report.stats.expanded,
            report.stats.elapsed.as_secs_f64()
        ),
    }
}
