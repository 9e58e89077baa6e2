//! Sliding Brick Puzzle Solver Library
//!
//! Models a grid of rigid bricks that slide one cell at a time and searches
//! for a sequence of moves that brings the master brick over every goal
//! cell. Breadth-first, depth-first and iterative-deepening search share a
//! single engine in [`solver`].

pub mod brick;
pub mod error;
pub mod grid;
pub mod loader;
pub mod solver;
pub mod state;
pub mod walk;

pub use brick::{Direction, Move};
pub use error::{GridError, LoadError, MoveError};
pub use grid::Grid;
pub use solver::{Exhaustion, Outcome, SearchLimits, SearchReport, SearchStats, Strategy};
pub use state::Solution;
