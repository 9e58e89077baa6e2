//! Random walks over the move graph.

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::brick::{apply_move, legal_moves, Move};
use crate::error::MoveError;
use crate::grid::Grid;

/// One turn of a walk: the move played and the normalized grid after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub mv: Move,
    pub grid: Grid,
}

/// The turns of a random walk, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Walk {
    pub steps: Vec<Step>,
    /// Whether the walk ended on a solved grid.
    pub solved: bool,
}

/// Plays uniformly random legal moves on a copy of `start`.
///
/// Stops after `max_turns` moves, on the first solved grid, or when no
/// move is legal. The grid is normalized after every move, so move brick
/// numbers refer to the normalized grid of the previous turn.
pub fn random_walk<R: Rng + ?Sized>(
    start: &Grid,
    max_turns: usize,
    rng: &mut R,
) -> Result<Walk, MoveError> {
    let mut current = start.clone();
    let mut steps = Vec::new();

    while steps.len() < max_turns && !current.is_solved() {
        let moves = legal_moves(&current);
        let Some(&mv) = moves.choose(rng) else {
            break;
        };

        current = apply_move(&current, mv)?;
        current.normalize();
        trace!("turn {}: {mv}", steps.len() + 1);

        steps.push(Step {
            mv,
            grid: current.clone(),
        });
    }

    Ok(Walk {
        steps,
        solved: current.is_solved(),
    })
}
