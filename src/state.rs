//! Search states and the arena that links them into a tree.
//!
//! States never point at their parent directly. Each one stores the index
//! of its parent inside a [`SearchTree`], so the tree is dropped as a whole
//! once a search pass is done with it.

use crate::brick::{apply_move, successors, Move};
use crate::error::MoveError;
use crate::grid::Grid;

/// Index of a state inside its [`SearchTree`].
pub type StateId = usize;

/// One node of the search graph.
#[derive(Clone, Debug)]
pub struct State {
    grid: Grid,
    /// Normalized copy of `grid`, computed once at creation.
    canonical: Grid,
    parent: Option<StateId>,
    from_move: Option<Move>,
    depth: usize,
}

impl State {
    fn root(grid: Grid) -> Self {
        Self {
            canonical: grid.canonical(),
            grid,
            parent: None,
            from_move: None,
            depth: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The deduplication key of this state.
    pub fn canonical(&self) -> &Grid {
        &self.canonical
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn from_move(&self) -> Option<Move> {
        self.from_move
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Whether the state's own grid is already normalized.
    pub fn is_canonical(&self) -> bool {
        self.grid == self.canonical
    }
}

/// States are equal when their configurations match up to brick numbering.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for State {}

/// A generated child that has not been stored in a [`SearchTree`] yet.
///
/// Its canonical form is already computed, so a duplicate check can run
/// before the tree pays for storing it.
#[derive(Clone, Debug)]
pub struct Successor {
    mv: Move,
    grid: Grid,
    canonical: Grid,
    depth: usize,
}

impl Successor {
    fn new(mv: Move, grid: Grid, depth: usize) -> Self {
        Self {
            mv,
            canonical: grid.canonical(),
            grid,
            depth,
        }
    }

    pub fn from_move(&self) -> Move {
        self.mv
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn canonical(&self) -> &Grid {
        &self.canonical
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A solved state unrolled into the moves that lead to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Moves from the root to the solved state, in play order.
    pub moves: Vec<Move>,
    /// The solved grid, with the numbering of the root grid.
    pub grid: Grid,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Arena owning every state generated during one search pass.
#[derive(Debug)]
pub struct SearchTree {
    states: Vec<State>,
}

impl SearchTree {
    /// Creates a tree holding only the root state.
    pub fn new(root: Grid) -> Self {
        Self {
            states: vec![State::root(root)],
        }
    }

    pub fn root(&self) -> StateId {
        0
    }

    pub fn get(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// Number of states stored in this tree.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Generates every child of `parent` in legal move order, without
    /// storing any of them.
    pub fn successors(&self, parent: StateId) -> Vec<Successor> {
        let from = &self.states[parent];
        successors(&from.grid)
            .into_iter()
            .map(|(mv, grid)| Successor::new(mv, grid, from.depth + 1))
            .collect()
    }

    /// Stores `child` as a child of `parent`.
    pub fn insert(&mut self, parent: StateId, child: Successor) -> StateId {
        debug_assert_eq!(child.depth, self.states[parent].depth + 1);
        self.states.push(State {
            grid: child.grid,
            canonical: child.canonical,
            parent: Some(parent),
            from_move: Some(child.mv),
            depth: child.depth,
        });
        self.states.len() - 1
    }

    /// Applies `mv` to state `parent` and stores the child.
    pub fn push_child(&mut self, parent: StateId, mv: Move) -> Result<StateId, MoveError> {
        let from = &self.states[parent];
        let grid = apply_move(&from.grid, mv)?;
        let child = Successor::new(mv, grid, from.depth + 1);
        Ok(self.insert(parent, child))
    }

    /// Walks parent links from `id` back to the root.
    pub fn path_to(&self, id: StateId) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.states[id].depth);
        let mut current = &self.states[id];
        while let (Some(parent), Some(mv)) = (current.parent, current.from_move) {
            moves.push(mv);
            current = &self.states[parent];
        }
        moves.reverse();
        moves
    }

    /// Builds the [`Solution`] ending in state `id`.
    pub fn solution(&self, id: StateId) -> Solution {
        Solution {
            moves: self.path_to(id),
            grid: self.states[id].grid.clone(),
        }
    }
}
