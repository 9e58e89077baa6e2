//! Bricks, move directions and move generation.
//!
//! A brick is never stored explicitly: it is the set of cells sharing one
//! code of [`MASTER`] or above. [`Brick`] derives that set from a grid and
//! answers whether the brick can slide one step.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::MoveError;
use crate::grid::{Cell, Grid, Pos, EMPTY, GOAL, MASTER};

/// One of the four orthogonal sliding directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in move generation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row and column offset of one step.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }

    /// The position one step away from `pos`, if it is inside `grid`.
    #[inline]
    fn step(self, grid: &Grid, (row, col): Pos) -> Option<Pos> {
        let (d_row, d_col) = self.offset();
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        if row < grid.height() && col < grid.width() {
            Some((row, col))
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Slide `brick` one cell towards `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub brick: Cell,
    pub direction: Direction,
}

impl Move {
    pub const fn new(brick: Cell, direction: Direction) -> Self {
        Self { brick, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.brick, self.direction)
    }
}

/// The cells a brick occupies in one grid.
#[derive(Clone, Debug)]
pub struct Brick {
    number: Cell,
    cells: Vec<Pos>,
}

impl Brick {
    /// Collects the cells of `number` in row-major order.
    ///
    /// The result is empty when `number` does not occur in the grid.
    pub fn locate(grid: &Grid, number: Cell) -> Self {
        let cells = grid
            .iter()
            .filter(|&(_, cell)| cell == number)
            .map(|(pos, _)| pos)
            .collect();
        Self { number, cells }
    }

    pub fn number(&self) -> Cell {
        self.number
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Whether every cell of the brick can shift one step in `direction`.
    ///
    /// A destination is free when it is empty, belongs to this brick, or is
    /// a goal cell and this is the master brick. Leaving the grid counts as
    /// blocked.
    pub fn can_move(&self, grid: &Grid, direction: Direction) -> bool {
        self.cells.iter().all(|&pos| {
            let Some(target) = direction.step(grid, pos) else {
                return false;
            };
            match grid.get(target) {
                Some(EMPTY) => true,
                Some(GOAL) => self.number == MASTER,
                Some(cell) => cell == self.number,
                None => false,
            }
        })
    }

    /// The legal moves of this brick in direction order.
    pub fn moves<'a>(&'a self, grid: &'a Grid) -> impl Iterator<Item = Move> + 'a {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.can_move(grid, direction))
            .map(move |direction| Move::new(self.number, direction))
    }

    /// Copies `grid` with this brick shifted one step towards `direction`.
    ///
    /// Every cell is cleared first and then written one step further, so
    /// overlapping source and destination cells are handled. Callers check
    /// [`Brick::can_move`] first; cells that would leave the grid are dropped.
    fn slide(&self, grid: &Grid, direction: Direction) -> Grid {
        let mut next = grid.clone();
        for &pos in &self.cells {
            next.set(pos, EMPTY);
        }
        for target in self.cells.iter().filter_map(|&pos| direction.step(grid, pos)) {
            next.set(target, self.number);
        }
        next
    }
}

/// Returns the cells occupied by brick `number`.
pub fn occupied_cells(grid: &Grid, number: Cell) -> Vec<Pos> {
    Brick::locate(grid, number).cells
}

/// Whether brick `number` can slide one step in `direction`.
pub fn can_move(grid: &Grid, number: Cell, direction: Direction) -> bool {
    Brick::locate(grid, number).can_move(grid, direction)
}

/// Groups the brick cells of `grid` in one pass, in first-occurrence order.
fn bricks(grid: &Grid) -> Vec<Brick> {
    let mut slots: FxHashMap<Cell, usize> = FxHashMap::default();
    let mut bricks: Vec<Brick> = Vec::new();

    for (pos, cell) in grid.iter() {
        if cell < MASTER {
            continue;
        }
        let slot = *slots.entry(cell).or_insert_with(|| {
            bricks.push(Brick {
                number: cell,
                cells: Vec::new(),
            });
            bricks.len() - 1
        });
        bricks[slot].cells.push(pos);
    }

    bricks
}

/// Enumerates every legal single-step move.
///
/// Bricks come in first-occurrence order of a row-major scan, and the moves
/// of one brick follow [`Direction::ALL`].
pub fn legal_moves(grid: &Grid) -> Vec<Move> {
    bricks(grid)
        .iter()
        .flat_map(|brick| brick.moves(grid))
        .collect()
}

/// Every legal move of `grid` paired with the grid it produces, in
/// [`legal_moves`] order.
pub fn successors(grid: &Grid) -> Vec<(Move, Grid)> {
    let mut out = Vec::new();
    for brick in bricks(grid) {
        for mv in brick.moves(grid) {
            out.push((mv, brick.slide(grid, mv.direction)));
        }
    }
    out
}

/// Applies `mv` to a copy of `grid`.
///
/// Rejects moves that are not legal in `grid`.
pub fn apply_move(grid: &Grid, mv: Move) -> Result<Grid, MoveError> {
    let brick = Brick::locate(grid, mv.brick);
    if mv.brick < MASTER || brick.cells.is_empty() || !brick.can_move(grid, mv.direction) {
        return Err(MoveError::IllegalMove(mv));
    }
    Ok(brick.slide(grid, mv.direction))
}
