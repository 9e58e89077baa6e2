//! Grid representation and canonicalization for sliding brick puzzles.
//!
//! The grid is stored as a flat row-major vector of cell codes. Codes below
//! [`MASTER`] are fixed terrain (goal, empty, wall); codes from [`MASTER`]
//! upward identify bricks.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::GridError;

/// A single cell code.
pub type Cell = i32;

/// Uncovered goal cell.
pub const GOAL: Cell = -1;
/// Empty cell.
pub const EMPTY: Cell = 0;
/// Immovable wall.
pub const WALL: Cell = 1;
/// The master brick, which has to cover every goal cell.
pub const MASTER: Cell = 2;
/// First code handed out to ordinary bricks by [`Grid::normalize`].
pub const FIRST_BRICK: Cell = 3;

/// A `(row, col)` position inside a grid.
pub type Pos = (usize, usize);

/// A rectangular matrix of cell codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid from row-major cells.
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let width = rows.first().ok_or(GridError::Empty)?.len();
        let height = rows.len();
        let mut cells = Vec::with_capacity(rows.iter().map(Vec::len).sum());

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(GridError::RowLength {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }

        Self::new(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `pos`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, (row, col): Pos) -> Option<Cell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Overwrites the cell at `pos`.
    ///
    /// Panics when `pos` is out of bounds; callers only pass positions that
    /// came from this grid.
    #[inline]
    pub(crate) fn set(&mut self, (row, col): Pos, cell: Cell) {
        self.cells[row * self.width + col] = cell;
    }

    /// Iterates over `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| ((idx / width, idx % width), cell))
    }

    /// A grid is solved once no uncovered goal cell remains.
    pub fn is_solved(&self) -> bool {
        !self.cells.contains(&GOAL)
    }

    /// Relabels ordinary bricks in first-occurrence scan order.
    ///
    /// The first unseen brick code found scanning row-major becomes
    /// [`FIRST_BRICK`], the next one `FIRST_BRICK + 1`, and so on. Terrain
    /// and the master brick keep their codes. Normalizing twice is a no-op.
    pub fn normalize(&mut self) {
        let mut relabel: FxHashMap<Cell, Cell> = FxHashMap::default();
        let mut next = FIRST_BRICK;

        for cell in &mut self.cells {
            if *cell <= MASTER {
                continue;
            }
            *cell = *relabel.entry(*cell).or_insert_with(|| {
                let label = next;
                next += 1;
                label
            });
        }
    }

    /// Returns the normalized copy of this grid, leaving `self` untouched.
    pub fn canonical(&self) -> Grid {
        let mut canonical = self.clone();
        canonical.normalize();
        canonical
    }

    /// Whether this grid already is in canonical form.
    pub fn is_canonical(&self) -> bool {
        let mut next = FIRST_BRICK;
        for &cell in &self.cells {
            if cell == next {
                next += 1;
            } else if cell > next {
                return false;
            }
        }
        true
    }

    /// Whether two grids show the same configuration up to brick numbering.
    pub fn same_configuration(&self, other: &Grid) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.canonical() == other.canonical()
    }
}

/// Formats a grid in the board file layout.
///
/// The first line is `width, height,`; each following line is one row with
/// every value followed by a comma.
pub fn format_board(grid: &Grid) -> String {
    let mut output = format!("{}, {},\n", grid.width, grid.height);
    for row in grid.cells.chunks(grid.width) {
        let line: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        output.push_str(&line.join(", "));
        output.push_str(",\n");
    }
    output
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_board(self))
    }
}
