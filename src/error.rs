//! Error types for grid construction, move application and board loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::brick::Move;

/// A grid whose shape does not match its declared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[error("grid dimensions {width}x{height} are too large")]
    TooLarge { width: usize, height: usize },
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("grid has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("expected {expected} cells for the declared dimensions, got {found}")]
    CellCount { expected: usize, found: usize },
}

/// A move that is not in the legal move set of the grid it was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move {0}")]
    IllegalMove(Move),
}

/// Failure to read a board from text or from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing `width,height` header line")]
    MissingHeader,
    #[error("line {line}: `{token}` is not an integer")]
    InvalidToken { line: usize, token: String },
    #[error(transparent)]
    Grid(#[from] GridError),
}
