//! Reading boards from the comma-separated text format.
//!
//! ```text
//! 4, 3,
//! 1, 1, 1, 1,
//! 2, 0, 0, -1,
//! 1, 1, 1, 1,
//! ```
//!
//! The first line holds `width, height`, every following line one row of
//! cell codes. Trailing commas and blank lines are ignored.

use std::fs;
use std::path::Path;

use crate::error::{GridError, LoadError};
use crate::grid::{Cell, Grid};

/// Splits one line into integers, skipping empty tokens.
fn parse_line(line: &str, line_number: usize) -> Result<Vec<Cell>, LoadError> {
    line.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<Cell>().map_err(|_| LoadError::InvalidToken {
                line: line_number,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Parses a board from its text form.
pub fn parse(text: &str) -> Result<Grid, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines.next().ok_or(LoadError::MissingHeader)?;
    let header_values = parse_line(header, header_line)?;
    let (width, height) = match header_values[..] {
        [width, height] if width >= 0 && height >= 0 => (width as usize, height as usize),
        _ => return Err(LoadError::MissingHeader),
    };
    if width == 0 || height == 0 {
        return Err(GridError::ZeroDimension { width, height }.into());
    }
    if width.checked_mul(height).is_none() {
        return Err(GridError::TooLarge { width, height }.into());
    }

    // grows with the rows actually read, never with the declared size
    let mut cells = Vec::new();
    let mut rows = 0;
    for (line_number, line) in lines {
        let row = parse_line(line, line_number)?;
        if row.len() != width {
            return Err(GridError::RowLength {
                row: rows,
                expected: width,
                found: row.len(),
            }
            .into());
        }
        cells.extend(row);
        rows += 1;
    }

    if rows != height {
        return Err(GridError::RowCount {
            expected: height,
            found: rows,
        }
        .into());
    }

    Grid::new(width, height, cells).map_err(LoadError::from)
}

/// Reads and parses a board file.
pub fn load(path: impl AsRef<Path>) -> Result<Grid, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::format_board;

    #[test]
    fn test_parse_with_trailing_commas() {
        let grid = parse("4, 3,\n1, 1, 1, 1,\n2, 0, 0, -1,\n1, 1, 1, 1,\n").unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get((1, 0)), Some(2));
        assert_eq!(grid.get((1, 3)), Some(-1));
    }

    #[test]
    fn test_parse_without_trailing_commas_or_spaces() {
        let grid = parse("3,1\n2,0,-1").unwrap();
        assert_eq!(grid.cells(), &[2, 0, -1]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let grid = parse("\n3,1,\n\n2,0,-1,\n\n").unwrap();
        assert_eq!(grid.cells(), &[2, 0, -1]);
    }

    #[test]
    fn test_parse_roundtrips_format_board() {
        let text = "5, 2,\n1, 3, 3, 1, 1,\n2, 0, 0, 4, -1,\n";
        assert_eq!(format_board(&parse(text).unwrap()), text);
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let err = parse("3,2,\n1,1,1,\n2,0,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Grid(GridError::RowLength {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_parse_rejects_missing_rows() {
        let err = parse("3,2,\n1,1,1,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Grid(GridError::RowCount {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_token() {
        let err = parse("2,1,\n2,x,\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidToken { line: 2, ref token } if token == "x"));
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert!(matches!(parse(""), Err(LoadError::MissingHeader)));
        assert!(matches!(parse("3,\n2,0,-1,\n"), Err(LoadError::MissingHeader)));
        assert!(matches!(
            parse("0,1,\n"),
            Err(LoadError::Grid(GridError::ZeroDimension { .. }))
        ));
    }

    #[test]
    fn test_parse_oversized_header_is_an_error() {
        let err = parse("2147483647,2147483647,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Grid(
                GridError::RowCount { found: 0, .. } | GridError::TooLarge { .. }
            )
        ));

        let err = parse("100000,100000,\n1,1,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Grid(GridError::RowLength {
                row: 0,
                expected: 100000,
                found: 2
            })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_bundled_levels() {
        for level in ["levels/SBP-level0.txt", "levels/SBP-level1.txt"] {
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(level);
            let grid = load(&path).unwrap_or_else(|e| panic!("{level}: {e}"));
            assert!(!grid.is_solved(), "{level}");
        }
    }
}
