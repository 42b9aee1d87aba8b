//! Match scanning and clearing
//!
//! The scan is the single source of truth for what clears: a full-grid
//! rebuild every call, two independent passes (rows then columns), masks
//! OR'd together. L and T intersections fall out of the passes being
//! additive; no special casing.

use super::state::Cell;

/// Minimum run length eligible for clearing
pub const MIN_RUN: usize = 3;

/// Aggregates from applying a clear
#[derive(Debug, Clone)]
pub struct ClearOutcome {
    /// Total tiles removed
    pub tiles: u32,
    /// Whether any removed cell sat at or below the clear-line row
    pub below_line: bool,
    /// Positions removed, for particle spawning
    pub cells: Vec<(usize, usize)>,
}

/// Rebuild the match mask from scratch. Returns the mask and whether any
/// run of `MIN_RUN`+ equal non-empty cells exists.
pub fn scan_matches(grid: &[Vec<Cell>]) -> (Vec<Vec<bool>>, bool) {
    let height = grid.len();
    let width = if height > 0 { grid[0].len() } else { 0 };
    let mut mask = vec![vec![false; width]; height];
    let mut any = false;

    // Horizontal runs, each row left to right
    for (y, row) in grid.iter().enumerate() {
        let mut x = 0;
        while x < width {
            if row[x].is_empty() {
                x += 1;
                continue;
            }
            let mut end = x + 1;
            while end < width && row[end] == row[x] {
                end += 1;
            }
            if end - x >= MIN_RUN {
                for mx in x..end {
                    mask[y][mx] = true;
                }
                any = true;
            }
            x = end;
        }
    }

    // Vertical runs, each column top to bottom
    for x in 0..width {
        let mut y = 0;
        while y < height {
            if grid[y][x].is_empty() {
                y += 1;
                continue;
            }
            let mut end = y + 1;
            while end < height && grid[end][x] == grid[y][x] {
                end += 1;
            }
            if end - y >= MIN_RUN {
                for my in y..end {
                    mask[my][x] = true;
                }
                any = true;
            }
            y = end;
        }
    }

    (mask, any)
}

/// Empty every masked cell and report the aggregates the scorer needs.
pub fn apply_clear(
    grid: &mut [Vec<Cell>],
    mask: &[Vec<bool>],
    clear_line_row: usize,
) -> ClearOutcome {
    let mut cells = Vec::new();
    let mut below_line = false;

    for (y, row) in mask.iter().enumerate() {
        for (x, &marked) in row.iter().enumerate() {
            if marked && !grid[y][x].is_empty() {
                grid[y][x] = Cell::Empty;
                if y >= clear_line_row {
                    below_line = true;
                }
                cells.push((x, y));
            }
        }
    }

    ClearOutcome {
        tiles: cells.len() as u32,
        below_line,
        cells,
    }
}
