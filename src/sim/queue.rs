//! Level row queue and sanitization
//!
//! Incoming rows are repaired at enqueue time so that no row, at the
//! moment it rises into play, forms a match by itself. Candidates are
//! sanitized in sequence against a simulated copy of the grid, so each
//! row's vertical context is the already-sanitized row before it.

use std::collections::VecDeque;

use rand::Rng;

use super::matches::scan_matches;
use super::state::{Cell, GameState};

/// Bound on the repair/verify loop. Two greedy passes converge almost
/// always on the first try; degenerate palettes (1-2 colors) exit on the
/// bound instead of looping.
const SANITIZE_MAX_ROUNDS: usize = 4;

/// Pad or truncate a candidate row to exactly `width` entries
pub(crate) fn normalize_row(mut row: Vec<Cell>, width: usize) -> Vec<Cell> {
    row.resize(width, Cell::Empty);
    row
}

/// Lowest-indexed color not in `excluded`; color 0 when all are
fn pick_replacement(excluded: &[u8], num_colors: u8) -> u8 {
    (0..num_colors).find(|c| !excluded.contains(c)).unwrap_or(0)
}

/// Repair a candidate row against the two rows that will sit directly
/// above it once inserted. Two greedy passes (horizontal, then vertical),
/// repeated until a rescan of the row in context comes back clean.
pub fn sanitize_row(row: &mut [Cell], above1: &[Cell], above2: &[Cell], num_colors: u8) {
    for _ in 0..SANITIZE_MAX_ROUNDS {
        horizontal_pass(row, above1, above2, num_colors);
        vertical_pass(row, above1, above2, num_colors);
        if row_is_clean(row, above1, above2) {
            return;
        }
    }
}

/// Replace the third cell of any left-to-right triple. The scan keeps
/// moving after a repair, so a run minted to the left is caught when the
/// window reaches it.
fn horizontal_pass(row: &mut [Cell], above1: &[Cell], above2: &[Cell], num_colors: u8) {
    for x in 2..row.len() {
        let (Some(a), Some(b), Some(c)) =
            (row[x - 2].color(), row[x - 1].color(), row[x].color())
        else {
            continue;
        };
        if a != b || b != c {
            continue;
        }
        let mut excluded = vec![c];
        // Avoid trading the horizontal run for a vertical one
        if let (Some(u1), Some(u2)) = (above1[x].color(), above2[x].color()) {
            if u1 == u2 {
                excluded.push(u1);
            }
        }
        row[x] = Cell::Color(pick_replacement(&excluded, num_colors));
    }
}

/// Break vertical triples against the context pair, excluding any value
/// that would mint a horizontal run around the repaired cell.
fn vertical_pass(row: &mut [Cell], above1: &[Cell], above2: &[Cell], num_colors: u8) {
    let width = row.len();
    for x in 0..width {
        let (Some(c), Some(u1), Some(u2)) =
            (row[x].color(), above1[x].color(), above2[x].color())
        else {
            continue;
        };
        if u1 != u2 || u1 != c {
            continue;
        }
        let mut excluded = vec![c];
        if x >= 2 {
            if let (Some(l1), Some(l2)) = (row[x - 1].color(), row[x - 2].color()) {
                if l1 == l2 {
                    excluded.push(l1);
                }
            }
        }
        if x + 2 < width {
            if let (Some(r1), Some(r2)) = (row[x + 1].color(), row[x + 2].color()) {
                if r1 == r2 {
                    excluded.push(r1);
                }
            }
        }
        if x >= 1 && x + 1 < width {
            if let (Some(l), Some(r)) = (row[x - 1].color(), row[x + 1].color()) {
                if l == r {
                    excluded.push(l);
                }
            }
        }
        row[x] = Cell::Color(pick_replacement(&excluded, num_colors));
    }
}

/// True when the row holds no horizontal triple and no vertical triple
/// with its context pair
fn row_is_clean(row: &[Cell], above1: &[Cell], above2: &[Cell]) -> bool {
    for x in 2..row.len() {
        if let (Some(a), Some(b), Some(c)) =
            (row[x - 2].color(), row[x - 1].color(), row[x].color())
        {
            if a == b && b == c {
                return false;
            }
        }
    }
    for x in 0..row.len() {
        if let (Some(c), Some(u1), Some(u2)) =
            (row[x].color(), above1[x].color(), above2[x].color())
        {
            if c == u1 && u1 == u2 {
                return false;
            }
        }
    }
    true
}

impl GameState {
    /// Install the level's incoming rows. Each candidate is normalized to
    /// the grid width and sanitized against a simulated running copy of
    /// the grid, then up to `visible_count` rows are placed into the real
    /// grid bottom-up. The queue length defines the level's win threshold.
    pub fn set_level_queue(&mut self, rows: Vec<Vec<Cell>>, visible_count: usize) {
        let mut sim = self.grid.clone();
        let mut queue = VecDeque::with_capacity(rows.len());

        for raw in rows {
            let mut row = normalize_row(raw, self.width);
            let above1 = sim[self.height - 1].clone();
            let above2 = sim[self.height - 2].clone();
            sanitize_row(&mut row, &above1, &above2, self.num_colors);
            sim.remove(0);
            sim.push(row.clone());
            queue.push_back(row);
        }

        self.total_level_lines = queue.len() as u32;
        self.rows_inserted = 0;
        self.level_queue = queue;

        let mut placed = 0;
        while placed < visible_count {
            let Some(row) = self.level_queue.pop_front() else {
                break;
            };
            self.shift_up(row);
            self.rows_inserted += 1;
            placed += 1;
        }

        log::info!(
            "Level queue set: {} rows total, {} visible, {} queued",
            self.total_level_lines,
            placed,
            self.level_queue.len()
        );
    }

    /// Fill the bottom `n` rows with a randomized, immediately-legal fill.
    /// Rows are generated top-down so each sees sanitized rows above it.
    pub fn set_starting_lines(&mut self, n: usize) {
        let n = n.min(self.height);
        if n == 0 {
            return;
        }
        let mut rng = self.rng_state.to_rng();
        self.rng_state.stream = self.rng_state.stream.wrapping_add(1);

        let start = self.height - n;
        for y in start..self.height {
            let mut row: Vec<Cell> = (0..self.width)
                .map(|_| Cell::Color(rng.random_range(0..self.num_colors)))
                .collect();
            let above1 = self.context_row(y, 1);
            let above2 = self.context_row(y, 2);
            sanitize_row(&mut row, &above1, &above2, self.num_colors);
            self.grid[y] = row;
        }

        debug_assert!(!scan_matches(&self.grid).1, "starting fill must be legal");
        log::info!("Starting lines filled: {} rows", n);
    }

    /// Row `offset` above `y`, or an empty row past the top edge
    fn context_row(&self, y: usize, offset: usize) -> Vec<Cell> {
        if y >= offset {
            self.grid[y - offset].clone()
        } else {
            vec![Cell::Empty; self.width]
        }
    }
}
