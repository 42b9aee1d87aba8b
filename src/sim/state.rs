//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::consts::*;

/// One grid position: empty, or a color/tile index below `num_colors`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Color(u8),
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Color index, if occupied
    #[inline]
    pub fn color(&self) -> Option<u8> {
        match self {
            Cell::Empty => None,
            Cell::Color(c) => Some(*c),
        }
    }
}

/// Current phase of the grid state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Rise active; player may move and swap
    #[default]
    Idle,
    /// Matched cells flashing until the clear timer expires
    Clearing,
    /// Gravity consolidating columns via fall pieces
    Settling,
}

/// Engine notifications for the host's audio/UI collaborators.
/// Drained by the host after each tick; never consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A swap actually exchanged two cells
    Swap,
    /// A match was detected (swap-triggered or cascade)
    Match { chain: u32 },
    /// The win predicate passed
    Win,
    /// The stack breached the top boundary
    GameOver,
    /// The stack touched the advisory collision mask (non-fatal)
    TopContact,
}

/// Two-cell selection; `(x, y)` is the left cell, `(x+1, y)` the right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

/// A cell in transit during gravity settling
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FallPiece {
    pub column: usize,
    pub from_row: usize,
    pub to_row: usize,
    /// Fractional row position, advances toward `to_row`
    pub current_row: f32,
    pub value: Cell,
    /// Rows per second for this piece
    pub fall_speed: f32,
}

/// A particle for clear effects (cosmetic, never gameplay-affecting)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hue in degrees for the renderer's palette
    pub hue: f32,
    pub size: f32,
    /// Seconds remaining; discarded at 0
    pub life: f32,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Complete game state (deterministic, serializable)
///
/// The struct itself is the snapshot: hosts hold `&GameState` between
/// ticks, which Rust keeps read-only. The grid and queue stay private so
/// every write funnels through an engine operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Grid width in cells (fixed for the engine's lifetime)
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Number of distinct tile colors
    pub num_colors: u8,
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,

    /// Cell matrix, row 0 at the top
    pub(crate) grid: Vec<Vec<Cell>>,
    /// Cells currently part of a run ≥ 3 (rebuilt by every scan)
    pub match_mask: Vec<Vec<bool>>,
    /// Player cursor
    pub cursor: Cursor,
    /// Current phase
    pub phase: GamePhase,
    /// Cells in transit during settling
    pub fall_pieces: Vec<FallPiece>,
    /// Sanitized future rows, oldest first
    pub(crate) level_queue: VecDeque<Vec<Cell>>,

    /// Remaining clear flash time (ms) while `Clearing`
    pub clear_timer_ms: f32,
    /// Remaining automatic-rise suspension (ms)
    pub rise_pause_ms: f32,
    /// Pause total at the last grant, for progress-bar rendering
    pub rise_pause_max_ms: f32,
    /// Sub-cell upward offset; `0 ≤ offset < cell_size_px` between ticks
    pub scroll_offset_px: f32,

    // Tunables (plain fields; hosts adjust between ticks)
    pub cell_size_px: f32,
    pub scroll_speed_px_per_sec: f32,
    pub fall_speed_rows_per_sec: f32,
    pub cascade_fall_multiplier: f32,
    /// Screen row of the fixed win line
    pub win_line_row: usize,
    /// Row threshold for the below-the-line clear aggregate
    pub clear_line_row: usize,

    /// Running score
    pub score: u64,
    /// Total match events (swap-triggered and cascades)
    pub match_count: u32,
    /// Current chain depth; 0 while idle
    pub chain_depth: u32,
    /// Cumulative lines-cleared-equivalent (⌊tiles / width⌋ per clear)
    pub lines_cleared: u32,
    /// Lines needed to activate the clear-line display
    pub target_lines: u32,
    /// Whether the clear-line display is active
    pub show_clear_line: bool,
    /// Whether the last clear reached at or below `clear_line_row`
    pub cleared_below_line: bool,
    /// Rows inserted from the bottom so far (setup + automatic)
    pub rows_inserted: u32,
    /// Total rows defining the level; win threshold for `rows_inserted`
    pub total_level_lines: u32,

    /// Terminal win flag; one-way
    pub has_won: bool,
    /// Terminal loss flag; one-way
    pub has_lost: bool,

    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Pending notifications for the host
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,

    /// Advisory column-height mask in screen px, sampled across the width
    pub(crate) contact_mask: Option<Vec<f32>>,
    /// Rising-edge tracking for `GameEvent::TopContact`
    pub(crate) mask_contact: bool,

    /// Tick counter (drives deterministic cosmetic jitter)
    pub time_ticks: u64,
}

impl GameState {
    /// Create an engine for a `width × height` grid with the given palette size
    pub fn new(width: usize, height: usize, num_colors: u8, seed: u64) -> Self {
        assert!(width >= 3 && height >= 3, "grid must be at least 3x3");
        assert!(num_colors > 0, "palette must have at least one color");

        Self {
            width,
            height,
            num_colors,
            seed,
            rng_state: RngState::new(seed),
            grid: vec![vec![Cell::Empty; width]; height],
            match_mask: vec![vec![false; width]; height],
            cursor: Cursor {
                x: width / 2 - 1,
                y: height / 2,
            },
            phase: GamePhase::Idle,
            fall_pieces: Vec::new(),
            level_queue: VecDeque::new(),
            clear_timer_ms: 0.0,
            rise_pause_ms: 0.0,
            rise_pause_max_ms: 0.0,
            scroll_offset_px: 0.0,
            cell_size_px: DEFAULT_CELL_SIZE_PX,
            scroll_speed_px_per_sec: DEFAULT_SCROLL_SPEED_PX_PER_SEC,
            fall_speed_rows_per_sec: DEFAULT_FALL_SPEED_ROWS_PER_SEC,
            cascade_fall_multiplier: DEFAULT_CASCADE_FALL_MULTIPLIER,
            win_line_row: DEFAULT_WIN_LINE_ROW,
            clear_line_row: DEFAULT_CLEAR_LINE_ROW,
            score: 0,
            match_count: 0,
            chain_depth: 0,
            lines_cleared: 0,
            target_lines: 0,
            show_clear_line: false,
            cleared_below_line: false,
            rows_inserted: 0,
            total_level_lines: 0,
            has_won: false,
            has_lost: false,
            particles: Vec::new(),
            events: Vec::new(),
            contact_mask: None,
            mask_contact: false,
            time_ticks: 0,
        }
    }

    /// Read-only view of the cell matrix (row 0 at the top)
    #[inline]
    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    /// Cell at `(x, y)`; `Empty` when out of range
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.grid
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    /// Move the cursor by a delta, clamped to bounds. Accepted in any
    /// non-terminal phase so the player can pre-position during cascades.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        if self.has_won || self.has_lost {
            return;
        }
        let x = self.cursor.x as i32 + dx;
        let y = self.cursor.y as i32 + dy;
        self.cursor.x = x.clamp(0, self.width as i32 - 2) as usize;
        self.cursor.y = y.clamp(0, self.height as i32 - 1) as usize;
    }

    /// Place the cursor at an absolute position, clamped to bounds
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        if self.has_won || self.has_lost {
            return;
        }
        self.cursor.x = x.clamp(0, self.width as i32 - 2) as usize;
        self.cursor.y = y.clamp(0, self.height as i32 - 1) as usize;
    }

    /// Install an advisory column-height mask (screen-space y thresholds,
    /// sampled across the grid width). Contact fires `GameEvent::TopContact`
    /// and nothing else.
    pub fn set_mask(&mut self, mask: Vec<f32>) {
        self.contact_mask = if mask.is_empty() { None } else { Some(mask) };
        self.mask_contact = false;
    }

    /// Take all pending events. Hosts call this once per frame after
    /// `update`; events accumulate until drained.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Preview of the next incoming row, if any remain queued
    pub fn next_row_preview(&self) -> Option<&[Cell]> {
        self.level_queue.front().map(|row| row.as_slice())
    }

    /// Queued rows not yet risen into play
    pub fn queue_len(&self) -> usize {
        self.level_queue.len()
    }

    /// Screen-space y of the win line
    #[inline]
    pub fn win_line_px(&self) -> f32 {
        self.win_line_row as f32 * self.cell_size_px
    }

    /// Screen-space top edge of a grid row, accounting for sub-cell rise
    #[inline]
    pub fn row_top_px(&self, row: usize) -> f32 {
        row as f32 * self.cell_size_px - self.scroll_offset_px
    }

    /// True if any cell in the top visible row is occupied
    pub(crate) fn top_row_occupied(&self) -> bool {
        self.grid[0].iter().any(|c| !c.is_empty())
    }

    /// Shift the whole grid up one row, discarding the top row and
    /// installing `row` at the bottom. Callers handle loss checks,
    /// counters and cursor adjustment.
    pub(crate) fn shift_up(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.width);
        self.grid.remove(0);
        self.grid.push(row);
    }

    /// Direct cell write for tests (bypasses sanitization and phase gates)
    #[cfg(test)]
    pub(crate) fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.grid[y][x] = cell;
    }
}
